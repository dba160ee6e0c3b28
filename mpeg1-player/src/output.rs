// mpeg1-player
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform-dependant audio output for the demo player, backed by cpal.

use std::result;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rb::*;

use log::{error, info};
use mpeg1_core::audio::AudioSamples;

use crate::resampler::Resampler;

pub trait AudioOutput {
    fn write(&mut self, samples: &AudioSamples) -> Result<()>;
    fn flush(&mut self);
}

#[allow(dead_code)]
#[derive(Debug)]
pub enum AudioOutputError {
    OpenStreamError,
    PlayStreamError,
    StreamClosedError,
}

pub type Result<T> = result::Result<T, AudioOutputError>;

pub struct CpalAudioOutput;

trait AudioOutputSample: cpal::Sample + std::default::Default + std::marker::Send + 'static {}

impl AudioOutputSample for f32 {}
impl AudioOutputSample for i16 {}
impl AudioOutputSample for u16 {}

impl CpalAudioOutput {
    /// Opens the default output device for interleaved stereo at the device's native sample
    /// rate, resampling from `sample_rate` if the two differ.
    pub fn try_open(sample_rate: u32) -> Result<Box<dyn AudioOutput>> {
        let host = cpal::default_host();

        let device = match host.default_output_device() {
            Some(device) => device,
            _ => {
                error!("failed to get default audio output device");
                return Err(AudioOutputError::OpenStreamError);
            }
        };

        let config = match device.default_output_config() {
            Ok(config) => config,
            Err(err) => {
                error!("failed to get default audio output device config: {}", err);
                return Err(AudioOutputError::OpenStreamError);
            }
        };

        let device_rate = config.sample_rate().0;

        // Select the proper playback routine based on the device's sample format.
        match config.sample_format() {
            cpal::SampleFormat::F32 => {
                CpalAudioOutputImpl::<f32>::try_open(sample_rate, device_rate, &device)
            }
            cpal::SampleFormat::I16 => {
                CpalAudioOutputImpl::<i16>::try_open(sample_rate, device_rate, &device)
            }
            cpal::SampleFormat::U16 => {
                CpalAudioOutputImpl::<u16>::try_open(sample_rate, device_rate, &device)
            }
        }
    }
}

struct CpalAudioOutputImpl<T: AudioOutputSample> {
    ring_buf_producer: rb::Producer<T>,
    sample_buf: Vec<T>,
    stream: cpal::Stream,
    resampler: Option<Resampler>,
}

impl<T: AudioOutputSample> CpalAudioOutputImpl<T> {
    pub fn try_open(
        sample_rate: u32,
        device_rate: u32,
        device: &cpal::Device,
    ) -> Result<Box<dyn AudioOutput>> {
        let config = cpal::StreamConfig {
            channels: 2,
            sample_rate: cpal::SampleRate(device_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        // A ring buffer buffering up to 8K samples decouples the decode loop from the audio
        // device callback.
        let ring_buf = SpscRb::new(8 * 1024);
        let (ring_buf_producer, ring_buf_consumer) = (ring_buf.producer(), ring_buf.consumer());

        let stream_result = device.build_output_stream(
            &config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // Write out as many samples as possible from the ring buffer to the audio
                // output, muting anything the decoder hasn't produced yet.
                let written = ring_buf_consumer.read(data).unwrap_or(0);
                data[written..].iter_mut().for_each(|s| *s = T::from(&0.0f32));
            },
            move |err| error!("audio output error: {}", err),
        );

        let stream = match stream_result {
            Ok(stream) => stream,
            Err(err) => {
                error!("audio output stream open error: {}", err);
                return Err(AudioOutputError::OpenStreamError);
            }
        };

        if let Err(err) = stream.play() {
            error!("audio output stream play error: {}", err);
            return Err(AudioOutputError::PlayStreamError);
        }

        let resampler = if device_rate != sample_rate {
            info!("resampling audio from {} Hz to {} Hz", sample_rate, device_rate);
            Resampler::new(sample_rate, device_rate)
        } else {
            None
        };

        Ok(Box::new(CpalAudioOutputImpl {
            ring_buf_producer,
            sample_buf: Vec::new(),
            stream,
            resampler,
        }))
    }
}

impl<T: AudioOutputSample> AudioOutput for CpalAudioOutputImpl<T> {
    fn write(&mut self, samples: &AudioSamples) -> Result<()> {
        let interleaved: &[f32] = match &mut self.resampler {
            Some(resampler) => resampler.resample(&samples.interleaved[..]),
            None => &samples.interleaved[..],
        };

        // Convert to the device's sample format.
        self.sample_buf.clear();
        self.sample_buf.extend(interleaved.iter().map(T::from));

        // Write out all samples to the ring buffer; write_blocking parks the decode loop until
        // the device callback has drained enough space.
        let mut i = 0;
        while i < self.sample_buf.len() {
            match self.ring_buf_producer.write_blocking(&self.sample_buf[i..]) {
                Some(written) => i += written,
                // Consumer destroyed.
                None => return Err(AudioOutputError::StreamClosedError),
            }
        }

        Ok(())
    }

    fn flush(&mut self) {
        // Flush is best-effort, ignore the returned result.
        let _ = self.stream.pause();
    }
}
