// mpeg1-player
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Player` drives the demuxer and the two decoders against a virtual clock: packets are
//! routed into per-stream ring buffers, frames and samples are pulled out as the clock
//! advances, and each successful decode is delivered through a caller-installed callback.
//!
//! A decoder's buffer could be refilled from inside its own read path by a load-callback that
//! re-enters the demuxer, but aliasing the demuxer and both stream buffers through such a
//! callback has no safe expression here. The player instead runs the equivalent state machine
//! in the open: when a decoder comes up short, it demuxes packets (routing every packet to its
//! stream's buffer) until one of the requested type has been delivered, then retries the
//! decode. The order of packet reads and decode attempts comes out the same.

use std::fs::File;
use std::path::Path;

use log::debug;
use mpeg1_audio::AudioDecoder;
use mpeg1_core::audio::AudioSamples;
use mpeg1_core::frame::VideoFrame;
use mpeg1_core::packet::stream_id;
use mpeg1_core::{BitBuffer, Result};
use mpeg1_format::Demuxer;
use mpeg1_video::{VideoDecoder, VideoDecoderOptions};

pub mod output;
pub mod resampler;

/// Capacity of each per-stream ring buffer.
const STREAM_BUFFER_CAPACITY: usize = 128 * 1024;

/// Default probe window when the caller doesn't pass one.
pub const DEFAULT_PROBE_SIZE: usize = 1024 * 1024;

type VideoCallback = Box<dyn FnMut(&VideoFrame)>;
type AudioCallback = Box<dyn FnMut(&AudioSamples)>;

/// Construction-time options for [`Player`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PlayerOptions {
    /// Rewind and keep playing when the stream ends instead of reporting the end.
    pub loop_playback: bool,
    /// How far ahead of the video clock audio is decoded, in seconds.
    pub audio_lead_time: f64,
    /// Forwarded to [`VideoDecoderOptions::assume_no_b_frames`].
    pub assume_no_b_frames: bool,
}

/// Plays an MPEG-1 Program Stream: demultiplexes it, decodes video and audio, and delivers
/// both through callbacks in presentation order against a virtual clock.
pub struct Player {
    demux: Demuxer,

    time: f64,
    has_ended: bool,
    loop_playback: bool,
    audio_lead_time: f64,
    assume_no_b_frames: bool,

    has_decoders: bool,
    video_enabled: bool,
    audio_enabled: bool,
    video_packet_type: Option<u8>,
    audio_packet_type: Option<u8>,
    audio_stream_index: usize,

    video_decoder: Option<VideoDecoder>,
    audio_decoder: Option<AudioDecoder>,

    video_callback: Option<VideoCallback>,
    audio_callback: Option<AudioCallback>,
}

impl Player {
    /// Opens the file at `path` and wraps it in a player.
    pub fn with_filename<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(BitBuffer::with_file(path)?, PlayerOptions::default()))
    }

    /// Wraps an already-open file.
    pub fn with_file(file: File) -> Result<Self> {
        Ok(Self::new(BitBuffer::from_file(file)?, PlayerOptions::default()))
    }

    /// Wraps an in-memory program stream.
    pub fn with_memory(bytes: Vec<u8>) -> Self {
        Self::new(BitBuffer::with_bytes(bytes), PlayerOptions::default())
    }

    /// Wraps an arbitrary `BitBuffer` source with the given options.
    pub fn new(buffer: BitBuffer, options: PlayerOptions) -> Self {
        let mut player = Player {
            demux: Demuxer::new(buffer),
            time: 0.0,
            has_ended: false,
            loop_playback: options.loop_playback,
            audio_lead_time: options.audio_lead_time,
            assume_no_b_frames: options.assume_no_b_frames,
            has_decoders: false,
            video_enabled: true,
            audio_enabled: true,
            video_packet_type: None,
            audio_packet_type: None,
            audio_stream_index: 0,
            video_decoder: None,
            audio_decoder: None,
            video_callback: None,
            audio_callback: None,
        };
        player.init_decoders();
        player
    }

    /// Creates the per-stream decoders once the demuxer knows which streams exist. Idempotent;
    /// returns false while the container headers haven't been seen yet.
    fn init_decoders(&mut self) -> bool {
        if self.has_decoders {
            return true;
        }
        if !self.demux.has_headers() {
            return false;
        }

        if self.demux.num_video_streams() > 0 {
            if self.video_enabled {
                self.video_packet_type = Some(stream_id::VIDEO_1);
            }
            if self.video_decoder.is_none() {
                let buffer = BitBuffer::ring(STREAM_BUFFER_CAPACITY);
                let options =
                    VideoDecoderOptions { assume_no_b_frames: self.assume_no_b_frames };
                self.video_decoder = Some(VideoDecoder::new(buffer, options));
            }
        }

        if self.demux.num_audio_streams() > 0 {
            if self.audio_enabled {
                self.audio_packet_type =
                    Some(stream_id::AUDIO_1 + self.audio_stream_index as u8);
            }
            if self.audio_decoder.is_none() {
                self.audio_decoder = Some(AudioDecoder::new(BitBuffer::ring(STREAM_BUFFER_CAPACITY)));
            }
        }

        self.has_decoders = true;
        true
    }

    /// True once the container headers and both elementary-stream headers (for the streams that
    /// exist) have been seen, demuxing forward as far as needed to find them.
    pub fn has_headers(&mut self) -> bool {
        if !self.demux.has_headers() || !self.init_decoders() {
            return false;
        }
        loop {
            let pending = match &mut self.video_decoder {
                Some(video) => !video.has_header(),
                None => false,
            };
            if !pending {
                break;
            }
            if !self.read_packets(self.video_packet_type) {
                return false;
            }
        }
        loop {
            let pending = match &mut self.audio_decoder {
                Some(audio) => !audio.has_header(),
                None => false,
            };
            if !pending {
                break;
            }
            if !self.read_packets(self.audio_packet_type) {
                return false;
            }
        }
        true
    }

    /// Scans up to `probe_size` bytes of start codes to detect which streams exist, then
    /// re-initializes the decoders accordingly. Returns false if nothing was found.
    pub fn probe(&mut self, probe_size: usize) -> bool {
        let result = self.demux.probe(probe_size);
        if !result.has_video && !result.any_audio() {
            return false;
        }

        self.has_decoders = false;
        self.video_packet_type = None;
        self.audio_packet_type = None;
        self.init_decoders()
    }

    pub fn video_enabled(&self) -> bool {
        self.video_enabled
    }

    pub fn set_video_enabled(&mut self, enabled: bool) {
        self.video_enabled = enabled;
        if !enabled {
            self.video_packet_type = None;
            return;
        }
        self.video_packet_type = if self.init_decoders() && self.video_decoder.is_some() {
            Some(stream_id::VIDEO_1)
        } else {
            None
        };
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn set_audio_enabled(&mut self, enabled: bool) {
        self.audio_enabled = enabled;
        if !enabled {
            self.audio_packet_type = None;
            return;
        }
        self.audio_packet_type = if self.init_decoders() && self.audio_decoder.is_some() {
            Some(stream_id::AUDIO_1 + self.audio_stream_index as u8)
        } else {
            None
        };
    }

    /// Selects which of the up-to-four audio streams to decode.
    pub fn set_audio_stream(&mut self, stream_index: usize) {
        if stream_index > 3 {
            return;
        }
        self.audio_stream_index = stream_index;
        self.set_audio_enabled(self.audio_enabled);
    }

    pub fn num_video_streams(&mut self) -> usize {
        self.demux.num_video_streams() as usize
    }

    pub fn num_audio_streams(&mut self) -> usize {
        self.demux.num_audio_streams() as usize
    }

    pub fn width(&mut self) -> usize {
        if !self.init_decoders() {
            return 0;
        }
        self.video_decoder.as_mut().map_or(0, |video| video.width())
    }

    pub fn height(&mut self) -> usize {
        if !self.init_decoders() {
            return 0;
        }
        self.video_decoder.as_mut().map_or(0, |video| video.height())
    }

    pub fn framerate(&mut self) -> f64 {
        if !self.init_decoders() {
            return 0.0;
        }
        self.video_decoder.as_mut().map_or(0.0, |video| video.framerate())
    }

    pub fn samplerate(&mut self) -> u32 {
        if !self.init_decoders() {
            return 0;
        }
        self.audio_decoder.as_mut().map_or(0, |audio| audio.samplerate())
    }

    pub fn audio_lead_time(&self) -> f64 {
        self.audio_lead_time
    }

    pub fn set_audio_lead_time(&mut self, lead_time: f64) {
        self.audio_lead_time = lead_time;
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn duration(&mut self) -> f64 {
        self.demux.get_duration(stream_id::VIDEO_1)
    }

    pub fn loop_enabled(&self) -> bool {
        self.loop_playback
    }

    pub fn set_loop(&mut self, loop_playback: bool) {
        self.loop_playback = loop_playback;
    }

    pub fn has_ended(&self) -> bool {
        self.has_ended
    }

    /// Installs the callback invoked with every decoded video frame. The frame reference is
    /// only valid for the duration of the call; the planes are reused by later decodes.
    pub fn set_video_decode_callback<F: FnMut(&VideoFrame) + 'static>(&mut self, callback: F) {
        self.video_callback = Some(Box::new(callback));
    }

    /// Installs the callback invoked with every decoded batch of audio samples. The buffer is
    /// overwritten by the next audio decode.
    pub fn set_audio_decode_callback<F: FnMut(&AudioSamples) + 'static>(&mut self, callback: F) {
        self.audio_callback = Some(Box::new(callback));
    }

    /// Advances the clock by `tick` seconds, decoding and delivering every video frame with a
    /// presentation time before the new clock value and every audio frame up to the additional
    /// audio lead time. When both streams are exhausted and the demuxer is at the end of the
    /// source, the player either rewinds (loop mode) or flags the end.
    pub fn decode(&mut self, tick: f64) {
        if !self.init_decoders() {
            return;
        }

        let decode_video = self.video_callback.is_some() && self.video_packet_type.is_some();
        let decode_audio = self.audio_callback.is_some() && self.audio_packet_type.is_some();
        if !decode_video && !decode_audio {
            return;
        }

        let mut decode_video_failed = false;
        let mut decode_audio_failed = false;

        let video_target_time = self.time + tick;
        let audio_target_time = self.time + tick + self.audio_lead_time;

        loop {
            let mut did_decode = false;

            let video_behind = decode_video
                && self.video_decoder.as_ref().map_or(false, |video| video.time() < video_target_time);
            if video_behind {
                if self.pump_video() {
                    if let (Some(video), Some(callback)) =
                        (&self.video_decoder, &mut self.video_callback)
                    {
                        callback(video.last_frame());
                    }
                    did_decode = true;
                } else {
                    decode_video_failed = true;
                }
            }

            let audio_behind = decode_audio
                && self.audio_decoder.as_ref().map_or(false, |audio| audio.time() < audio_target_time);
            if audio_behind {
                if self.pump_audio() {
                    if let (Some(audio), Some(callback)) =
                        (&self.audio_decoder, &mut self.audio_callback)
                    {
                        callback(audio.last_samples());
                    }
                    did_decode = true;
                } else {
                    decode_audio_failed = true;
                }
            }

            if !did_decode {
                break;
            }
        }

        // Did all sources we wanted to decode fail, with the demuxer at the end?
        if (!decode_video || decode_video_failed)
            && (!decode_audio || decode_audio_failed)
            && self.demux.has_ended()
        {
            self.handle_end();
            return;
        }

        self.time += tick;
    }

    /// Decodes exactly one video frame and advances the clock to its presentation time.
    pub fn decode_video(&mut self) -> Option<&VideoFrame> {
        if !self.init_decoders() {
            return None;
        }
        self.video_packet_type?;

        if self.pump_video() {
            if let Some(video) = &self.video_decoder {
                self.time = video.last_frame().time;
            }
            self.video_decoder.as_ref().map(|video| video.last_frame())
        } else {
            if self.demux.has_ended() {
                self.handle_end();
            }
            None
        }
    }

    /// Decodes exactly one audio frame and advances the clock to its presentation time.
    pub fn decode_audio(&mut self) -> Option<&AudioSamples> {
        if !self.init_decoders() {
            return None;
        }
        self.audio_packet_type?;

        if self.pump_audio() {
            if let Some(audio) = &self.audio_decoder {
                self.time = audio.last_samples().time;
            }
            self.audio_decoder.as_ref().map(|audio| audio.last_samples())
        } else {
            if self.demux.has_ended() {
                self.handle_end();
            }
            None
        }
    }

    /// Seeks to the last intra frame at or before `time` and returns it decoded. With
    /// `seek_exact`, continues decoding frames until the one whose presentation time covers
    /// `time`, so the returned frame is exact rather than the preceding intra frame.
    pub fn seek_frame(&mut self, time: f64, seek_exact: bool) -> Option<&VideoFrame> {
        if !self.init_decoders() {
            return None;
        }
        let kind = self.video_packet_type?;

        let start_time = self.demux.get_start_time(kind);
        let duration = self.demux.get_duration(kind);
        let time = time.clamp(0.0, duration);

        let packet = self.demux.seek(time, kind, true)?;

        // Don't buffer audio while decoding video ahead of the clock.
        let previous_audio_packet_type = self.audio_packet_type.take();

        if let Some(video) = &mut self.video_decoder {
            video.rewind();
            video.set_time(packet.pts - start_time);
            video.feed(&packet.data);
        }
        let mut produced = self.pump_video();

        if seek_exact {
            while produced {
                let frame_time = match &self.video_decoder {
                    Some(video) => video.last_frame().time,
                    None => break,
                };
                if frame_time >= time {
                    break;
                }
                produced = self.pump_video();
            }
        }

        self.audio_packet_type = previous_audio_packet_type;

        if produced {
            if let Some(video) = &self.video_decoder {
                self.time = video.last_frame().time;
            }
        }
        self.has_ended = false;

        if produced {
            self.video_decoder.as_ref().map(|video| video.last_frame())
        } else {
            None
        }
    }

    /// Seeks like [`Self::seek_frame`], delivers the found frame through the video callback,
    /// and re-synchronizes audio so the next [`Self::decode`] continues from the new position.
    pub fn seek(&mut self, time: f64, seek_exact: bool) -> bool {
        if self.seek_frame(time, seek_exact).is_none() {
            return false;
        }

        if let (Some(video), Some(callback)) = (&self.video_decoder, &mut self.video_callback) {
            callback(video.last_frame());
        }

        let audio_kind = match self.audio_packet_type {
            Some(kind) => kind,
            None => return true,
        };
        let video_kind = match self.video_packet_type {
            Some(kind) => kind,
            None => return true,
        };

        // Demux forward to the first audio packet past the new clock, set the audio decoder's
        // clock from its PTS, and decode enough audio to satisfy the lead time.
        let start_time = self.demux.get_start_time(video_kind);
        if let Some(audio) = &mut self.audio_decoder {
            audio.rewind();
        }
        while let Some(packet) = self.demux.decode() {
            if Some(packet.kind) == self.video_packet_type {
                if let Some(video) = &mut self.video_decoder {
                    video.feed(&packet.data);
                }
            } else if packet.kind == audio_kind && packet.pts - start_time > self.time {
                if let Some(audio) = &mut self.audio_decoder {
                    audio.set_time(packet.pts - start_time);
                    audio.feed(&packet.data);
                }
                self.decode(0.0);
                break;
            }
        }

        true
    }

    /// Rewinds the demuxer and both decoders to the start of the stream and zeroes the clock.
    pub fn rewind(&mut self) {
        if let Some(video) = &mut self.video_decoder {
            video.rewind();
        }
        if let Some(audio) = &mut self.audio_decoder {
            audio.rewind();
        }
        self.demux.rewind();
        self.time = 0.0;
    }

    fn handle_end(&mut self) {
        if self.loop_playback {
            debug!("end of stream, looping back to the start");
            self.rewind();
        } else {
            self.has_ended = true;
        }
    }

    /// Pulls the next frame out of the video decoder, demuxing more packets into the stream
    /// buffers whenever the decoder comes up short. Returns false when no frame can be
    /// produced from what remains of the source.
    fn pump_video(&mut self) -> bool {
        loop {
            let decoded = match &mut self.video_decoder {
                Some(video) => video.decode().is_some(),
                None => return false,
            };
            if decoded {
                return true;
            }
            let ended = self.video_decoder.as_ref().map_or(true, |video| video.has_ended());
            if ended {
                return false;
            }
            if !self.read_packets(self.video_packet_type) && !self.demux.has_ended() {
                return false;
            }
            // On demuxer end, read_packets just signaled the stream buffers; retry once more so
            // the decoder can flush its held-back reference frame.
        }
    }

    /// Audio counterpart of [`Self::pump_video`].
    fn pump_audio(&mut self) -> bool {
        loop {
            let decoded = match &mut self.audio_decoder {
                Some(audio) => audio.decode().is_some(),
                None => return false,
            };
            if decoded {
                return true;
            }
            let ended = self.audio_decoder.as_ref().map_or(true, |audio| audio.has_ended());
            if ended {
                return false;
            }
            if !self.read_packets(self.audio_packet_type) && !self.demux.has_ended() {
                return false;
            }
        }
    }

    /// Demuxes packets, routing each to its stream's decoder buffer, until one of `requested`
    /// type has been delivered (true) or the demuxer can't produce more (false). At the end of
    /// the source, both stream buffers are signaled so the decoders can drain and report it.
    fn read_packets(&mut self, requested: Option<u8>) -> bool {
        while let Some(packet) = self.demux.decode() {
            if Some(packet.kind) == self.video_packet_type {
                if let Some(video) = &mut self.video_decoder {
                    video.feed(&packet.data);
                }
            } else if Some(packet.kind) == self.audio_packet_type {
                if let Some(audio) = &mut self.audio_decoder {
                    audio.feed(&packet.data);
                }
            }

            if Some(packet.kind) == requested {
                return true;
            }
        }

        if self.demux.has_ended() {
            if let Some(video) = &mut self.video_decoder {
                video.signal_end();
            }
            if let Some(audio) = &mut self.audio_decoder {
                audio.signal_end();
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn push_bits(bits: &mut Vec<u8>, value: u64, n: u32) {
        for i in (0..n).rev() {
            bits.push(((value >> i) & 1) as u8);
        }
    }

    fn bits_to_bytes(bits: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        for chunk in bits.chunks(8) {
            let mut byte = 0u8;
            for (i, b) in chunk.iter().enumerate() {
                byte |= b << (7 - i);
            }
            out.push(byte);
        }
        out
    }

    fn pack_header() -> Vec<u8> {
        let mut bits = Vec::new();
        push_bits(&mut bits, 0b0010, 4);
        push_bits(&mut bits, 0, 3);
        push_bits(&mut bits, 1, 1);
        push_bits(&mut bits, 0, 15);
        push_bits(&mut bits, 1, 1);
        push_bits(&mut bits, 0, 15);
        push_bits(&mut bits, 1, 1);
        push_bits(&mut bits, 0, 24);

        let mut out = vec![0x00, 0x00, 0x01, stream_id::PACK];
        out.extend(bits_to_bytes(&bits));
        out
    }

    fn system_header(audio_bound: u16, video_bound: u16) -> Vec<u8> {
        let mut out = vec![0x00, 0x00, 0x01, stream_id::SYSTEM];
        out.extend_from_slice(&[0, 0]);
        out.extend_from_slice(&[0, 0, 0]);
        let word = (audio_bound << 10) | video_bound;
        out.extend_from_slice(&word.to_be_bytes());
        out
    }

    /// A PES packet of `kind` with a zero PTS and the given payload.
    fn pes_packet(kind: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![0x00, 0x00, 0x01, kind];
        let length = (5 + payload.len()) as u16; // 40-bit PTS header + payload
        out.extend_from_slice(&length.to_be_bytes());

        let mut bits = Vec::new();
        push_bits(&mut bits, 0b0010, 4); // no P-STD info, PTS-only marker
        push_bits(&mut bits, 0, 3);
        push_bits(&mut bits, 1, 1);
        push_bits(&mut bits, 0, 15);
        push_bits(&mut bits, 1, 1);
        push_bits(&mut bits, 0, 15);
        push_bits(&mut bits, 1, 1);
        out.extend(bits_to_bytes(&bits));
        out.extend_from_slice(payload);
        out
    }

    /// Mono 48 kbit/s 44.1 kHz Layer II frame with no subband allocation: pure silence.
    fn silent_audio_frame() -> Vec<u8> {
        let mut frame = vec![0xFF, 0xFD, 0x20, 0xC0];
        frame.extend(std::iter::repeat(0u8).take(152));
        frame
    }

    fn audio_only_stream() -> Vec<u8> {
        let mut stream = pack_header();
        stream.extend(system_header(1, 0));
        stream.extend(pes_packet(stream_id::AUDIO_1, &silent_audio_frame()));
        stream
    }

    #[test]
    fn delivers_audio_through_the_callback_and_ends() {
        let mut player = Player::with_memory(audio_only_stream());

        let delivered = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&delivered);
        player.set_audio_decode_callback(move |samples| {
            sink.borrow_mut().push((samples.time, samples.interleaved.len()));
        });

        player.decode(1.0);

        let delivered = delivered.borrow();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0], (0.0, 1152 * 2));
        assert!(player.has_ended());
    }

    #[test]
    fn loop_mode_rewinds_instead_of_ending() {
        let mut player = Player::new(
            BitBuffer::with_bytes(audio_only_stream()),
            PlayerOptions { loop_playback: true, ..PlayerOptions::default() },
        );

        let count = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&count);
        player.set_audio_decode_callback(move |_| *sink.borrow_mut() += 1);

        player.decode(1.0);
        assert!(!player.has_ended());
        assert_eq!(player.time(), 0.0);

        // The next tick replays the same frame from the start.
        player.decode(1.0);
        assert!(!player.has_ended());
        assert!(*count.borrow() >= 2);
    }

    #[test]
    fn probe_detects_the_audio_stream() {
        let mut player = Player::with_memory(audio_only_stream());
        assert!(player.probe(DEFAULT_PROBE_SIZE));
        assert_eq!(player.num_audio_streams(), 1);
        assert_eq!(player.num_video_streams(), 0);
    }

    #[test]
    fn headers_report_the_audio_parameters() {
        let mut player = Player::with_memory(audio_only_stream());
        assert!(player.has_headers());
        assert_eq!(player.samplerate(), 44_100);
    }

    #[test]
    fn decode_without_callbacks_is_a_no_op() {
        let mut player = Player::with_memory(audio_only_stream());
        player.decode(1.0);
        assert_eq!(player.time(), 0.0);
        assert!(!player.has_ended());
    }
}
