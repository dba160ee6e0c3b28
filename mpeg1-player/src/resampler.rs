// mpeg1-player
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stereo sample-rate conversion between the decoded stream and the output device.

use log::error;

/// One Layer II frame's worth of sample pairs; also the resampler chunk size.
const CHUNK_SIZE: usize = 1152;

/// Converts interleaved stereo `f32` between two sample rates with rubato's FFT resampler.
///
/// Input is accumulated in planar form until a whole chunk is available; output is handed back
/// re-interleaved. Anything short of a chunk stays buffered for the next call.
pub struct Resampler {
    resampler: rubato::FftFixedIn<f32>,
    input: [Vec<f32>; 2],
    output: [Vec<f32>; 2],
    interleaved: Vec<f32>,
}

impl Resampler {
    pub fn new(from_rate: u32, to_rate: u32) -> Option<Self> {
        let resampler = match rubato::FftFixedIn::<f32>::new(
            from_rate as usize,
            to_rate as usize,
            CHUNK_SIZE,
            2,
            2,
        ) {
            Ok(resampler) => resampler,
            Err(err) => {
                error!("failed to create resampler: {}", err);
                return None;
            }
        };

        let max_out = rubato::Resampler::output_frames_max(&resampler);

        Some(Resampler {
            resampler,
            input: [Vec::with_capacity(2 * CHUNK_SIZE), Vec::with_capacity(2 * CHUNK_SIZE)],
            output: [vec![0.0; max_out], vec![0.0; max_out]],
            interleaved: Vec::new(),
        })
    }

    /// Feeds interleaved stereo samples in and returns whatever whole chunks could be
    /// resampled, re-interleaved (empty when more input is still needed).
    pub fn resample(&mut self, src: &[f32]) -> &[f32] {
        for frame in src.chunks_exact(2) {
            self.input[0].push(frame[0]);
            self.input[1].push(frame[1]);
        }

        self.interleaved.clear();

        while self.input[0].len() >= CHUNK_SIZE {
            let slices_in: [&[f32]; 2] =
                [&self.input[0][..CHUNK_SIZE], &self.input[1][..CHUNK_SIZE]];
            let (left_out, right_out) = self.output.split_at_mut(1);
            let mut slices_out: [&mut [f32]; 2] = [&mut left_out[0], &mut right_out[0]];

            let (read, written) = match rubato::Resampler::process_into_buffer(
                &mut self.resampler,
                &slices_in,
                &mut slices_out,
                None,
            ) {
                Ok(counts) => counts,
                Err(err) => {
                    error!("resampler error: {}", err);
                    break;
                }
            };

            self.input[0].drain(..read);
            self.input[1].drain(..read);

            for i in 0..written {
                self.interleaved.push(self.output[0][i]);
                self.interleaved.push(self.output[1][i]);
            }
        }

        &self.interleaved
    }
}
