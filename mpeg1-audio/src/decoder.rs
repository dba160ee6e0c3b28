// mpeg1-audio
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `AudioDecoder`: MPEG-1 Audio Layer II frame decode — bit allocation, scale factors, subband
//! sample requantization, and polyphase synthesis into interleaved PCM.

use log::debug;
use mpeg1_core::audio::{AudioSamples, SAMPLES_PER_FRAME};
use mpeg1_core::BitBuffer;

use crate::header::{self, ChannelMode, FrameHeader};
use crate::synthesis;
use crate::tables::{self, QuantizerSpec};

/// Decodes an MPEG-1 Audio Layer II elementary stream into 1152-sample PCM frames.
///
/// Owns the `BitBuffer` it reads from; in the player this is a ring buffer fed with demuxed
/// packet bodies via [`AudioDecoder::feed`].
pub struct AudioDecoder {
    buffer: BitBuffer,

    time: f64,
    samples_decoded: u64,

    header: Option<FrameHeader>,
    next_frame_data_size: usize,

    allocation: [[Option<&'static QuantizerSpec>; 32]; 2],
    scale_factor_info: [[u8; 32]; 2],
    scale_factor: [[[i32; 3]; 32]; 2],
    sample: [[[i32; 3]; 32]; 2],

    samples: AudioSamples,
    u: [f32; 32],
    v: [[f32; 1024]; 2],
    v_pos: usize,
    d: [f32; 1024],
}

impl AudioDecoder {
    /// Wraps `buffer` and attempts to decode the first frame header immediately; like the video
    /// decoder, everything still works if the header hasn't arrived yet.
    pub fn new(buffer: BitBuffer) -> Self {
        let mut decoder = AudioDecoder {
            buffer,
            time: 0.0,
            samples_decoded: 0,
            header: None,
            next_frame_data_size: 0,
            allocation: [[None; 32]; 2],
            scale_factor_info: [[0; 32]; 2],
            scale_factor: [[[0; 3]; 32]; 2],
            sample: [[[0; 3]; 32]; 2],
            samples: AudioSamples::new(0),
            u: [0.0; 32],
            v: [[0.0; 1024]; 2],
            v_pos: 0,
            d: synthesis::build_window(),
        };
        decoder.next_frame_data_size = decoder.decode_header();
        decoder
    }

    /// True once a frame header has been parsed, attempting to parse one first if not.
    pub fn has_header(&mut self) -> bool {
        if self.header.is_some() {
            return true;
        }
        self.next_frame_data_size = self.decode_header();
        self.header.is_some()
    }

    pub fn samplerate(&mut self) -> u32 {
        if self.has_header() {
            self.samples.sample_rate
        } else {
            0
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        let rate = self.header.map(|h| h.sample_rate).unwrap_or(0);
        self.samples_decoded = (time * rate as f64) as u64;
        self.time = time;
    }

    pub fn has_ended(&self) -> bool {
        self.buffer.has_ended()
    }

    /// Appends elementary-stream bytes (a demuxed packet body) to the decoder's buffer.
    pub fn feed(&mut self, data: &[u8]) {
        self.buffer.write(data);
    }

    /// Marks the decoder's buffer as final: no more packets will be fed.
    pub fn signal_end(&mut self) {
        self.buffer.signal_end();
    }

    pub fn rewind(&mut self) {
        self.buffer.rewind();
        self.time = 0.0;
        self.samples_decoded = 0;
        self.next_frame_data_size = 0;
    }

    /// Decodes and returns the next frame of samples, or `None` if a whole frame isn't
    /// buffered yet or the stream has ended.
    pub fn decode(&mut self) -> Option<&AudioSamples> {
        if self.next_frame_data_size == 0 {
            if !self.buffer.has(48) {
                return None;
            }
            self.next_frame_data_size = self.decode_header();
        }

        if self.next_frame_data_size == 0 || !self.buffer.has(self.next_frame_data_size * 8) {
            return None;
        }

        self.decode_frame();
        self.next_frame_data_size = 0;

        self.samples.time = self.time;

        self.samples_decoded += SAMPLES_PER_FRAME as u64;
        self.time = self.samples_decoded as f64 / self.samples.sample_rate as f64;

        Some(&self.samples)
    }

    /// The samples the most recent successful `decode` produced. Overwritten by each decode.
    pub fn last_samples(&self) -> &AudioSamples {
        &self.samples
    }

    /// Parses the next frame header, returning the byte size of the frame body that follows
    /// (0 if no valid header could be parsed from the buffered data).
    fn decode_header(&mut self) -> usize {
        let previous = self.header.map(|h| (h.bitrate_index, h.sample_rate_index, h.mode));
        let parsed = match header::parse_header(&mut self.buffer, previous) {
            Some(parsed) => parsed,
            None => {
                if previous.is_some() {
                    debug!("audio frame header lost sync or changed parameters");
                }
                return 0;
            }
        };
        self.samples.sample_rate = parsed.sample_rate;
        self.header = Some(parsed);
        parsed.data_size
    }

    fn decode_frame(&mut self) {
        let header = match self.header {
            Some(header) => header,
            None => return,
        };

        // Quantizer table lookups for this frame's mode, bitrate, and sample rate.
        let tab1 = if header.mode == ChannelMode::Mono { 0 } else { 1 };
        let tab2 = tables::QUANT_LUT_STEP_1[tab1][header.bitrate_index];
        let tab3 = tables::QUANT_LUT_STEP_2[tab2 as usize][header.sample_rate_index];
        let sblimit = (tab3 & 63) as usize;
        let tab3 = (tab3 >> 6) as usize;

        let bound = header.bound.min(sblimit);

        // Read the allocation information.
        for sb in 0..bound {
            self.allocation[0][sb] = self.read_allocation(sb, tab3);
            self.allocation[1][sb] = self.read_allocation(sb, tab3);
        }
        for sb in bound..sblimit {
            let alloc = self.read_allocation(sb, tab3);
            self.allocation[0][sb] = alloc;
            self.allocation[1][sb] = alloc;
        }

        // Read scale factor selector information.
        let channels = if header.mode == ChannelMode::Mono { 1 } else { 2 };
        for sb in 0..sblimit {
            for ch in 0..channels {
                if self.allocation[ch][sb].is_some() {
                    self.scale_factor_info[ch][sb] = self.buffer.read(2) as u8;
                }
            }
            if header.mode == ChannelMode::Mono {
                self.scale_factor_info[1][sb] = self.scale_factor_info[0][sb];
            }
        }

        // Read scale factors, expanded to one value per scale-factor part according to the
        // selector pattern.
        for sb in 0..sblimit {
            for ch in 0..channels {
                if self.allocation[ch][sb].is_some() {
                    let info = self.scale_factor_info[ch][sb];
                    let sf = &mut self.scale_factor[ch][sb];
                    match info {
                        0 => {
                            sf[0] = self.buffer.read(6) as i32;
                            sf[1] = self.buffer.read(6) as i32;
                            sf[2] = self.buffer.read(6) as i32;
                        }
                        1 => {
                            sf[0] = self.buffer.read(6) as i32;
                            sf[1] = sf[0];
                            sf[2] = self.buffer.read(6) as i32;
                        }
                        2 => {
                            sf[0] = self.buffer.read(6) as i32;
                            sf[1] = sf[0];
                            sf[2] = sf[0];
                        }
                        _ => {
                            sf[0] = self.buffer.read(6) as i32;
                            sf[1] = self.buffer.read(6) as i32;
                            sf[2] = sf[1];
                        }
                    }
                }
            }
            if header.mode == ChannelMode::Mono {
                self.scale_factor[1][sb] = self.scale_factor[0][sb];
            }
        }

        // Coefficient input and reconstruction: 3 parts of 4 granules, each granule yielding
        // 3 sub-blocks of 32 output samples per channel.
        let mut out_pos = 0;
        for part in 0..3 {
            for _granule in 0..4 {
                // Read the samples for this granule. Below the stereo bound both channels carry
                // their own samples; between bound and sblimit one set is shared; above the
                // sblimit the subbands are silent.
                for sb in 0..bound {
                    self.read_samples(0, sb, part);
                    self.read_samples(1, sb, part);
                }
                for sb in bound..sblimit {
                    self.read_samples(0, sb, part);
                    self.sample[1][sb] = self.sample[0][sb];
                }
                for sb in sblimit..32 {
                    self.sample[0][sb] = [0; 3];
                    self.sample[1][sb] = [0; 3];
                }

                for p in 0..3 {
                    self.v_pos = self.v_pos.wrapping_sub(64) & 1023;

                    for ch in 0..2 {
                        synthesis::idct32(&self.sample[ch], p, &mut self.v[ch], self.v_pos);

                        // Build U by sweeping the window D across V twice, then scale down to
                        // the final output samples.
                        self.u = [0.0; 32];

                        let mut d_index = 512 - (self.v_pos >> 1);
                        let mut v_index = (self.v_pos % 128) >> 1;
                        while v_index < 1024 {
                            for i in 0..32 {
                                self.u[i] += self.d[d_index] * self.v[ch][v_index];
                                d_index += 1;
                                v_index += 1;
                            }
                            v_index += 128 - 32;
                            d_index += 64 - 32;
                        }

                        d_index -= 512 - 32;
                        v_index = (128 - 32 + 1024) - v_index;
                        while v_index < 1024 {
                            for i in 0..32 {
                                self.u[i] += self.d[d_index] * self.v[ch][v_index];
                                d_index += 1;
                                v_index += 1;
                            }
                            v_index += 128 - 32;
                            d_index += 64 - 32;
                        }

                        for j in 0..32 {
                            self.samples.set(out_pos + j, ch, self.u[j] / 2_147_418_112.0);
                        }
                    }
                    out_pos += 32;
                }
            }
        }

        self.buffer.align();
    }

    /// Reads one subband's allocation code and resolves it to a quantizer, or `None` when the
    /// subband carries no bits this frame.
    fn read_allocation(&mut self, sb: usize, tab3: usize) -> Option<&'static QuantizerSpec> {
        let tab4 = tables::QUANT_LUT_STEP_3[tab3][sb];
        let code = self.buffer.read((tab4 >> 4) as usize) as usize;
        let qtab = tables::QUANT_LUT_STEP_4[(tab4 & 15) as usize][code];
        if qtab == 0 {
            None
        } else {
            Some(&tables::QUANT_TAB[qtab as usize - 1])
        }
    }

    /// Reads and requantizes the three samples of one (channel, subband) for scale-factor part
    /// `part`, leaving them in `self.sample`.
    fn read_samples(&mut self, ch: usize, sb: usize, part: usize) {
        let q = match self.allocation[ch][sb] {
            Some(q) => q,
            None => {
                self.sample[ch][sb] = [0; 3];
                return;
            }
        };

        // Resolve the scale factor: index 63 means silence, otherwise split into a base value
        // and a power-of-two shift.
        let sf = self.scale_factor[ch][sb][part];
        let sf = if sf == 63 {
            0
        } else {
            let shift = sf / 3;
            (tables::SCALEFACTOR_BASE[(sf % 3) as usize] + ((1 << shift) >> 1)) >> shift
        };

        // Decode the three raw samples: grouped triplets share one codeword, direct samples
        // are read back to back.
        let mut adj = q.levels;
        let mut raw = [0i32; 3];
        if q.group {
            let mut val = self.buffer.read(q.bits as usize) as i32;
            raw[0] = val % adj;
            val /= adj;
            raw[1] = val % adj;
            raw[2] = val / adj;
        } else {
            raw[0] = self.buffer.read(q.bits as usize) as i32;
            raw[1] = self.buffer.read(q.bits as usize) as i32;
            raw[2] = self.buffer.read(q.bits as usize) as i32;
        }

        // Postmultiply: recenter around zero, expand to 16 bits, and apply the scale factor in
        // two fixed-point halves so the intermediate products stay within 32 bits.
        let scale = 65536 / (adj + 1);
        adj = ((adj + 1) >> 1) - 1;

        for (out, &r) in self.sample[ch][sb].iter_mut().zip(raw.iter()) {
            let val = (adj - r) * scale;
            *out = (val * (sf >> 12) + ((val * (sf & 4095) + 2048) >> 12)) >> 12;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Mono, 48 kbit/s, 44.1 kHz, no CRC: 156-byte frames, 152 of them after the header. An
    // all-zero body allocates no bits to any subband, which decodes as digital silence.
    fn silent_frame() -> Vec<u8> {
        let mut bytes = vec![0xFF, 0xFD, 0x20, 0xC0];
        bytes.extend(std::iter::repeat(0u8).take(152));
        bytes
    }

    #[test]
    fn decodes_a_silent_frame_to_1152_zero_sample_pairs() {
        let mut decoder = AudioDecoder::new(BitBuffer::with_bytes(silent_frame()));
        assert!(decoder.has_header());
        assert_eq!(decoder.samplerate(), 44_100);

        let samples = decoder.decode().expect("expected a decoded frame");
        assert_eq!(samples.time, 0.0);
        assert_eq!(samples.interleaved.len(), SAMPLES_PER_FRAME * 2);
        assert!(samples.interleaved.iter().all(|&s| s == 0.0));

        // The clock advances by one frame's worth of samples.
        assert!((decoder.time() - 1152.0 / 44_100.0).abs() < 1e-9);
    }

    #[test]
    fn decode_returns_none_until_a_whole_frame_is_buffered() {
        let frame = silent_frame();
        let mut decoder = AudioDecoder::new(BitBuffer::ring(4096));
        decoder.feed(&frame[..40]);
        assert!(decoder.decode().is_none());
        decoder.feed(&frame[40..]);
        assert!(decoder.decode().is_some());
    }

    #[test]
    fn v_pos_stays_a_multiple_of_64() {
        let mut bytes = silent_frame();
        bytes.extend(silent_frame());
        let mut decoder = AudioDecoder::new(BitBuffer::with_bytes(bytes));
        assert!(decoder.decode().is_some());
        assert_eq!(decoder.v_pos % 64, 0);
        assert!(decoder.decode().is_some());
        assert_eq!(decoder.v_pos % 64, 0);
    }

    #[test]
    fn rewind_resets_the_clock() {
        let mut decoder = AudioDecoder::new(BitBuffer::with_bytes(silent_frame()));
        decoder.decode().expect("expected a decoded frame");
        decoder.rewind();
        assert_eq!(decoder.time(), 0.0);
        decoder.decode().expect("expected the same frame after rewind");
    }
}
