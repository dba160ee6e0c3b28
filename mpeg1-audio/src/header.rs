// mpeg1-audio
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MPEG-1 Audio Layer II frame header: sync search and field decode.

use mpeg1_core::BitBuffer;

use crate::tables;

const FRAME_SYNC: u32 = 0x7FF;
const MPEG_1: u32 = 0b11;
const LAYER_II: u32 = 0b10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelMode {
    Stereo,
    JointStereo,
    DualMono,
    Mono,
}

impl ChannelMode {
    pub fn channels(self) -> usize {
        if self == ChannelMode::Mono {
            1
        } else {
            2
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FrameHeader {
    pub bitrate_index: usize,
    pub sample_rate_index: usize,
    pub sample_rate: u32,
    pub mode: ChannelMode,
    pub bound: usize,
    /// Size in bytes of the frame body following the header (and CRC, if present).
    pub data_size: usize,
}

/// Scans forward, one byte at a time, for an `FF Fx` pair whose second byte carries the sync
/// tail plus MPEG-1/Layer-II version bits (`x & 0xE == 0xC`), and repositions the cursor just
/// past the 11-bit sync word. The sync pattern recurs inside real audio data often enough that
/// this resync also has to be guarded by the header-field comparison in `parse_header`.
fn find_frame_sync(buffer: &mut BitBuffer) -> bool {
    // Back up to the start of the byte holding the cursor: the failed sync read may have
    // stopped partway through a byte that itself begins a real sync pair.
    buffer.set_bit_index((buffer.bit_index() >> 3) * 8);
    loop {
        if !buffer.has(16) {
            return false;
        }
        let start = buffer.bit_index();
        let pair = buffer.read(16);
        if (pair >> 8) == 0xFF && (pair & 0xFE) == 0xFC {
            buffer.set_bit_index(start + 11);
            return true;
        }
        buffer.set_bit_index(start + 8);
    }
}

/// Parses the next Layer II frame header, returning `None` if there isn't enough data buffered
/// yet or the stream has genuinely lost sync and no resync candidate exists.
///
/// `previous` carries the prior frame's (bitrate_index, sample_rate_index, mode) so a spurious
/// resync that lands on a header with different parameters can be rejected.
pub fn parse_header(
    buffer: &mut BitBuffer,
    previous: Option<(usize, usize, ChannelMode)>,
) -> Option<FrameHeader> {
    if !buffer.has(48) {
        return None;
    }

    buffer.skip_bytes(0x00);
    if !buffer.has(48) {
        return None;
    }

    let sync = buffer.read(11);
    if sync != FRAME_SYNC && !find_frame_sync(buffer) {
        return None;
    }

    let version = buffer.read(2);
    let layer = buffer.read(2);
    let has_crc = buffer.read(1) == 0;

    if version != MPEG_1 || layer != LAYER_II {
        return None;
    }

    let bitrate_index = buffer.read(4) as usize;
    if bitrate_index == 0 || bitrate_index > 14 {
        return None;
    }
    let bitrate_index = bitrate_index - 1;

    let sample_rate_index = buffer.read(2) as usize;
    if sample_rate_index == 3 {
        return None;
    }

    let padding = buffer.read(1);
    buffer.skip(1); // private bit

    let mode_bits = buffer.read(2);
    let mode = match mode_bits {
        0b00 => ChannelMode::Stereo,
        0b01 => ChannelMode::JointStereo,
        0b10 => ChannelMode::DualMono,
        _ => ChannelMode::Mono,
    };

    if let Some((prev_bitrate, prev_rate, prev_mode)) = previous {
        if prev_bitrate != bitrate_index || prev_rate != sample_rate_index || prev_mode != mode {
            return None; // likely a false sync
        }
    }

    let bound = if mode == ChannelMode::JointStereo {
        (buffer.read(2) as usize + 1) << 2
    } else {
        buffer.skip(2);
        if mode == ChannelMode::Mono {
            0
        } else {
            32
        }
    };

    buffer.skip(4); // copyright, original, emphasis
    if has_crc {
        buffer.skip(16);
    }

    // Layer II frame size: 144 * bitrate / sample_rate bytes, plus one padding byte.
    let bitrate = tables::BIT_RATE[bitrate_index] as u64;
    let sample_rate = tables::SAMPLE_RATE[sample_rate_index];
    let frame_size = (144 * bitrate / sample_rate as u64) as usize + padding as usize;
    let data_size = frame_size.saturating_sub(if has_crc { 6 } else { 4 });

    Some(FrameHeader { bitrate_index, sample_rate_index, sample_rate, mode, bound, data_size })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 11-bit sync, MPEG-1, Layer II, no CRC, 48 kbit/s, 44.1 kHz, no padding, mono.
    const MONO_48K: [u8; 6] = [0xFF, 0xFD, 0x20, 0xC0, 0x00, 0x00];

    #[test]
    fn parses_a_mono_layer2_header() {
        let mut buffer = BitBuffer::with_bytes(MONO_48K.to_vec());
        let header = parse_header(&mut buffer, None).expect("expected a header");
        assert_eq!(header.mode, ChannelMode::Mono);
        assert_eq!(header.sample_rate, 44_100);
        assert_eq!(header.bound, 0);
        // 144 * 48000 / 44100 = 156 bytes, minus the 4 header bytes.
        assert_eq!(header.data_size, 152);
    }

    #[test]
    fn resyncs_past_leading_garbage() {
        let mut bytes = vec![0x12, 0x34, 0x56];
        bytes.extend_from_slice(&MONO_48K);
        let mut buffer = BitBuffer::with_bytes(bytes);
        let header = parse_header(&mut buffer, None).expect("expected a header after resync");
        assert_eq!(header.sample_rate, 44_100);
    }

    #[test]
    fn rejects_a_header_that_contradicts_the_previous_frame() {
        let mut buffer = BitBuffer::with_bytes(MONO_48K.to_vec());
        // Previous frame claimed a different bitrate: this sync must be treated as false.
        let previous = Some((5, 0, ChannelMode::Mono));
        assert!(parse_header(&mut buffer, previous).is_none());
    }

    #[test]
    fn rejects_layer_3() {
        // Same header with the layer field set to Layer III (0b01).
        let mut buffer = BitBuffer::with_bytes(vec![0xFF, 0xFB, 0x20, 0xC0, 0x00, 0x00]);
        assert!(parse_header(&mut buffer, None).is_none());
    }
}
