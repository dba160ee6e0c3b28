// mpeg1-core
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The `packet` module defines the unit of data the demuxer hands to a decoder.

use crate::units::INVALID_TS;

/// Program Stream start-code values that route a packet to a decoder.
pub mod stream_id {
    /// MPEG-1 video, stream 1 (`0xE0`). Streams `0xE1..=0xEF` exist in the standard but this
    /// player only demultiplexes a single video stream.
    pub const VIDEO_1: u8 = 0xE0;
    /// First of four audio streams this player exposes (`0xC0..=0xC3`).
    pub const AUDIO_1: u8 = 0xC0;
    pub const AUDIO_4: u8 = 0xC3;
    /// Private stream, consumed but never decoded.
    pub const PRIVATE: u8 = 0xBD;
    pub const PACK: u8 = 0xBA;
    pub const SYSTEM: u8 = 0xBB;
    pub const END: u8 = 0xB9;

    /// True if `code` names one of the elementary-stream packet kinds the demuxer forwards
    /// (video, private, or one of the four audio streams) rather than a container-level header.
    pub fn is_stream_packet(code: i32) -> bool {
        let code = code as i64;
        code == VIDEO_1 as i64
            || code == PRIVATE as i64
            || (AUDIO_1 as i64..=AUDIO_4 as i64).contains(&code)
    }
}

/// A discrete unit of elementary-stream data extracted from one PES packet.
///
/// `data` is an owned copy of the packet body rather than a borrow into the source `BitBuffer`:
/// a borrowed view would only stay valid until the next buffer read slides or compacts the
/// window, a lifetime no caller can reasonably uphold while also driving the demuxer. Copying
/// the (at most a few kilobytes) packet body sidesteps the hazard entirely; see DESIGN.md for
/// the tradeoff.
#[derive(Clone, Debug)]
pub struct Packet {
    /// The start-code byte that introduced this packet (`stream_id::VIDEO_1`, `AUDIO_1..=4`, or
    /// `PRIVATE`).
    pub kind: u8,
    /// Presentation timestamp in seconds, or [`INVALID_TS`] if the packet carried none.
    pub pts: f64,
    /// Packet body, stuffing and P-STD/PTS-DTS header fields already stripped.
    pub data: Box<[u8]>,
}

impl Packet {
    pub fn new(kind: u8, pts: f64, data: Vec<u8>) -> Self {
        Packet { kind, pts, data: data.into_boxed_slice() }
    }

    pub fn has_pts(&self) -> bool {
        crate::units::is_valid_ts(self.pts)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Default for Packet {
    fn default() -> Self {
        Packet { kind: 0, pts: INVALID_TS, data: Box::new([]) }
    }
}
