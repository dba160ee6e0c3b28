// mpeg1-audio
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MPEG-1 Audio Layer II (ISO/IEC 11172-3) elementary stream decoder.
//!
//! [`AudioDecoder`] consumes a raw Layer II stream from a `mpeg1_core::BitBuffer` — in the
//! player, a ring buffer fed with demuxed packet bodies — and produces 1152 interleaved
//! stereo `f32` sample pairs per frame.

mod decoder;
mod header;
mod synthesis;
mod tables;

pub use decoder::AudioDecoder;
pub use header::{ChannelMode, FrameHeader};
pub use tables::SAMPLE_RATE;
