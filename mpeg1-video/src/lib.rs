// mpeg1-video
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MPEG-1 Video (ISO/IEC 11172-2) decoder: sequence/picture/slice/macroblock parsing, motion
//! compensation, and the integer IDCT, producing YCbCr 4:2:0 `VideoFrame`s.

mod decoder;
mod tables;

pub use decoder::{VideoDecoder, VideoDecoderOptions};
