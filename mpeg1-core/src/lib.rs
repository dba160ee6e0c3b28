// mpeg1-core
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared types beneath `mpeg1-format`, `mpeg1-video`, `mpeg1-audio`, and `mpeg1-player`:
//! the bit-addressed `BitBuffer`, the `Packet` the demuxer hands to decoders, decoded-frame
//! and decoded-sample storage, and the workspace's construction/I/O `Error` type.

pub mod audio;
pub mod bitbuffer;
pub mod errors;
pub mod frame;
pub mod packet;
pub mod units;

pub use bitbuffer::{BitBuffer, VlcEntry};
pub use errors::{Error, Result};
pub use packet::Packet;
