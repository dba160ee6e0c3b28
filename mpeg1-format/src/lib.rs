// mpeg1-format
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MPEG-1 Program Stream demultiplexer: pack/system header parsing, packet iteration, stream
//! probing, and PTS-based seeking.

mod demuxer;

pub use demuxer::{Demuxer, ProbeResult};
