// mpeg1-core
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Presentation-time units.
//!
//! Every timestamp in this workspace — PACK SCR, packet PTS/DTS, decoded frame and sample
//! times — is a plain `f64` count of seconds since the start of the stream. This mirrors the
//! 90 kHz-clock-divided-down-to-seconds convention the demuxer already uses at the wire level
//! ; there is no separate fixed-point `TimeBase`/`TimeStamp` pair to convert through,
//! because nothing downstream of the demuxer needs tick-accurate arithmetic in another base.

/// Sentinel PTS for "no timestamp known", returned by the demuxer for packets that carry none
/// and by decoders before the first timestamped packet has been seen.
pub const INVALID_TS: f64 = f64::NEG_INFINITY;

/// True if `pts` is a real, usable timestamp (i.e. not [`INVALID_TS`]).
#[inline]
pub fn is_valid_ts(pts: f64) -> bool {
    pts.is_finite()
}
