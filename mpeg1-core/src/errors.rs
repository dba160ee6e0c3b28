// mpeg1-core
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction- and I/O-time errors for the workspace.
//!
//! This type is deliberately *not* used for the in-band decode failures described by the
//! bit-stream and codec layers (insufficient data, malformed macroblock, lost audio sync). Those
//! are self-healing by design: a caller that hits one simply calls again on the next start code.
//! Wrapping them in `Result` would force every decode loop to propagate and re-enter, which is
//! not how this format's demuxer/decoders are meant to be driven. `Error` surfaces only at setup
//! time: opening a source, or a source that turns out not to be the supported format.

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::result;

/// Errors reported by the workspace at construction and I/O boundaries.
#[derive(Debug)]
pub enum Error {
    /// An I/O error occurred while reading, writing, or seeking the source.
    IoError(io::Error),
    /// The source does not contain the headers this format requires (e.g. neither a probe nor
    /// straight-line parsing found a PACK/SYSTEM header pair).
    Unsupported(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Error::IoError(ref err) => write!(f, "io error: {}", err),
            Error::Unsupported(feature) => write!(f, "unsupported: {}", feature),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self {
            Error::IoError(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IoError(err)
    }
}

pub type Result<T> = result::Result<T, Error>;

/// Convenience function to create an unsupported-feature error.
pub fn unsupported_error<T>(feature: &'static str) -> Result<T> {
    Err(Error::Unsupported(feature))
}
