// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::PathBuf;

/// List of all errors.
#[derive(Debug)]
pub enum Error {
    /// The source image path doesn't exist, is not a file, or cannot be read.
    SourceNotFound(PathBuf),

    /// The source data is not a PNG, JPEG or GIF image.
    UnknownFormat,

    /// The source data has a known format, but cannot be decoded.
    DecodeError(String),

    /// An icon size is zero, too big or listed twice.
    InvalidConfiguration(String),

    /// Failed to encode an icon as PNG.
    EncodeError(String),

    /// An I/O error while reading the source or writing icons.
    Io(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<png::DecodingError> for Error {
    fn from(e: png::DecodingError) -> Self {
        Error::DecodeError(format!("malformed PNG: {}", e))
    }
}

impl From<png::EncodingError> for Error {
    fn from(e: png::EncodingError) -> Self {
        match e {
            png::EncodingError::IoError(e) => Error::Io(e),
            e => Error::EncodeError(e.to_string()),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Error::SourceNotFound(ref path) => {
                write!(f, "source image not found or not readable: {}", path.display())
            }
            Error::UnknownFormat => {
                write!(f, "source is not a PNG, JPEG or GIF image")
            }
            Error::DecodeError(ref msg) => {
                write!(f, "failed to decode the source image cause {}", msg)
            }
            Error::InvalidConfiguration(ref msg) => {
                write!(f, "invalid configuration: {}", msg)
            }
            Error::EncodeError(ref msg) => {
                write!(f, "failed to encode an icon cause {}", msg)
            }
            Error::Io(ref e) => {
                write!(f, "{}", e)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Io(ref e) => Some(e),
            _ => None,
        }
    }
}
