// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::Error;

/// Typical WebExtension icon sizes.
pub const DEFAULT_SIZES: &[u32] = &[16, 32, 48, 64, 128, 256];

/// The biggest icon size we allow.
pub const MAX_SIZE: u32 = 8192;

/// A resampling filter.
///
/// Affects only the quality of the result, never the icon geometry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Filter {
    /// Nearest neighbor. No smoothing, the fastest one.
    Nearest,
    /// Bilinear interpolation.
    Bilinear,
    /// Bicubic interpolation.
    Bicubic,
}

impl Filter {
    pub(crate) fn quality(self) -> tiny_skia::FilterQuality {
        match self {
            Filter::Nearest => tiny_skia::FilterQuality::Nearest,
            Filter::Bilinear => tiny_skia::FilterQuality::Bilinear,
            Filter::Bicubic => tiny_skia::FilterQuality::Bicubic,
        }
    }
}

impl Default for Filter {
    fn default() -> Self {
        Filter::Bicubic
    }
}

impl std::str::FromStr for Filter {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nearest" => Ok(Filter::Nearest),
            "bilinear" => Ok(Filter::Bilinear),
            "bicubic" => Ok(Filter::Bicubic),
            _ => Err("invalid value"),
        }
    }
}

/// Icon generation options.
#[derive(Clone, Debug)]
pub struct Options {
    /// Icon sizes in pixels. Each one produces an `icon-<size>.png` file.
    ///
    /// Default: [`DEFAULT_SIZES`]
    pub sizes: Vec<u32>,

    /// A resampling filter.
    ///
    /// Default: bicubic
    pub filter: Filter,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            sizes: DEFAULT_SIZES.to_vec(),
            filter: Filter::default(),
        }
    }
}

impl Options {
    /// Checks that the sizes list is non-empty and every size is unique
    /// and in the `1..=MAX_SIZE` range.
    pub fn validate(&self) -> Result<(), Error> {
        if self.sizes.is_empty() {
            return Err(Error::InvalidConfiguration("no icon sizes".to_string()));
        }

        for (i, size) in self.sizes.iter().enumerate() {
            check_size(*size)?;

            if self.sizes[..i].contains(size) {
                return Err(Error::InvalidConfiguration(format!(
                    "size {} is listed twice",
                    size
                )));
            }
        }

        Ok(())
    }
}

pub(crate) fn check_size(size: u32) -> Result<(), Error> {
    if size == 0 {
        return Err(Error::InvalidConfiguration(
            "icon size must be positive".to_string(),
        ));
    }

    if size > MAX_SIZE {
        return Err(Error::InvalidConfiguration(format!(
            "icon size {} is bigger than {}",
            size, MAX_SIZE
        )));
    }

    Ok(())
}
