// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/// Placement of the scaled source inside a square icon canvas.
///
/// The content is scaled by `min(size / width, size / height)`, so it touches
/// the canvas on the longer axis and is centered on the shorter one.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Layout {
    /// Scaled content width.
    pub width: u32,
    /// Scaled content height.
    pub height: u32,
    /// Left offset of the content.
    pub x: u32,
    /// Top offset of the content.
    pub y: u32,
}

impl Layout {
    /// Fits a `src_width`x`src_height` image into a `size`x`size` square.
    ///
    /// Scaled dimensions are truncated, not rounded. When padding cannot be
    /// split evenly the extra pixel goes to the right/bottom margin.
    ///
    /// Returns `None` when any of the dimensions is zero.
    pub fn fit(src_width: u32, src_height: u32, size: u32) -> Option<Self> {
        if src_width == 0 || src_height == 0 || size == 0 {
            return None;
        }

        let (width, height) = scale_to_fit(src_width, src_height, size);
        Some(Layout {
            width,
            height,
            x: (size - width) / 2,
            y: (size - height) / 2,
        })
    }

    /// Checks that the content fills the whole canvas.
    pub fn is_full(&self) -> bool {
        self.x == 0 && self.y == 0 && self.width == self.height
    }
}

/// Computes `floor(dim * ratio)` for both axes using integers only.
///
/// The dominant axis always becomes exactly `size`. Each axis is at least 1px.
fn scale_to_fit(w: u32, h: u32, size: u32) -> (u32, u32) {
    let scale = |v: u32, dominant: u32| -> u32 {
        let n = u64::from(v) * u64::from(size) / u64::from(dominant);
        (n as u32).max(1)
    };

    if w >= h {
        (size, scale(h, w))
    } else {
        (scale(w, h), size)
    }
}
