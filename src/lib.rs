// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
`iconset` turns a single raster image into a set of square PNG icons.

The source is scaled to fit each square while keeping its aspect ratio,
centered, and padded with transparency.

```no_run
let source = iconset::SourceImage::load("logo.png").unwrap();
let paths = iconset::generate(&source, "icons", &iconset::Options::default()).unwrap();
assert_eq!(paths.len(), 6);
```
*/

#![warn(missing_docs)]

use std::path::{Path, PathBuf};

pub use rgb::RGBA8;
pub use tiny_skia;

mod decode;
mod error;
mod geom;
mod options;
mod render;

pub use crate::decode::{ImageFormat, SourceImage};
pub use crate::error::Error;
pub use crate::geom::Layout;
pub use crate::options::{Filter, Options, DEFAULT_SIZES, MAX_SIZE};
pub use crate::render::render;

/// A rendered square icon.
#[derive(Clone)]
pub struct Icon {
    pixmap: tiny_skia::Pixmap,
}

impl Icon {
    fn from_pixmap(pixmap: tiny_skia::Pixmap) -> Self {
        debug_assert_eq!(pixmap.width(), pixmap.height());
        Icon { pixmap }
    }

    /// Returns the icon size. Width and height are always equal.
    pub fn size(&self) -> u32 {
        self.pixmap.width()
    }

    /// Returns the underlying premultiplied pixmap.
    pub fn pixmap(&self) -> tiny_skia::PixmapRef<'_> {
        self.pixmap.as_ref()
    }

    /// Returns an unpremultiplied pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<RGBA8> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some(RGBA8::new(c.red(), c.green(), c.blue(), c.alpha()))
    }

    /// Returns the icon content as unpremultiplied RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        use rgb::FromSlice;

        let mut data = self.pixmap.data().to_vec();
        demultiply_alpha(data.as_rgba_mut());
        data
    }

    /// Encodes the icon as an 8-bit RGBA PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, Error> {
        let mut data = Vec::new();
        self.write_png(&mut data)?;
        Ok(data)
    }

    /// Saves the icon as PNG at a provided path.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let file = std::fs::File::create(path)?;
        self.write_png(std::io::BufWriter::new(file))
    }

    fn write_png<W: std::io::Write>(&self, w: W) -> Result<(), Error> {
        let size = self.size();
        let mut encoder = png::Encoder::new(w, size, size);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.to_rgba8())?;
        writer.finish()?;
        Ok(())
    }
}

/// Returns an icon file name for the provided size.
///
/// ```
/// assert_eq!(iconset::icon_file_name(48), "icon-48.png");
/// ```
pub fn icon_file_name(size: u32) -> String {
    format!("icon-{}.png", size)
}

/// Renders and saves an icon for each size in `opt.sizes`.
///
/// The output directory, and all of its parents, are created when missing.
/// Options are validated before anything touches the file system.
///
/// Stops at the first error. Returns paths of the written files
/// in the `opt.sizes` order.
pub fn generate<P: AsRef<Path>>(
    source: &SourceImage,
    out_dir: P,
    opt: &Options,
) -> Result<Vec<PathBuf>, Error> {
    opt.validate()?;

    let out_dir = out_dir.as_ref();
    std::fs::create_dir_all(out_dir)?;

    let mut paths = Vec::with_capacity(opt.sizes.len());
    for &size in &opt.sizes {
        let icon = render(source, size, opt.filter)?;
        let path = out_dir.join(icon_file_name(size));
        icon.save_png(&path)?;
        log::debug!("Saved {}.", path.display());
        paths.push(path);
    }

    Ok(paths)
}

/// Demultiplies provided pixels alpha.
fn demultiply_alpha(data: &mut [RGBA8]) {
    for p in data {
        if p.a == 0 {
            continue;
        }

        let a = p.a as f64 / 255.0;
        p.b = (p.b as f64 / a + 0.5) as u8;
        p.g = (p.g as f64 / a + 0.5) as u8;
        p.r = (p.r as f64 / a + 0.5) as u8;
    }
}
