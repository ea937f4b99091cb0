// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::path::Path;

use crate::Error;

/// A raster image format.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ImageFormat {
    PNG,
    JPEG,
    GIF,
}

impl ImageFormat {
    /// Detects an image format by its magic bytes.
    pub fn from_data(data: &[u8]) -> Option<Self> {
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(ImageFormat::PNG)
        } else if data.starts_with(&[0xff, 0xd8, 0xff]) {
            Some(ImageFormat::JPEG)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(ImageFormat::GIF)
        } else {
            None
        }
    }
}

/// A decoded source image.
///
/// Pixels are always stored as premultiplied RGBA, no matter what the
/// original format was. Images without alpha become fully opaque.
#[derive(Clone)]
pub struct SourceImage {
    pixmap: tiny_skia::Pixmap,
}

impl SourceImage {
    /// Loads and decodes an image file.
    ///
    /// A path that doesn't point to a file, or a file that cannot be opened
    /// for reading, results in `Error::SourceNotFound`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::SourceNotFound(path.to_path_buf()));
        }

        let data = std::fs::read(path).map_err(|e| read_error(path, e))?;
        Self::from_data(&data)
    }

    /// Decodes a PNG, JPEG or GIF image from memory.
    pub fn from_data(data: &[u8]) -> Result<Self, Error> {
        let format = ImageFormat::from_data(data).ok_or(Error::UnknownFormat)?;
        let pixmap = match format {
            ImageFormat::PNG => decode_png(data)?,
            ImageFormat::JPEG => decode_jpeg(data)?,
            ImageFormat::GIF => decode_gif(data)?,
        };

        log::debug!("Decoded a {}x{} {:?} image.", pixmap.width(), pixmap.height(), format);
        Ok(SourceImage { pixmap })
    }

    /// Wraps an already decoded pixmap.
    pub fn from_pixmap(pixmap: tiny_skia::Pixmap) -> Self {
        SourceImage { pixmap }
    }

    /// Returns the image width. Never zero.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Returns the image height. Never zero.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Returns the underlying pixmap.
    pub fn pixmap(&self) -> tiny_skia::PixmapRef<'_> {
        self.pixmap.as_ref()
    }
}

fn read_error(path: &Path, e: std::io::Error) -> Error {
    match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
            log::warn!("Failed to read '{}': {}.", path.display(), e);
            Error::SourceNotFound(path.to_path_buf())
        }
        _ => Error::Io(e),
    }
}

fn new_pixmap(width: u32, height: u32) -> Result<tiny_skia::Pixmap, Error> {
    tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
        Error::DecodeError(format!("cannot allocate a {}x{} image", width, height))
    })
}

fn decode_png(data: &[u8]) -> Result<tiny_skia::Pixmap, Error> {
    let mut decoder = png::Decoder::new(data);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    if reader.info().bit_depth == png::BitDepth::Sixteen {
        log::warn!("16-bit PNG will be reduced to 8 bits per channel.");
    }

    let mut img_data = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut img_data)?;
    img_data.truncate(info.buffer_size());

    let mut pixmap = new_pixmap(info.width, info.height)?;
    match info.color_type {
        png::ColorType::Rgb => rgb_to_pixmap(&img_data, &mut pixmap),
        png::ColorType::Rgba => rgba_to_pixmap(&img_data, &mut pixmap),
        png::ColorType::Grayscale => gray_to_pixmap(&img_data, &mut pixmap),
        png::ColorType::GrayscaleAlpha => gray_alpha_to_pixmap(&img_data, &mut pixmap),
        // EXPAND turns palettes into RGB(A).
        png::ColorType::Indexed => {
            return Err(Error::DecodeError("unexpected indexed PNG output".to_string()));
        }
    }

    Ok(pixmap)
}

#[cfg(feature = "jpeg")]
fn decode_jpeg(data: &[u8]) -> Result<tiny_skia::Pixmap, Error> {
    let mut decoder = jpeg_decoder::Decoder::new(data);
    let img_data = decoder
        .decode()
        .map_err(|e| Error::DecodeError(format!("malformed JPEG: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| Error::DecodeError("JPEG has no header".to_string()))?;

    let mut pixmap = new_pixmap(u32::from(info.width), u32::from(info.height))?;
    match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => rgb_to_pixmap(&img_data, &mut pixmap),
        jpeg_decoder::PixelFormat::L8 => gray_to_pixmap(&img_data, &mut pixmap),
        jpeg_decoder::PixelFormat::CMYK32 => cmyk_to_pixmap(&img_data, &mut pixmap),
        _ => {
            return Err(Error::DecodeError("unsupported JPEG pixel format".to_string()));
        }
    }

    Ok(pixmap)
}

#[cfg(not(feature = "jpeg"))]
fn decode_jpeg(_: &[u8]) -> Result<tiny_skia::Pixmap, Error> {
    log::warn!("JPEG decoding was disabled by a build feature.");
    Err(Error::DecodeError("JPEG support is disabled".to_string()))
}

#[cfg(feature = "gif")]
fn decode_gif(data: &[u8]) -> Result<tiny_skia::Pixmap, Error> {
    let malformed = |e: gif::DecodingError| Error::DecodeError(format!("malformed GIF: {}", e));

    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(data).map_err(malformed)?;

    let pixmap = {
        let frame = decoder
            .read_next_frame()
            .map_err(malformed)?
            .ok_or_else(|| Error::DecodeError("GIF has no frames".to_string()))?;

        let (w, h) = (u32::from(frame.width), u32::from(frame.height));
        if frame.buffer.len() != w as usize * h as usize * tiny_skia::BYTES_PER_PIXEL {
            return Err(Error::DecodeError("GIF frame size mismatch".to_string()));
        }

        let mut pixmap = new_pixmap(w, h)?;
        rgba_to_pixmap(&frame.buffer, &mut pixmap);
        pixmap
    };

    if let Ok(Some(_)) = decoder.next_frame_info() {
        log::warn!("Animated GIF. Only the first frame will be used.");
    }

    Ok(pixmap)
}

#[cfg(not(feature = "gif"))]
fn decode_gif(_: &[u8]) -> Result<tiny_skia::Pixmap, Error> {
    log::warn!("GIF decoding was disabled by a build feature.");
    Err(Error::DecodeError("GIF support is disabled".to_string()))
}

fn rgb_to_pixmap(data: &[u8], pixmap: &mut tiny_skia::Pixmap) {
    use rgb::FromSlice;

    let mut i = 0;
    let dst = pixmap.data_mut();
    for p in data.as_rgb() {
        dst[i + 0] = p.r;
        dst[i + 1] = p.g;
        dst[i + 2] = p.b;
        dst[i + 3] = 255;

        i += tiny_skia::BYTES_PER_PIXEL;
    }
}

fn rgba_to_pixmap(data: &[u8], pixmap: &mut tiny_skia::Pixmap) {
    use rgb::FromSlice;

    let mut i = 0;
    let dst = pixmap.data_mut();
    for p in data.as_rgba() {
        let a = p.a as f64 / 255.0;
        dst[i + 0] = (p.r as f64 * a + 0.5) as u8;
        dst[i + 1] = (p.g as f64 * a + 0.5) as u8;
        dst[i + 2] = (p.b as f64 * a + 0.5) as u8;
        dst[i + 3] = p.a;

        i += tiny_skia::BYTES_PER_PIXEL;
    }
}

fn gray_to_pixmap(data: &[u8], pixmap: &mut tiny_skia::Pixmap) {
    let mut i = 0;
    let dst = pixmap.data_mut();
    for &gray in data {
        dst[i + 0] = gray;
        dst[i + 1] = gray;
        dst[i + 2] = gray;
        dst[i + 3] = 255;

        i += tiny_skia::BYTES_PER_PIXEL;
    }
}

fn gray_alpha_to_pixmap(data: &[u8], pixmap: &mut tiny_skia::Pixmap) {
    let mut i = 0;
    let dst = pixmap.data_mut();
    for slice in data.chunks_exact(2) {
        let a = slice[1] as f64 / 255.0;
        let gray = (slice[0] as f64 * a + 0.5) as u8;
        dst[i + 0] = gray;
        dst[i + 1] = gray;
        dst[i + 2] = gray;
        dst[i + 3] = slice[1];

        i += tiny_skia::BYTES_PER_PIXEL;
    }
}

#[cfg(feature = "jpeg")]
fn cmyk_to_pixmap(data: &[u8], pixmap: &mut tiny_skia::Pixmap) {
    let mut i = 0;
    let dst = pixmap.data_mut();
    for p in data.chunks_exact(4) {
        let k = 1.0 - p[3] as f64 / 255.0;
        dst[i + 0] = ((255 - p[0]) as f64 * k + 0.5) as u8;
        dst[i + 1] = ((255 - p[1]) as f64 * k + 0.5) as u8;
        dst[i + 2] = ((255 - p[2]) as f64 * k + 0.5) as u8;
        dst[i + 3] = 255;

        i += tiny_skia::BYTES_PER_PIXEL;
    }
}
