// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::geom::Layout;
use crate::options::{check_size, Filter};
use crate::{Error, Icon, SourceImage};

/// Renders a `size`x`size` icon.
///
/// The source is scaled to fit the square while keeping its aspect ratio
/// and centered. The rest of the canvas stays fully transparent.
///
/// The source itself is never modified, so the same image can be rendered
/// at any number of sizes.
pub fn render(source: &SourceImage, size: u32, filter: Filter) -> Result<Icon, Error> {
    check_size(size)?;

    // Unwrap is safe, because the source and the size are both non-zero.
    let layout = Layout::fit(source.width(), source.height(), size).unwrap();
    log::debug!(
        "{}x{} -> {}x{} at {},{} on a {}x{} canvas",
        source.width(),
        source.height(),
        layout.width,
        layout.height,
        layout.x,
        layout.y,
        size,
        size
    );

    let resized = if layout.width == source.width() && layout.height == source.height() {
        None
    } else {
        let pixmap = resample(source.pixmap(), layout.width, layout.height, filter)
            .ok_or_else(|| Error::InvalidConfiguration("failed to resize the source".to_string()))?;
        Some(pixmap)
    };

    if layout.is_full() {
        let pixmap = resized.unwrap_or_else(|| source.pixmap().to_owned());
        return Ok(Icon::from_pixmap(pixmap));
    }

    let mut canvas = tiny_skia::Pixmap::new(size, size).ok_or_else(|| {
        Error::InvalidConfiguration(format!("cannot allocate a {}x{} icon", size, size))
    })?;

    let content = match resized {
        Some(ref pixmap) => pixmap.as_ref(),
        None => source.pixmap(),
    };

    // Source-over onto a transparent canvas is a plain copy, so the content
    // alpha is preserved as is.
    canvas.draw_pixmap(
        layout.x as i32,
        layout.y as i32,
        content,
        &tiny_skia::PixmapPaint::default(),
        tiny_skia::Transform::default(),
        None,
    );

    Ok(Icon::from_pixmap(canvas))
}

/// Resizes an image to exactly `width`x`height`.
///
/// Downscaling by more than 2x halves the image with a bilinear filter first,
/// which averages 2x2 blocks. Otherwise bilinear/bicubic would simply skip
/// source pixels. The last step uses the requested filter.
fn resample(
    src: tiny_skia::PixmapRef<'_>,
    width: u32,
    height: u32,
    filter: Filter,
) -> Option<tiny_skia::Pixmap> {
    let mut current: Option<tiny_skia::Pixmap> = None;

    if filter != Filter::Nearest {
        loop {
            let img = current.as_ref().map(|p| p.as_ref()).unwrap_or(src);
            let (w, h) = (img.width(), img.height());
            if w < width * 2 && h < height * 2 {
                break;
            }

            let (next_w, next_h) = ((w / 2).max(width), (h / 2).max(height));
            current = Some(scale(img, next_w, next_h, tiny_skia::FilterQuality::Bilinear)?);
        }
    }

    let img = current.as_ref().map(|p| p.as_ref()).unwrap_or(src);
    if img.width() == width && img.height() == height {
        return match current {
            Some(pixmap) => Some(pixmap),
            None => Some(src.to_owned()),
        };
    }

    scale(img, width, height, filter.quality())
}

fn scale(
    src: tiny_skia::PixmapRef<'_>,
    width: u32,
    height: u32,
    quality: tiny_skia::FilterQuality,
) -> Option<tiny_skia::Pixmap> {
    let mut pixmap = tiny_skia::Pixmap::new(width, height)?;
    let rect = tiny_skia::Rect::from_xywh(0.0, 0.0, width as f32, height as f32)?;

    let ts = tiny_skia::Transform::from_scale(
        width as f32 / src.width() as f32,
        height as f32 / src.height() as f32,
    );

    let mut paint = tiny_skia::Paint::default();
    paint.shader = tiny_skia::Pattern::new(src, tiny_skia::SpreadMode::Pad, quality, 1.0, ts);
    paint.blend_mode = tiny_skia::BlendMode::Source;
    // Integer rect. Edges must not be blended.
    paint.anti_alias = false;

    pixmap.fill_rect(rect, &paint, tiny_skia::Transform::default(), None);
    Some(pixmap)
}
