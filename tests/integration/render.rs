use iconset::{render, Error, Filter, Layout, SourceImage, DEFAULT_SIZES, RGBA8};

use crate::{
    content_bounds, encode_png, encode_png_with_depth, is_row_transparent, opaque, solid,
    solid_png, WIDE_GRADIENT,
};

const RED: RGBA8 = RGBA8 { r: 255, g: 0, b: 0, a: 255 };
const BLUE: RGBA8 = RGBA8 { r: 0, g: 0, b: 255, a: 255 };
const TRANSPARENT: RGBA8 = RGBA8 { r: 0, g: 0, b: 0, a: 0 };

#[test]
fn every_default_size_is_square() {
    for &size in DEFAULT_SIZES {
        let icon = render(&WIDE_GRADIENT, size, Filter::default()).unwrap();
        assert_eq!(icon.size(), size);
        assert_eq!(icon.pixmap().width(), size);
        assert_eq!(icon.pixmap().height(), size);
    }
}

#[test]
fn wide_source_is_centered_vertically() {
    let icon = render(&opaque(100, 50), 64, Filter::default()).unwrap();

    assert_eq!(content_bounds(&icon), Some((0, 16, 63, 47)));
    for y in (0..16).chain(48..64) {
        assert!(is_row_transparent(&icon, y), "row {} is not transparent", y);
    }
    for y in 16..48 {
        for x in 0..64 {
            assert_ne!(icon.pixel(x, y).unwrap().a, 0, "{}x{} is transparent", x, y);
        }
    }
}

#[test]
fn tall_source_is_centered_horizontally() {
    let icon = render(&opaque(50, 100), 64, Filter::default()).unwrap();
    assert_eq!(content_bounds(&icon), Some((16, 0, 47, 63)));
}

#[test]
fn square_source_fills_canvas() {
    let source = opaque(40, 40);
    for &size in DEFAULT_SIZES {
        assert!(Layout::fit(40, 40, size).unwrap().is_full());

        let icon = render(&source, size, Filter::default()).unwrap();
        assert!(
            icon.pixmap().pixels().iter().all(|p| p.alpha() != 0),
            "{}x{} icon has padding",
            size,
            size
        );
    }
}

#[test]
fn padding_margins_differ_by_at_most_one() {
    let sources = [(3, 1), (7, 3), (100, 33), (1, 5), (640, 480), (33, 100)];
    for (w, h) in sources {
        let source = opaque(w, h);
        for &size in DEFAULT_SIZES {
            let icon = render(&source, size, Filter::default()).unwrap();
            let (x0, y0, x1, y1) = content_bounds(&icon).unwrap();

            let (start, end) = if w >= h {
                (y0, size - 1 - y1)
            } else {
                (x0, size - 1 - x1)
            };

            assert!(end >= start, "{}x{} at {}: {} > {}", w, h, size, start, end);
            assert!(end - start <= 1, "{}x{} at {}: {} vs {}", w, h, size, start, end);
        }
    }
}

#[test]
fn aspect_ratio_is_preserved() {
    let sources = [(100, 50), (640, 480), (3, 7), (1920, 1080), (17, 16)];
    for (w, h) in sources {
        let source = opaque(w, h);
        for &size in DEFAULT_SIZES {
            let icon = render(&source, size, Filter::default()).unwrap();
            let (x0, y0, x1, y1) = content_bounds(&icon).unwrap();
            let (cw, ch) = (x1 - x0 + 1, y1 - y0 + 1);

            let layout = Layout::fit(w, h, size).unwrap();
            assert_eq!((cw, ch), (layout.width, layout.height));

            let expected_h = cw as f64 * h as f64 / w as f64;
            let expected_w = ch as f64 * w as f64 / h as f64;
            assert!(
                (ch as f64 - expected_h).abs() <= 1.0 || (cw as f64 - expected_w).abs() <= 1.0,
                "{}x{} at {} became {}x{}",
                w,
                h,
                size,
                cw,
                ch
            );
        }
    }
}

#[test]
fn rendering_is_deterministic() {
    for filter in [Filter::Nearest, Filter::Bilinear, Filter::Bicubic] {
        let a = render(&WIDE_GRADIENT, 48, filter).unwrap();
        let b = render(&WIDE_GRADIENT, 48, filter).unwrap();
        assert!(a.pixmap().data() == b.pixmap().data());
    }
}

#[test]
fn source_is_not_modified() {
    let source = WIDE_GRADIENT.clone();
    let before = source.pixmap().data().to_vec();
    for &size in DEFAULT_SIZES {
        render(&source, size, Filter::default()).unwrap();
    }
    assert!(source.pixmap().data() == before.as_slice());
}

#[test]
fn zero_size() {
    let res = render(&WIDE_GRADIENT, 0, Filter::default());
    assert!(matches!(res, Err(Error::InvalidConfiguration(_))));
}

#[test]
fn too_big_size() {
    let res = render(&WIDE_GRADIENT, iconset::MAX_SIZE + 1, Filter::default());
    assert!(matches!(res, Err(Error::InvalidConfiguration(_))));
}

#[test]
fn same_size_copies_pixels() {
    let data = [255, 0, 0, 255, 0, 0, 255, 255];
    let png = encode_png(2, 1, png::ColorType::Rgba, &data);
    let source = SourceImage::from_data(&png).unwrap();

    let icon = render(&source, 2, Filter::default()).unwrap();
    assert_eq!(icon.pixel(0, 0), Some(RED));
    assert_eq!(icon.pixel(1, 0), Some(BLUE));
    assert_eq!(icon.pixel(0, 1), Some(TRANSPARENT));
    assert_eq!(icon.pixel(1, 1), Some(TRANSPARENT));
}

#[test]
fn pixmap_source_at_same_size() {
    let mut pixmap = iconset::tiny_skia::Pixmap::new(3, 3).unwrap();
    pixmap.fill(iconset::tiny_skia::Color::from_rgba8(0, 0, 255, 255));
    let source = SourceImage::from_pixmap(pixmap);

    let icon = render(&source, 3, Filter::default()).unwrap();
    assert!(icon.pixmap().data() == source.pixmap().data());
}

#[test]
fn keeps_source_alpha() {
    let source = solid(4, 4, RGBA8::new(200, 100, 50, 128));
    let icon = render(&source, 4, Filter::default()).unwrap();

    let p = icon.pixel(1, 2).unwrap();
    assert_eq!(p.a, 128);
    assert!((p.r as i32 - 200).abs() <= 1, "{:?}", p);
    assert!((p.g as i32 - 100).abs() <= 1, "{:?}", p);
    assert!((p.b as i32 - 50).abs() <= 1, "{:?}", p);
}

#[test]
fn nearest_downscale_stays_opaque() {
    let icon = render(&opaque(300, 100), 48, Filter::Nearest).unwrap();
    assert_eq!(content_bounds(&icon), Some((0, 16, 47, 31)));
    for y in 16..32 {
        for x in 0..48 {
            assert_eq!(icon.pixel(x, y), Some(RGBA8::new(200, 40, 10, 255)));
        }
    }
}

#[test]
fn rgb_source_becomes_opaque() {
    let data = [10, 20, 30, 10, 20, 30, 10, 20, 30, 10, 20, 30];
    let source = SourceImage::from_data(&encode_png(2, 2, png::ColorType::Rgb, &data)).unwrap();

    let icon = render(&source, 2, Filter::default()).unwrap();
    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert_eq!(icon.pixel(x, y), Some(RGBA8::new(10, 20, 30, 255)));
    }
}

#[test]
fn grayscale_source() {
    let source =
        SourceImage::from_data(&encode_png(2, 2, png::ColorType::Grayscale, &[90; 4])).unwrap();

    let icon = render(&source, 2, Filter::default()).unwrap();
    assert_eq!(icon.pixel(1, 1), Some(RGBA8::new(90, 90, 90, 255)));
}

#[test]
fn grayscale_alpha_source() {
    let data = [90, 255, 90, 0];
    let png = encode_png(2, 1, png::ColorType::GrayscaleAlpha, &data);
    let source = SourceImage::from_data(&png).unwrap();

    let icon = render(&source, 2, Filter::default()).unwrap();
    assert_eq!(icon.pixel(0, 0), Some(RGBA8::new(90, 90, 90, 255)));
    assert_eq!(icon.pixel(1, 0).unwrap().a, 0);
}

#[test]
fn sixteen_bit_source() {
    let data = [
        0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0xff, 0xff, // red
        0x00, 0x00, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, // blue
    ];
    let png = encode_png_with_depth(2, 1, png::ColorType::Rgba, png::BitDepth::Sixteen, &data);
    let source = SourceImage::from_data(&png).unwrap();
    assert_eq!((source.width(), source.height()), (2, 1));

    let icon = render(&source, 2, Filter::default()).unwrap();
    assert_eq!(icon.pixel(0, 0), Some(RED));
    assert_eq!(icon.pixel(1, 0), Some(BLUE));
    assert!(is_row_transparent(&icon, 1));
}

#[test]
fn indexed_source() {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, 2, 1);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[0, 1]).unwrap();
    }

    let source = SourceImage::from_data(&buf).unwrap();
    assert_eq!((source.width(), source.height()), (2, 1));

    let icon = render(&source, 2, Filter::default()).unwrap();
    assert_eq!(icon.pixel(0, 0), Some(RED));
    assert_eq!(icon.pixel(1, 0), Some(BLUE));
}

#[test]
fn corrupted_png() {
    let png = solid_png(64, 64, RED);
    let res = SourceImage::from_data(&png[..png.len() / 2]);
    assert!(matches!(res, Err(Error::DecodeError(_))));
}

#[test]
fn unknown_format() {
    let res = SourceImage::from_data(b"<svg xmlns='http://www.w3.org/2000/svg'/>");
    assert!(matches!(res, Err(Error::UnknownFormat)));
}

#[cfg(feature = "jpeg")]
#[test]
fn rgb_jpeg_source() {
    let source = SourceImage::load("tests/images/rgb-16x16.jpg").unwrap();
    assert_eq!((source.width(), source.height()), (16, 16));
    assert!(source.pixmap().pixels().iter().all(|p| p.alpha() == 255));

    let icon = render(&source, 16, Filter::default()).unwrap();
    assert!(icon.pixmap().data() == source.pixmap().data());

    for &size in DEFAULT_SIZES {
        let icon = render(&source, size, Filter::default()).unwrap();
        assert_eq!(icon.size(), size);
        assert!(icon.pixmap().pixels().iter().all(|p| p.alpha() != 0));
    }
}

#[cfg(feature = "jpeg")]
#[test]
fn grayscale_jpeg_source() {
    let source = SourceImage::load("tests/images/gray-2x2.jpg").unwrap();
    assert_eq!((source.width(), source.height()), (2, 2));

    let icon = render(&source, 2, Filter::default()).unwrap();
    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        let p = icon.pixel(x, y).unwrap();
        assert_eq!(p.a, 255);
        assert!(p.r == p.g && p.g == p.b, "{:?}", p);
    }
}

#[cfg(feature = "gif")]
#[test]
fn animated_gif_uses_first_frame() {
    let mut buf = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut buf, 4, 2, &[]).unwrap();
        for color in [[255, 0, 0, 255], [0, 0, 255, 255]] {
            let mut pixels: Vec<u8> = color.iter().copied().cycle().take(4 * 2 * 4).collect();
            let frame = gif::Frame::from_rgba(4, 2, &mut pixels);
            encoder.write_frame(&frame).unwrap();
        }
    }

    let source = SourceImage::from_data(&buf).unwrap();
    assert_eq!((source.width(), source.height()), (4, 2));

    let icon = render(&source, 4, Filter::Nearest).unwrap();
    assert_eq!(content_bounds(&icon), Some((0, 1, 3, 2)));
    assert_eq!(icon.pixel(0, 1), Some(RED));
}

#[test]
fn encoded_icon() {
    let icon = render(&WIDE_GRADIENT, 32, Filter::default()).unwrap();
    let data = icon.encode_png().unwrap();

    let decoder = png::Decoder::new(data.as_slice());
    let reader = decoder.read_info().unwrap();
    assert_eq!(reader.info().width, 32);
    assert_eq!(reader.info().height, 32);
    assert_eq!(reader.info().color_type, png::ColorType::Rgba);
    assert_eq!(reader.info().bit_depth, png::BitDepth::Eight);

    // Premultiplication is lossy for non-opaque pixels.
    let decoded = SourceImage::from_data(&data).unwrap();
    for (a, b) in decoded.pixmap().data().iter().zip(icon.pixmap().data()) {
        assert!((*a as i32 - *b as i32).abs() <= 1);
    }
}
