//! End-to-end rendering: layout, composite, encode, decode the result back.

#![cfg(all(feature = "std", feature = "png"))]

use image::{DynamicImage, Rgba, RgbaImage};
use zencombine::*;

fn solid(index: usize, w: u32, h: u32, px: [u8; 4]) -> ImageRecord {
    ImageRecord::new(
        index,
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba(px))),
    )
}

/// Opaque image whose every pixel is distinct enough to catch misplacement.
fn pattern(index: usize, w: u32, h: u32) -> ImageRecord {
    let img = RgbaImage::from_fn(w, h, |x, y| {
        Rgba([
            (x * 7 + index as u32 * 31) as u8,
            (y * 13) as u8,
            (x ^ y) as u8,
            255,
        ])
    });
    ImageRecord::new(index, DynamicImage::ImageRgba8(img))
}

fn decode(output: &CompositeOutput) -> RgbaImage {
    image::load_from_memory(&output.bytes).unwrap().to_rgba8()
}

fn inside(layout: &LayoutResult, x: u32, y: u32) -> Option<&Placement> {
    layout
        .placements
        .iter()
        .find(|p| x >= p.x && x < p.x + p.width && y >= p.y && y < p.y + p.height)
}

#[test]
fn record_count_must_match_placements() {
    let images: Vec<_> = (0..3).map(|i| solid(i, 8, 8, [0, 0, 0, 255])).collect();
    let layout = compute_layout(&[Size::new(8, 8); 2], &LayoutOptions::default()).unwrap();
    let err = render(&images, &layout, CanvasColor::white()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DimensionMismatch);
    assert!(matches!(
        err,
        Error::DimensionMismatch {
            images: 3,
            placements: 2
        }
    ));
}

#[test]
fn background_is_exact_and_sources_survive_resampling() {
    let colors = [
        [200, 30, 30, 255],
        [30, 200, 30, 255],
        [30, 30, 200, 255],
        [90, 90, 90, 255],
        [250, 250, 10, 255],
    ];
    let dims = [(320, 200), (150, 400), (97, 61), (640, 640), (33, 300)];
    let images: Vec<_> = colors
        .iter()
        .zip(dims)
        .enumerate()
        .map(|(i, (&c, (w, h)))| solid(i, w, h, c))
        .collect();
    let bg = [12, 34, 56, 255];

    for alignment in Alignment::ALL {
        let options = LayoutOptions::new()
            .alignment(alignment)
            .max_frame(500, 500)
            .spacing(6);
        let layout = compute_layout(&record::sizes(&images), &options).unwrap();
        let output = render(&images, &layout, CanvasColor::rgb(12, 34, 56)).unwrap();
        assert_eq!(output.mime_type(), "image/png");
        let canvas = decode(&output);
        assert_eq!(canvas.dimensions(), (layout.frame.width, layout.frame.height));

        for (x, y, px) in canvas.enumerate_pixels() {
            match inside(&layout, x, y) {
                None => assert_eq!(px.0, bg, "{alignment}: background at ({x},{y})"),
                Some(p) => {
                    let want = colors[p.image_index];
                    for c in 0..4 {
                        assert!(
                            px.0[c].abs_diff(want[c]) <= 1,
                            "{alignment}: image {} at ({x},{y}) is {:?}, want {want:?}",
                            p.image_index,
                            px.0
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn exact_size_placements_are_bit_identical() {
    let images = vec![pattern(0, 40, 30), pattern(1, 25, 50), pattern(2, 60, 20)];
    let layout = compute_layout(&record::sizes(&images), &LayoutOptions::new().spacing(2)).unwrap();
    let canvas = decode(&render(&images, &layout, CanvasColor::black()).unwrap());

    for (p, rec) in layout.placements.iter().zip(&images) {
        assert_eq!(p.size(), rec.size(), "unbounded layout must keep native size");
        let src = rec.image().to_rgba8();
        for (x, y, px) in src.enumerate_pixels() {
            assert_eq!(canvas.get_pixel(p.x + x, p.y + y), px, "image {}", p.image_index);
        }
    }
}

#[test]
fn identical_requests_produce_identical_bytes() {
    let images: Vec<_> = (0..6).map(|i| pattern(i, 50 + i as u32 * 17, 80)).collect();
    let options = LayoutOptions::new()
        .alignment(Alignment::MasonryColumns)
        .max_frame_width(200);
    let layout = compute_layout(&record::sizes(&images), &options).unwrap();
    let a = render(&images, &layout, CanvasColor::white()).unwrap();
    let b = render(&images, &layout, CanvasColor::white()).unwrap();
    assert_eq!(a.bytes, b.bytes);
    assert_eq!(a, b);
}

#[test]
fn concurrent_requests_render_identical_bytes() {
    let images: Vec<_> = (0..5).map(|i| pattern(i, 40 + i as u32 * 23, 90)).collect();
    let options = LayoutOptions::new()
        .alignment(Alignment::GridPacked)
        .max_frame(180, 180)
        .spacing(4);
    let layout = compute_layout(&record::sizes(&images), &options).unwrap();
    let expected = render(&images, &layout, CanvasColor::rgb(9, 9, 9)).unwrap();

    let outputs: Vec<CompositeOutput> = std::thread::scope(|s| {
        let workers: Vec<_> = (0..8)
            .map(|_| s.spawn(|| render(&images, &layout, CanvasColor::rgb(9, 9, 9)).unwrap()))
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });
    for output in outputs {
        assert_eq!(output.bytes, expected.bytes);
    }
}

#[test]
fn transparent_background_is_preserved_in_png() {
    let images = vec![solid(0, 10, 10, [255, 0, 0, 255]), solid(1, 10, 4, [255, 0, 0, 255])];
    let layout = compute_layout(&record::sizes(&images), &LayoutOptions::default()).unwrap();
    let canvas = decode(&render(&images, &layout, CanvasColor::Transparent).unwrap());
    assert_eq!(canvas.get_pixel(15, 0).0, [0, 0, 0, 0]);
    assert_eq!(canvas.get_pixel(15, 5).0, [255, 0, 0, 255]);
}

#[test]
fn decoded_records_render_end_to_end() {
    let mut encoded = Vec::new();
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(30, 20, Rgba([0, 128, 255, 255])))
        .write_to(&mut std::io::Cursor::new(&mut encoded), image::ImageFormat::Png)
        .unwrap();
    let images = vec![
        ImageRecord::decode(0, &encoded).unwrap(),
        ImageRecord::decode(1, &encoded).unwrap(),
    ];
    let layout = compute_layout(&record::sizes(&images), &LayoutOptions::default()).unwrap();
    let output = render(&images, &layout, CanvasColor::white()).unwrap();
    assert_eq!(decode(&output).dimensions(), (60, 20));
    assert_eq!(output.layout, layout);
}

#[test]
fn frame_limit_is_enforced_at_render() {
    let images = vec![solid(0, 100, 100, [0, 0, 0, 255])];
    let layout = compute_layout(&record::sizes(&images), &LayoutOptions::default()).unwrap();
    let err = Compositor::new()
        .limits(Limits::none().max_frame_pixels(9_999))
        .render(&images, &layout, CanvasColor::white())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[cfg(feature = "jpeg")]
#[test]
fn jpeg_output_flattens_and_decodes() {
    let images = vec![solid(0, 64, 64, [0, 0, 0, 0]), solid(1, 64, 32, [0, 0, 255, 255])];
    let layout = compute_layout(&record::sizes(&images), &LayoutOptions::default()).unwrap();
    let output = Compositor::new()
        .format(OutputFormat::JPEG_DEFAULT)
        .render(&images, &layout, CanvasColor::Transparent)
        .unwrap();
    assert_eq!(output.mime_type(), "image/jpeg");
    assert_eq!(output.extension(), "jpg");
    assert_eq!(&output.bytes[..2], &[0xFF, 0xD8]);

    let decoded = image::load_from_memory(&output.bytes).unwrap().to_rgb8();
    assert_eq!(decoded.dimensions(), (128, 64));
    // Transparent areas come out white after flattening.
    let [r, g, b] = decoded.get_pixel(10, 10).0;
    assert!(r > 245 && g > 245 && b > 245, "{:?}", [r, g, b]);
}
