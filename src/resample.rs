//! Separable resampling in linear light.
//!
//! Each axis is filtered independently: area averaging when the axis
//! shrinks, bilinear interpolation when it grows, a plain copy when it keeps
//! its length. Filtering runs on premultiplied alpha in linear light, so
//! transparent pixels do not bleed dark fringes and averaged colors keep
//! their perceived brightness.

use std::sync::OnceLock;

use image::{DynamicImage, RgbaImage};

use crate::color::{linear_to_srgb8, srgb_to_linear, unit_to_u8};
use crate::geometry::Size;

/// Premultiplied linear RGBA.
pub(crate) type Px = [f32; 4];

/// Resample `src` to exactly `dst` pixels, returning straight-alpha sRGB.
pub(crate) fn resize(src: &DynamicImage, dst: Size) -> RgbaImage {
    let (sw, sh) = (src.width(), src.height());
    if (sw, sh) == (dst.width, dst.height) {
        return src.to_rgba8();
    }

    let pixels = to_linear_premultiplied(src);
    let x_taps = axis_taps(sw, dst.width);
    let y_taps = axis_taps(sh, dst.height);

    let (dw, sw) = (dst.width as usize, sw as usize);
    let mut horizontal: Vec<Px> = Vec::with_capacity(dw * sh as usize);
    for row in pixels.chunks_exact(sw) {
        horizontal.extend(x_taps.iter().map(|tap| tap.apply(|k| row[k])));
    }

    let mut out = RgbaImage::new(dst.width, dst.height);
    for (y, out_row) in out.chunks_exact_mut(dw * 4).enumerate() {
        let tap = &y_taps[y];
        for (x, px) in out_row.chunks_exact_mut(4).enumerate() {
            let v = tap.apply(|k| horizontal[k * dw + x]);
            px.copy_from_slice(&encode(v));
        }
    }
    out
}

/// Source positions and normalized weights contributing to one output sample.
#[derive(Clone, Debug, PartialEq)]
struct Tap {
    start: usize,
    weights: Vec<f32>,
}

impl Tap {
    fn apply(&self, sample: impl Fn(usize) -> Px) -> Px {
        let mut acc = [0.0f32; 4];
        for (k, &w) in self.weights.iter().enumerate() {
            let p = sample(self.start + k);
            for c in 0..4 {
                acc[c] += p[c] * w;
            }
        }
        acc
    }
}

/// Taps mapping a source axis of `src` samples onto `dst` samples.
fn axis_taps(src: u32, dst: u32) -> Vec<Tap> {
    let scale = src as f64 / dst as f64;
    (0..dst as usize)
        .map(|i| {
            if src == dst {
                Tap {
                    start: i,
                    weights: vec![1.0],
                }
            } else if dst < src {
                area_tap(i, scale, src as usize)
            } else {
                bilinear_tap(i, scale, src as usize)
            }
        })
        .collect()
}

/// Box filter over the exact source interval `[i*scale, (i+1)*scale)`,
/// with partial coverage at both ends.
fn area_tap(i: usize, scale: f64, src: usize) -> Tap {
    let lo = i as f64 * scale;
    let hi = (lo + scale).min(src as f64);
    let start = (lo.floor() as usize).min(src - 1);
    let end = (hi.ceil() as usize).clamp(start + 1, src);
    let mut weights: Vec<f32> = (start..end)
        .map(|j| {
            let covered = hi.min(j as f64 + 1.0) - lo.max(j as f64);
            covered.max(0.0) as f32
        })
        .collect();
    normalize(&mut weights);
    Tap { start, weights }
}

/// Two-tap linear interpolation between the neighbours of the sample center.
fn bilinear_tap(i: usize, scale: f64, src: usize) -> Tap {
    let center = ((i as f64 + 0.5) * scale - 0.5).clamp(0.0, (src - 1) as f64);
    let start = center.floor() as usize;
    let t = (center - start as f64) as f32;
    if start + 1 < src && t > 0.0 {
        Tap {
            start,
            weights: vec![1.0 - t, t],
        }
    } else {
        Tap {
            start,
            weights: vec![1.0],
        }
    }
}

fn normalize(weights: &mut [f32]) {
    let sum: f32 = weights.iter().sum();
    if sum > 0.0 {
        weights.iter_mut().for_each(|w| *w /= sum);
    }
}

fn srgb8_to_linear_table() -> &'static [f32; 256] {
    static TABLE: OnceLock<[f32; 256]> = OnceLock::new();
    TABLE.get_or_init(|| core::array::from_fn(|v| srgb_to_linear(v as f32 / 255.0)))
}

/// Decode to premultiplied linear RGBA.
///
/// 8-bit sources go through a lookup table. Deeper sources are read as
/// sRGB-encoded values in `[0, 1]` and converted exactly.
fn to_linear_premultiplied(src: &DynamicImage) -> Vec<Px> {
    let premultiply = |r: f32, g: f32, b: f32, a: f32| [r * a, g * a, b * a, a];
    match src {
        DynamicImage::ImageRgba16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb32F(_)
        | DynamicImage::ImageRgba32F(_) => src
            .to_rgba32f()
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                premultiply(
                    srgb_to_linear(r),
                    srgb_to_linear(g),
                    srgb_to_linear(b),
                    a.clamp(0.0, 1.0),
                )
            })
            .collect(),
        _ => {
            let lut = srgb8_to_linear_table();
            src.to_rgba8()
                .pixels()
                .map(|p| {
                    let [r, g, b, a] = p.0;
                    premultiply(
                        lut[r as usize],
                        lut[g as usize],
                        lut[b as usize],
                        a as f32 / 255.0,
                    )
                })
                .collect()
        }
    }
}

/// Premultiplied linear → straight-alpha sRGB8.
fn encode(px: Px) -> [u8; 4] {
    let a = px[3].clamp(0.0, 1.0);
    if a <= 0.0 {
        return [0, 0, 0, 0];
    }
    [
        linear_to_srgb8(px[0] / a),
        linear_to_srgb8(px[1] / a),
        linear_to_srgb8(px[2] / a),
        unit_to_u8(a),
    ]
}

/// Straight-alpha sRGB8 → premultiplied linear.
pub(crate) fn decode_pixel(px: [u8; 4]) -> Px {
    let lut = srgb8_to_linear_table();
    let a = px[3] as f32 / 255.0;
    [
        lut[px[0] as usize] * a,
        lut[px[1] as usize] * a,
        lut[px[2] as usize] * a,
        a,
    ]
}

/// Source-over blend of premultiplied `top` onto premultiplied `bottom`, encoded.
pub(crate) fn blend_over(top: Px, bottom: Px) -> [u8; 4] {
    let inv = 1.0 - top[3];
    encode([
        top[0] + bottom[0] * inv,
        top[1] + bottom[1] * inv,
        top[2] + bottom[2] * inv,
        top[3] + bottom[3] * inv,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn weights_sum(t: &Tap) -> f32 {
        t.weights.iter().sum()
    }

    #[test]
    fn identity_taps() {
        let taps = axis_taps(3, 3);
        assert_eq!(taps.len(), 3);
        assert!(taps.iter().enumerate().all(|(i, t)| t.start == i && t.weights == [1.0]));
    }

    #[test]
    fn halving_averages_pairs() {
        let taps = axis_taps(4, 2);
        assert_eq!(taps[0].start, 0);
        assert_eq!(taps[0].weights, vec![0.5, 0.5]);
        assert_eq!(taps[1].start, 2);
        assert_eq!(taps[1].weights, vec![0.5, 0.5]);
    }

    #[test]
    fn fractional_area_covers_partial_pixels() {
        // 3 → 2: each output covers 1.5 source pixels.
        let taps = axis_taps(3, 2);
        assert_eq!(taps[0].start, 0);
        assert!((taps[0].weights[0] - 2.0 / 3.0).abs() < 1e-6);
        assert!((taps[0].weights[1] - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(taps[1].start, 1);
        assert!((taps[1].weights[0] - 1.0 / 3.0).abs() < 1e-6);
        for t in &taps {
            assert!((weights_sum(t) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn upscale_is_bilinear_not_nearest() {
        let taps = axis_taps(2, 4);
        // Centers map to -0.25, 0.25, 0.75, 1.25 → clamped edges, blended middle.
        assert_eq!(taps[0].weights, vec![1.0]);
        assert_eq!(taps[1].start, 0);
        assert_eq!(taps[1].weights, vec![0.75, 0.25]);
        assert_eq!(taps[2].weights, vec![0.25, 0.75]);
        assert_eq!(taps[3].start, 1);
        assert_eq!(taps[3].weights, vec![1.0]);
    }

    #[test]
    fn extreme_downscale_stays_in_bounds() {
        for (src, dst) in [(1000, 1), (997, 13), (7, 3), (65_536, 7)] {
            let taps = axis_taps(src, dst);
            for t in &taps {
                assert!(t.start + t.weights.len() <= src as usize, "{src}->{dst}");
                assert!((weights_sum(t) - 1.0).abs() < 1e-4, "{src}->{dst}");
            }
        }
    }

    #[test]
    fn solid_color_survives_resize() {
        let src = DynamicImage::ImageRgba8(RgbaImage::from_pixel(37, 23, Rgba([200, 50, 10, 255])));
        for dst in [Size::new(10, 7), Size::new(80, 50), Size::new(37, 5)] {
            let out = resize(&src, dst);
            assert_eq!((out.width(), out.height()), (dst.width, dst.height));
            for p in out.pixels() {
                for c in 0..4 {
                    let want = [200u8, 50, 10, 255][c];
                    assert!(p.0[c].abs_diff(want) <= 1, "{:?} at {dst:?}", p.0);
                }
            }
        }
    }

    #[test]
    fn averaging_happens_in_linear_light() {
        // Black/white columns averaged: linear mean 0.5 encodes to ~188, not 128.
        let mut src = RgbaImage::new(2, 1);
        src.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        src.put_pixel(1, 0, Rgba([255, 255, 255, 255]));
        let out = resize(&DynamicImage::ImageRgba8(src), Size::new(1, 1));
        assert_eq!(out.get_pixel(0, 0).0, [188, 188, 188, 255]);
    }

    #[test]
    fn transparent_pixels_do_not_darken_edges() {
        let mut src = RgbaImage::new(2, 1);
        src.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        src.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        let out = resize(&DynamicImage::ImageRgba8(src), Size::new(1, 1));
        let [r, g, b, a] = out.get_pixel(0, 0).0;
        assert_eq!((r, g, b), (255, 0, 0));
        assert!(a.abs_diff(128) <= 1);
    }

    #[test]
    fn sixteen_bit_sources_are_supported() {
        let src = DynamicImage::ImageRgb16(image::ImageBuffer::from_pixel(
            8,
            8,
            image::Rgb([65535u16, 0, 32768]),
        ));
        let out = resize(&src, Size::new(4, 4));
        let p = out.get_pixel(3, 3).0;
        assert_eq!(p[0], 255);
        assert_eq!(p[1], 0);
        assert!(p[2].abs_diff(128) <= 1);
        assert_eq!(p[3], 255);
    }

    #[test]
    fn blend_over_opaque_background() {
        let bg = decode_pixel([255, 255, 255, 255]);
        assert_eq!(blend_over(decode_pixel([10, 20, 30, 255]), bg), [10, 20, 30, 255]);
        assert_eq!(blend_over(decode_pixel([0, 0, 0, 0]), bg), [255, 255, 255, 255]);
        // Alpha 128/255 black over white leaves linear ~0.498.
        assert_eq!(blend_over(decode_pixel([0, 0, 0, 128]), bg)[0], 187);
    }
}
