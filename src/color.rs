//! sRGB transfer functions.
//!
//! Resampling and alpha blending happen in linear light; source pixels and
//! the encoded canvas are sRGB. Inputs outside `0.0..=1.0` are clamped.

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Linear segment threshold on the encoded side (IEC 61966-2-1).
const SRGB_THRESHOLD: f64 = 0.04045;
/// Linear segment threshold on the linear side.
const LINEAR_THRESHOLD: f64 = 0.003_130_8;

/// sRGB EOTF: encoded `[0, 1]` → linear `[0, 1]`.
#[inline]
pub fn srgb_to_linear(e: f32) -> f32 {
    let e = (e as f64).clamp(0.0, 1.0);
    let l = if e <= SRGB_THRESHOLD {
        e / 12.92
    } else {
        ((e + 0.055) / 1.055).powf(2.4)
    };
    l as f32
}

/// Inverse sRGB EOTF: linear `[0, 1]` → encoded `[0, 1]`.
#[inline]
pub fn linear_to_srgb(l: f32) -> f32 {
    let l = (l as f64).clamp(0.0, 1.0);
    let e = if l <= LINEAR_THRESHOLD {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    };
    e as f32
}

/// Linear `[0, 1]` → 8-bit sRGB, rounded.
#[inline]
pub fn linear_to_srgb8(l: f32) -> u8 {
    unit_to_u8(linear_to_srgb(l))
}

/// `[0, 1]` → `0..=255`, rounded. NaN maps to 0.
#[inline]
pub fn unit_to_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
}
