//! Pixel geometry shared by the layout engine and the compositor.
//!
//! Sizes, rectangles, gravity, canvas colors and the aspect-preserving fit
//! math. Pure integer/float arithmetic, `no_std` compatible.

#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::color;

/// Width × height dimensions in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel count, widened so it cannot overflow.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True when either axis is zero.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether `self` fits inside `other` on both axes.
    pub const fn fits_within(&self, other: Size) -> bool {
        self.width <= other.width && self.height <= other.height
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rect.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge, widened.
    pub const fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge, widened.
    pub const fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the two rects share at least one pixel.
    /// Empty rects never intersect anything.
    pub fn intersects(&self, other: &Rect) -> bool {
        if self.width == 0 || self.height == 0 || other.width == 0 || other.height == 0 {
            return false;
        }
        (self.x as u64) < other.right()
            && (other.x as u64) < self.right()
            && (self.y as u64) < other.bottom()
            && (other.y as u64) < self.bottom()
    }

    /// Whether this rect lies entirely inside `(0, 0, frame.width, frame.height)`.
    pub fn is_within(&self, frame: Size) -> bool {
        self.right() <= frame.width as u64 && self.bottom() <= frame.height as u64
    }
}

/// Where an image sits inside spare space (a grid cell, a shelf, a column).
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gravity {
    /// Center on both axes.
    #[default]
    Center,
    /// Position by percentage. `(0.0, 0.0)` = top-left, `(1.0, 1.0)` = bottom-right.
    Percentage(f32, f32),
}

impl Gravity {
    /// Top-left corner.
    pub const TOP_LEFT: Self = Self::Percentage(0.0, 0.0);
    /// Bottom-right corner.
    pub const BOTTOM_RIGHT: Self = Self::Percentage(1.0, 1.0);

    /// Whether both percentages are finite and within `0.0..=1.0`.
    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Center => true,
            Self::Percentage(x, y) => (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y),
        }
    }
}

/// Canvas background color.
///
/// `Srgb` is for user-facing colors in standard sRGB. `Linear` is for callers
/// already working in linear light. Both carry alpha.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CanvasColor {
    /// Transparent black `[0, 0, 0, 0]`.
    #[default]
    Transparent,
    /// sRGB color with alpha (8-bit per channel).
    Srgb { r: u8, g: u8, b: u8, a: u8 },
    /// Linear-light RGB with alpha, channels in `0.0..=1.0`.
    Linear { r: f32, g: f32, b: f32, a: f32 },
}

impl PartialEq for CanvasColor {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Transparent, Self::Transparent) => true,
            (Self::Srgb { .. }, Self::Srgb { .. }) => self.to_srgba8() == other.to_srgba8(),
            (
                Self::Linear {
                    r: r1,
                    g: g1,
                    b: b1,
                    a: a1,
                },
                Self::Linear {
                    r: r2,
                    g: g2,
                    b: b2,
                    a: a2,
                },
            ) => {
                r1.to_bits() == r2.to_bits()
                    && g1.to_bits() == g2.to_bits()
                    && b1.to_bits() == b2.to_bits()
                    && a1.to_bits() == a2.to_bits()
            }
            _ => false,
        }
    }
}

impl Eq for CanvasColor {}

impl core::hash::Hash for CanvasColor {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        core::mem::discriminant(self).hash(state);
        match self {
            Self::Transparent => {}
            Self::Srgb { r, g, b, a } => [*r, *g, *b, *a].hash(state),
            Self::Linear { r, g, b, a } => {
                [r.to_bits(), g.to_bits(), b.to_bits(), a.to_bits()].hash(state)
            }
        }
    }
}

impl CanvasColor {
    /// White, fully opaque.
    pub const fn white() -> Self {
        Self::Srgb {
            r: 255,
            g: 255,
            b: 255,
            a: 255,
        }
    }

    /// Black, fully opaque.
    pub const fn black() -> Self {
        Self::Srgb {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        }
    }

    /// Opaque sRGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::Srgb { r, g, b, a: 255 }
    }

    /// Resolve to 8-bit sRGB RGBA (straight alpha).
    pub fn to_srgba8(&self) -> [u8; 4] {
        match *self {
            Self::Transparent => [0, 0, 0, 0],
            Self::Srgb { r, g, b, a } => [r, g, b, a],
            Self::Linear { r, g, b, a } => [
                color::linear_to_srgb8(r),
                color::linear_to_srgb8(g),
                color::linear_to_srgb8(b),
                color::unit_to_u8(a),
            ],
        }
    }

    /// Whether the color fully hides whatever is beneath it.
    pub fn is_opaque(&self) -> bool {
        self.to_srgba8()[3] == 255
    }
}

// ============================================================================
// Fit math
// ============================================================================

/// Largest aspect-preserving size inside `bound` that never enlarges the source.
///
/// Sources already inside the bound keep their size. Larger sources are
/// scaled down with [`fit_inside`].
pub fn within(source: Size, bound: Size) -> Size {
    if source.fits_within(bound) {
        source
    } else {
        let (w, h) = fit_inside(source.width, source.height, bound.width, bound.height);
        Size::new(w.min(bound.width), h.min(bound.height))
    }
}

/// Scale a size uniformly by `factor` (`<= 1.0`), keeping each axis at least 1 pixel.
pub fn scale_down(source: Size, factor: f64) -> Size {
    if factor >= 1.0 {
        return source;
    }
    let w = (source.width as f64 * factor).round().max(1.0) as u32;
    let h = (source.height as f64 * factor).round().max(1.0) as u32;
    Size::new(w, h)
}

/// Height matching `width` at the source aspect ratio, at least 1 pixel.
pub fn height_for_width(source: Size, width: u32) -> u32 {
    if width == source.width {
        return source.height;
    }
    (source.height as f64 * width as f64 / source.width as f64)
        .round()
        .max(1.0) as u32
}

/// Compute dimensions that fit inside the target box, preserving aspect ratio.
/// One dimension matches the target; the other is ≤ target.
pub(crate) fn fit_inside(sw: u32, sh: u32, tw: u32, th: u32) -> (u32, u32) {
    let ratio_w = tw as f64 / sw as f64;
    let ratio_h = th as f64 / sh as f64;
    if ratio_w <= ratio_h {
        let h = proportional(sw, sh, tw, true, tw, th);
        (tw, h)
    } else {
        let w = proportional(sw, sh, th, false, tw, th);
        (w, th)
    }
}

/// Offset that positions an `inner` box inside an `outer` box by gravity.
pub(crate) fn gravity_offset(outer: Size, inner: Size, gravity: &Gravity) -> (u32, u32) {
    let x = gravity_offset_1d(outer.width.saturating_sub(inner.width), gravity, true);
    let y = gravity_offset_1d(outer.height.saturating_sub(inner.height), gravity, false);
    (x, y)
}

pub(crate) fn gravity_offset_1d(space: u32, gravity: &Gravity, horizontal: bool) -> u32 {
    if space == 0 {
        return 0;
    }
    match gravity {
        Gravity::Center => space / 2,
        Gravity::Percentage(x, y) => {
            let pct = if horizontal { *x } else { *y };
            let off = (space as f64 * pct.clamp(0.0, 1.0) as f64).round() as u32;
            off.min(space)
        }
    }
}

/// Compute the free dimension proportionally, with snap-aware rounding.
///
/// Given a ratio source (`ratio_w`×`ratio_h`), a fixed dimension (`basis`,
/// `basis_is_width`), and a snap target (`target_w`×`target_h`), compute
/// the free dimension, snapping to whichever candidate (source or target
/// dimension) is within the rounding loss. This keeps 1200×400 → 100×33
/// from coming out as 99×33.
fn proportional(
    ratio_w: u32,
    ratio_h: u32,
    basis: u32,
    basis_is_width: bool,
    target_w: u32,
    target_h: u32,
) -> u32 {
    let ratio = ratio_w as f64 / ratio_h as f64;

    let snap_amount = if basis_is_width {
        rounding_loss_height(ratio_w, ratio_h, target_h)
    } else {
        rounding_loss_width(ratio_w, ratio_h, target_w)
    };

    let snap_a = if basis_is_width { ratio_h } else { ratio_w };
    let snap_b = if basis_is_width { target_h } else { target_w };

    let exact = if basis_is_width {
        basis as f64 / ratio
    } else {
        ratio * basis as f64
    };

    let delta_a = (exact - snap_a as f64).abs();
    let delta_b = (exact - snap_b as f64).abs();

    let v = if delta_a <= snap_amount && delta_a <= delta_b {
        snap_a
    } else if delta_b <= snap_amount {
        snap_b
    } else {
        exact.round() as u32
    };

    v.max(1)
}

/// Rounding loss when target width is used as basis.
fn rounding_loss_width(ratio_w: u32, ratio_h: u32, target_width: u32) -> f64 {
    let ratio = ratio_w as f64 / ratio_h as f64;
    let recreate_y = ratio_h as f64 * (target_width as f64 / ratio_w as f64);
    (target_width as f64 - recreate_y.round() * ratio).abs()
}

/// Rounding loss when target height is used as basis.
fn rounding_loss_height(ratio_w: u32, ratio_h: u32, target_height: u32) -> f64 {
    let ratio = ratio_w as f64 / ratio_h as f64;
    let recreate_x = ratio_w as f64 * (target_height as f64 / ratio_h as f64);
    (target_height as f64 - recreate_x.round() / ratio).abs()
}
