//! Layout options, alignment modes and resource limits.
//!
//! Every field has a documented default. A missing option always means the
//! default, never an error.
//!
//! # Example
//!
//! ```
//! use zencombine::{Alignment, CanvasColor, LayoutOptions};
//!
//! let options = LayoutOptions::new()
//!     .max_frame(1920, 1080)
//!     .spacing(8)
//!     .alignment(Alignment::MasonryColumns)
//!     .background(CanvasColor::black());
//!
//! assert_eq!(options.max_frame_width, 1920);
//! assert!(options.validate().is_ok());
//! ```

use crate::error::Error;
use crate::geometry::{CanvasColor, Gravity};

/// How images are arranged on the frame.
#[non_exhaustive]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Alignment {
    /// Near-square grid of equal cells, one image per cell in input order.
    #[default]
    GridUniform,
    /// Shelf packing: rows of native-size images wrapped at the frame width.
    GridPacked,
    /// Column balancing: each image drops into the currently shortest column.
    MasonryColumns,
}

impl Alignment {
    /// All modes, in declaration order.
    pub const ALL: [Self; 3] = [Self::GridUniform, Self::GridPacked, Self::MasonryColumns];

    /// Canonical kebab-case name (`grid-uniform`, `grid-packed`, `masonry-columns`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GridUniform => "grid-uniform",
            Self::GridPacked => "grid-packed",
            Self::MasonryColumns => "masonry-columns",
        }
    }

    /// Look up a mode by canonical name or short alias, ASCII case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        const NAMES: &[(&str, Alignment)] = &[
            ("grid-uniform", Alignment::GridUniform),
            ("uniform", Alignment::GridUniform),
            ("grid", Alignment::GridUniform),
            ("grid-packed", Alignment::GridPacked),
            ("packed", Alignment::GridPacked),
            ("shelf", Alignment::GridPacked),
            ("masonry-columns", Alignment::MasonryColumns),
            ("masonry", Alignment::MasonryColumns),
            ("columns", Alignment::MasonryColumns),
        ];
        let name = name.trim();
        NAMES
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|&(_, a)| a)
    }
}

impl core::fmt::Display for Alignment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied ceilings that bound the memory of one request.
///
/// `None` means unlimited. Exceeding a limit fails the request before any
/// pixel buffer is allocated.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Limits {
    /// Maximum number of images in one batch.
    pub max_images: Option<usize>,
    /// Maximum sum of decoded source pixel bytes.
    ///
    /// Counts the decoded buffers only, about 4 bytes per 8-bit RGBA pixel.
    /// Resampling a source that does not land at its native size also holds
    /// a linear-light copy of 16 bytes per source pixel, plus a 16-byte
    /// per-pixel intermediate of destination width × source height. With
    /// `parallel`, several sources are resampled at once. Layouts from
    /// [`compute_layout`](crate::compute_layout) never enlarge, so the
    /// intermediate is at most source-sized and peak memory stays under about
    /// nine times this ceiling (4 + 16 + 16 bytes per 4 counted), plus the
    /// output tiles and canvas.
    pub max_input_bytes: Option<u64>,
    /// Maximum output frame area in pixels.
    pub max_frame_pixels: Option<u64>,
}

impl Limits {
    /// No limits.
    pub const fn none() -> Self {
        Self {
            max_images: None,
            max_input_bytes: None,
            max_frame_pixels: None,
        }
    }

    pub fn max_images(mut self, n: usize) -> Self {
        self.max_images = Some(n);
        self
    }

    pub fn max_input_bytes(mut self, bytes: u64) -> Self {
        self.max_input_bytes = Some(bytes);
        self
    }

    pub fn max_frame_pixels(mut self, pixels: u64) -> Self {
        self.max_frame_pixels = Some(pixels);
        self
    }

    pub(crate) fn check_images(&self, count: usize) -> Result<(), Error> {
        check("max_images", count as u64, self.max_images.map(|m| m as u64))
    }

    pub(crate) fn check_input_bytes(&self, bytes: u64) -> Result<(), Error> {
        check("max_input_bytes", bytes, self.max_input_bytes)
    }

    pub(crate) fn check_frame_pixels(&self, pixels: u64) -> Result<(), Error> {
        check("max_frame_pixels", pixels, self.max_frame_pixels)
    }
}

fn check(limit: &'static str, actual: u64, max: Option<u64>) -> Result<(), Error> {
    match max {
        Some(max) if actual > max => Err(Error::LimitExceeded { limit, actual, max }),
        _ => Ok(()),
    }
}

/// Options for [`compute_layout`](crate::compute_layout).
///
/// | field | default |
/// |---|---|
/// | `max_frame_width` | `0` (unbounded) |
/// | `max_frame_height` | `0` (unbounded) |
/// | `cell_spacing` | `0` |
/// | `alignment` | [`Alignment::GridUniform`] |
/// | `background_color` | opaque white |
/// | `gravity` | [`Gravity::Center`] |
/// | `limits` | [`Limits::none`] |
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    /// Upper bound on frame width in pixels. `0` = unbounded.
    pub max_frame_width: u32,
    /// Upper bound on frame height in pixels. `0` = unbounded.
    pub max_frame_height: u32,
    /// Pixels between adjacent cells, shelves or columns.
    pub cell_spacing: u32,
    /// Arrangement mode.
    pub alignment: Alignment,
    /// Fill for canvas area not covered by any image.
    pub background_color: CanvasColor,
    /// Position of an image inside spare cell space.
    pub gravity: Gravity,
    /// Resource ceilings.
    pub limits: Limits,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            max_frame_width: 0,
            max_frame_height: 0,
            cell_spacing: 0,
            alignment: Alignment::GridUniform,
            background_color: CanvasColor::white(),
            gravity: Gravity::Center,
            limits: Limits::none(),
        }
    }
}

impl LayoutOptions {
    /// Defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound both frame axes. `0` leaves an axis unbounded.
    pub fn max_frame(mut self, width: u32, height: u32) -> Self {
        self.max_frame_width = width;
        self.max_frame_height = height;
        self
    }

    pub fn max_frame_width(mut self, width: u32) -> Self {
        self.max_frame_width = width;
        self
    }

    pub fn max_frame_height(mut self, height: u32) -> Self {
        self.max_frame_height = height;
        self
    }

    pub fn spacing(mut self, pixels: u32) -> Self {
        self.cell_spacing = pixels;
        self
    }

    pub fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn background(mut self, color: CanvasColor) -> Self {
        self.background_color = color;
        self
    }

    pub fn gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Width bound, `None` when unbounded.
    pub(crate) fn width_bound(&self) -> Option<u32> {
        (self.max_frame_width > 0).then_some(self.max_frame_width)
    }

    /// Height bound, `None` when unbounded.
    pub(crate) fn height_bound(&self) -> Option<u32> {
        (self.max_frame_height > 0).then_some(self.max_frame_height)
    }

    /// Check option values. Run once at the start of every layout.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.gravity.is_valid() {
            return Err(Error::InvalidOption {
                name: "gravity",
                reason: "percentages must be finite and within 0.0..=1.0",
            });
        }
        if let CanvasColor::Linear { r, g, b, a } = self.background_color
            && [r, g, b, a].iter().any(|c| !c.is_finite())
        {
            return Err(Error::InvalidOption {
                name: "background_color",
                reason: "linear channels must be finite",
            });
        }
        Ok(())
    }
}
