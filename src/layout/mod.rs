//! Layout engine: placement rectangles for a batch of images.
//!
//! Pure geometry over `(width, height)` pairs. No pixel access, deterministic,
//! `no_std` compatible. Three arrangement modes share the same guarantees:
//!
//! - no two placements overlap
//! - every placement lies inside `[0, frame.width) × [0, frame.height)`
//! - every placement keeps its source aspect ratio within ±1 pixel
//! - every placement is at least 1×1 and never larger than its source
//!
//! # Example
//!
//! ```
//! use zencombine::{Alignment, LayoutOptions, Size, compute_layout};
//!
//! let sizes = [Size::new(640, 480), Size::new(480, 640), Size::new(800, 200)];
//! let options = LayoutOptions::new()
//!     .alignment(Alignment::GridPacked)
//!     .max_frame(1000, 0)
//!     .spacing(4);
//!
//! let layout = compute_layout(&sizes, &options).unwrap();
//! assert!(layout.frame.width <= 1000);
//! assert!(layout.validate().is_ok());
//! ```

mod grid;
mod masonry;
mod packed;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

use crate::error::Error;
use crate::geometry::{Rect, Size};
use crate::options::{Alignment, LayoutOptions};

/// Rectangle assigned to one source image on the output canvas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    /// Input-order index of the source image.
    pub image_index: usize,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    pub const fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Computed frame size plus one [`Placement`] per input image, in input order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutResult {
    /// Canvas dimensions.
    pub frame: Size,
    /// Placements, `placements[i].image_index == i`.
    pub placements: Vec<Placement>,
}

impl LayoutResult {
    pub fn frame_width(&self) -> u32 {
        self.frame.width
    }

    pub fn frame_height(&self) -> u32 {
        self.frame.height
    }

    /// Placement of the image with the given input index.
    pub fn placement_for(&self, image_index: usize) -> Option<&Placement> {
        self.placements
            .iter()
            .find(|p| p.image_index == image_index)
    }

    /// Fraction of the frame covered by images, `0.0..=1.0`.
    pub fn coverage(&self) -> f64 {
        let frame = self.frame.area();
        if frame == 0 {
            return 0.0;
        }
        let covered: u64 = self.placements.iter().map(|p| p.size().area()).sum();
        covered as f64 / frame as f64
    }

    /// Check the structural invariants every layout must hold.
    ///
    /// Image indices must be `0..len` with no repeats, every rect must be
    /// non-empty and inside the frame, and no two rects may overlap. Any
    /// violation is a [`DimensionMismatch`](crate::ErrorKind::DimensionMismatch)
    /// kind error, since it means layout and render disagree.
    pub fn validate(&self) -> Result<(), Error> {
        let n = self.placements.len();
        if self.frame.is_empty() {
            return Err(Error::InvalidPlacement {
                image_index: 0,
                reason: "frame has zero area",
            });
        }
        let mut seen = alloc::vec![false; n];
        for p in &self.placements {
            let bad = |reason| Error::InvalidPlacement {
                image_index: p.image_index,
                reason,
            };
            if p.image_index >= n {
                return Err(bad("image index out of range"));
            }
            if core::mem::replace(&mut seen[p.image_index], true) {
                return Err(bad("image index placed twice"));
            }
            if p.width == 0 || p.height == 0 {
                return Err(bad("empty rectangle"));
            }
            if !p.rect().is_within(self.frame) {
                return Err(bad("rectangle extends outside the frame"));
            }
        }

        // Sweep in x order; only rects starting before the current right edge can overlap.
        let mut order: Vec<&Placement> = self.placements.iter().collect();
        order.sort_unstable_by_key(|p| (p.x, p.y, p.image_index));
        for (i, a) in order.iter().enumerate() {
            let ra = a.rect();
            for b in &order[i + 1..] {
                if b.x as u64 >= ra.right() {
                    break;
                }
                if ra.intersects(&b.rect()) {
                    return Err(Error::InvalidPlacement {
                        image_index: b.image_index,
                        reason: "rectangle overlaps another placement",
                    });
                }
            }
        }
        Ok(())
    }
}

/// Compute placements for a batch of image sizes.
///
/// Fails with an [`InvalidInput`](crate::ErrorKind::InvalidInput) error for an
/// empty batch, a zero dimension, invalid options or an exceeded limit, and
/// with an [`UnsatisfiableConstraint`](crate::ErrorKind::UnsatisfiableConstraint)
/// error when the frame bounds cannot hold every image at 1×1 plus spacing.
pub fn compute_layout(images: &[Size], options: &LayoutOptions) -> Result<LayoutResult, Error> {
    options.validate()?;
    if images.is_empty() {
        return Err(Error::EmptyBatch);
    }
    options.limits.check_images(images.len())?;
    if let Some((index, s)) = images.iter().enumerate().find(|(_, s)| s.is_empty()) {
        return Err(Error::ZeroDimension {
            index,
            width: s.width,
            height: s.height,
        });
    }

    let layout = match options.alignment {
        Alignment::GridUniform => grid::grid_uniform(images, options)?,
        Alignment::GridPacked => packed::grid_packed(images, options)?,
        Alignment::MasonryColumns => masonry::masonry_columns(images, options)?,
    };
    options.limits.check_frame_pixels(layout.frame.area())?;
    debug_assert!(layout.validate().is_ok(), "{:?}", layout.validate());

    log::debug!(
        "{} layout: {} images in {}x{} frame, {:.1}% covered",
        options.alignment,
        images.len(),
        layout.frame.width,
        layout.frame.height,
        layout.coverage() * 100.0
    );
    Ok(layout)
}

// ============================================================================
// Shared helpers
// ============================================================================

/// Near-square grid shape: `cols = ceil(sqrt(n))`, `rows = ceil(n / cols)`.
pub(crate) fn grid_shape(n: usize) -> (u32, u32) {
    let n = n.max(1) as u64;
    let mut cols = (n as f64).sqrt() as u64;
    while cols * cols < n {
        cols += 1;
    }
    while cols > 1 && (cols - 1) * (cols - 1) >= n {
        cols -= 1;
    }
    let rows = n.div_ceil(cols);
    (cols as u32, rows as u32)
}

/// Largest width and largest height across the batch.
fn natural_cell(images: &[Size]) -> Size {
    images.iter().fold(Size::new(1, 1), |acc, s| {
        Size::new(acc.width.max(s.width), acc.height.max(s.height))
    })
}

/// Per-slot pixel budget on one axis, `None` when the axis is unbounded.
///
/// The bound is shared by `count` slots and `count - 1` gaps. A budget
/// under one pixel cannot hold even a 1×1 placement.
fn slot_budget(
    bound: Option<u32>,
    count: u32,
    options: &LayoutOptions,
) -> Result<Option<u32>, Error> {
    let Some(bound) = bound else {
        return Ok(None);
    };
    let count = count.max(1) as u64;
    let gaps = (count - 1) * options.cell_spacing as u64;
    let avail = (bound as u64)
        .checked_sub(gaps)
        .filter(|&a| a >= count)
        .ok_or_else(|| unsatisfiable(options, "bound cannot hold one pixel per slot plus spacing"))?;
    Ok(Some((avail / count) as u32))
}

/// Extent of `count` slots of `slot` pixels separated by `spacing`.
fn span(count: u32, slot: u32, spacing: u32) -> u64 {
    count as u64 * slot as u64 + (count as u64).saturating_sub(1) * spacing as u64
}

fn frame_size(width: u64, height: u64) -> Result<Size, Error> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok(Size::new(w.max(1), h.max(1))),
        _ => Err(Error::FrameTooLarge { width, height }),
    }
}

fn unsatisfiable(options: &LayoutOptions, reason: &'static str) -> Error {
    Error::Unsatisfiable {
        max_width: options.max_frame_width,
        max_height: options.max_frame_height,
        reason,
    }
}

/// A placement still in widened coordinates, before the frame is known to fit `u32`.
#[derive(Copy, Clone, Debug)]
struct Slot {
    x: u64,
    y: u64,
    size: Size,
}

fn into_placements(slots: Vec<Slot>) -> Vec<Placement> {
    slots
        .into_iter()
        .enumerate()
        .map(|(image_index, s)| Placement {
            image_index,
            x: s.x as u32,
            y: s.y as u32,
            width: s.size.width,
            height: s.size.height,
        })
        .collect()
}
