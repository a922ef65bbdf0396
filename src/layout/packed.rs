//! `grid-packed`: shelf packing of native-size images.
//!
//! Images keep input order, flowing left to right onto shelves that wrap at
//! the shelf width. When a frame bound is exceeded, every image is scaled by
//! the same factor and the batch is re-packed.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

use super::{LayoutResult, Slot, frame_size, into_placements, unsatisfiable};
use crate::error::Error;
use crate::geometry::{Gravity, Size, gravity_offset_1d, scale_down};
use crate::options::LayoutOptions;

/// Minimum shrink per retry, so the search always terminates.
const MAX_STEP: f64 = 0.99;

pub(super) fn grid_packed(images: &[Size], options: &LayoutOptions) -> Result<LayoutResult, Error> {
    let bound_w = options.width_bound();
    let bound_h = options.height_bound();
    let widest = images.iter().map(|s| s.width).max().unwrap_or(1);

    let mut scale = bound_w.map_or(1.0, |b| (b as f64 / widest as f64).min(1.0));
    loop {
        let sizes: Vec<Size> = images.iter().map(|&s| scale_down(s, scale)).collect();
        let shelf_width = match bound_w {
            Some(b) => b as u64,
            None => natural_shelf_width(&sizes, options.cell_spacing),
        };
        let (width, height, slots) =
            pack_shelves(&sizes, shelf_width, options.cell_spacing, &options.gravity);

        let fits_w = bound_w.is_none_or(|b| width <= b as u64);
        let fits_h = bound_h.is_none_or(|b| height <= b as u64);
        if fits_w && fits_h {
            return Ok(LayoutResult {
                frame: frame_size(width, height)?,
                placements: into_placements(slots),
            });
        }
        if sizes.iter().all(|s| s.width == 1 && s.height == 1) {
            return Err(unsatisfiable(
                options,
                "images at the 1x1 floor plus spacing still exceed the bounds",
            ));
        }

        let overshoot = [
            bound_w.map(|b| b as f64 / width as f64),
            bound_h.map(|b| b as f64 / height as f64),
        ]
        .into_iter()
        .flatten()
        .fold(MAX_STEP, f64::min);
        scale *= overshoot;
    }
}

/// Shelf width for an unbounded frame: side of a square holding the whole
/// batch including gaps, but never narrower than the widest image.
fn natural_shelf_width(sizes: &[Size], spacing: u32) -> u64 {
    let spacing = spacing as f64;
    let area: f64 = sizes
        .iter()
        .map(|s| (s.width as f64 + spacing) * (s.height as f64 + spacing))
        .sum();
    let side = area.sqrt().ceil() as u64;
    let widest = sizes.iter().map(|s| s.width as u64).max().unwrap_or(1);
    side.max(widest)
}

/// One closed shelf: index range into the slot list, and its extent.
struct Shelf {
    start: usize,
    end: usize,
    width: u64,
    height: u64,
}

/// Flow `sizes` onto shelves. Returns `(frame width, frame height, slots)`.
///
/// A shelf holds at least one image even when that image alone is wider
/// than `shelf_width`; the caller's bound check catches that case.
fn pack_shelves(
    sizes: &[Size],
    shelf_width: u64,
    spacing: u32,
    gravity: &Gravity,
) -> (u64, u64, Vec<Slot>) {
    let spacing = spacing as u64;
    let mut slots: Vec<Slot> = Vec::with_capacity(sizes.len());
    let mut shelves: Vec<Shelf> = Vec::new();
    let mut current = Shelf {
        start: 0,
        end: 0,
        width: 0,
        height: 0,
    };
    let mut y = 0u64;

    for (i, &size) in sizes.iter().enumerate() {
        let w = size.width as u64;
        if i > current.start && current.width + spacing + w > shelf_width {
            y += current.height + spacing;
            let next = Shelf {
                start: i,
                end: i,
                width: 0,
                height: 0,
            };
            shelves.push(core::mem::replace(&mut current, next));
        }
        let x = if i == current.start {
            0
        } else {
            current.width + spacing
        };
        slots.push(Slot { x, y, size });
        current.end = i + 1;
        current.width = x + w;
        current.height = current.height.max(size.height as u64);
    }
    let height = y + current.height;
    shelves.push(current);

    let width = shelves.iter().map(|s| s.width).max().unwrap_or(0);
    for shelf in &shelves {
        let dx = gravity_offset_1d((width - shelf.width) as u32, gravity, true) as u64;
        for slot in &mut slots[shelf.start..shelf.end] {
            let spare = (shelf.height - slot.size.height as u64) as u32;
            slot.x += dx;
            slot.y += gravity_offset_1d(spare, gravity, false) as u64;
        }
    }
    (width, height, slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::layout::compute_layout;
    use crate::options::Alignment;
    use alloc::vec;

    fn packed() -> LayoutOptions {
        LayoutOptions::new().alignment(Alignment::GridPacked)
    }

    #[test]
    fn shelves_wrap_at_bound() {
        let sizes = [
            Size::new(60, 40),
            Size::new(30, 20),
            Size::new(50, 30),
            Size::new(40, 40),
        ];
        let layout = compute_layout(&sizes, &packed().max_frame_width(100).spacing(5)).unwrap();
        // Shelf 1: 60 + 5 + 30 = 95. Shelf 2: 50 + 5 + 40 = 95.
        assert_eq!(layout.frame, Size::new(95, 85));
        let p: Vec<_> = layout.placements.iter().map(|p| (p.x, p.y)).collect();
        // Shorter images centered vertically within their shelf.
        assert_eq!(p, vec![(0, 0), (65, 10), (0, 50), (55, 45)]);
    }

    #[test]
    fn narrow_shelf_is_centered_horizontally() {
        let sizes = [Size::new(80, 10), Size::new(40, 10)];
        let layout = compute_layout(&sizes, &packed().max_frame_width(100)).unwrap();
        assert_eq!(layout.frame, Size::new(80, 20));
        assert_eq!((layout.placements[1].x, layout.placements[1].y), (20, 10));
    }

    #[test]
    fn unbounded_frame_is_near_square() {
        let sizes = vec![Size::new(100, 100); 9];
        let layout = compute_layout(&sizes, &packed()).unwrap();
        assert_eq!(layout.frame, Size::new(300, 300));
        assert!((layout.coverage() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn wide_image_sets_minimum_shelf_width() {
        let sizes = [Size::new(1000, 10), Size::new(10, 10)];
        let layout = compute_layout(&sizes, &packed()).unwrap();
        assert_eq!(layout.frame.width, 1000);
        assert_eq!(layout.placements[0].size(), Size::new(1000, 10));
    }

    #[test]
    fn height_bound_shrinks_everything() {
        let sizes = vec![Size::new(100, 100); 4];
        let options = packed().max_frame(200, 100);
        let layout = compute_layout(&sizes, &options).unwrap();
        assert!(layout.frame.width <= 200 && layout.frame.height <= 100);
        let first = layout.placements[0].size();
        assert!(first.width < 100);
        assert!(layout.placements.iter().all(|p| p.size() == first));
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn spacing_alone_can_be_unsatisfiable() {
        let sizes = vec![Size::new(8, 8); 4];
        let err = compute_layout(&sizes, &packed().max_frame(5, 5).spacing(10)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsatisfiableConstraint);
    }
}
