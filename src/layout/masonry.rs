//! `masonry-columns`: column balancing by cumulative height.

use alloc::vec;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

use super::{
    LayoutResult, Slot, frame_size, grid_shape, into_placements, slot_budget, span, unsatisfiable,
};
use crate::error::Error;
use crate::geometry::{Gravity, Size, gravity_offset_1d, height_for_width};
use crate::options::LayoutOptions;

pub(super) fn masonry_columns(
    images: &[Size],
    options: &LayoutOptions,
) -> Result<LayoutResult, Error> {
    let (cols, _) = grid_shape(images.len());
    let cols = cols.min(images.len() as u32);
    let widest = images.iter().map(|s| s.width).max().unwrap_or(1);
    let budget = slot_budget(options.width_bound(), cols, options)?;
    let mut column_width = budget.map_or(widest, |b| b.min(widest));
    // Applied to image heights once columns are down to 1 pixel.
    let mut height_scale = 1.0f64;

    loop {
        let (height, slots) = stack_columns(
            images,
            cols,
            column_width,
            height_scale,
            options.cell_spacing,
            &options.gravity,
        );
        match options.height_bound() {
            Some(bound) if height > bound as u64 => {
                let ratio = (bound as f64 / height as f64).min(0.99);
                if column_width > 1 {
                    let shrunk = (column_width as f64 * ratio) as u32;
                    column_width = shrunk.clamp(1, column_width - 1);
                } else if slots.iter().any(|s| s.size.height > 1) {
                    height_scale *= ratio;
                } else {
                    return Err(unsatisfiable(
                        options,
                        "1x1 images plus spacing still exceed the height bound",
                    ));
                }
            }
            _ => {
                return Ok(LayoutResult {
                    frame: frame_size(span(cols, column_width, options.cell_spacing), height)?,
                    placements: into_placements(slots),
                });
            }
        }
    }
}

/// Drop each image into the shortest column (leftmost on ties).
/// A `height_scale` below 1.0 scales every height, floored at 1 pixel.
/// Returns the tallest column height and the slots in input order.
fn stack_columns(
    images: &[Size],
    cols: u32,
    column_width: u32,
    height_scale: f64,
    spacing: u32,
    gravity: &Gravity,
) -> (u64, Vec<Slot>) {
    let spacing = spacing as u64;
    let pitch = column_width as u64 + spacing;
    let mut bottoms = vec![0u64; cols as usize];
    let mut slots = Vec::with_capacity(images.len());

    for &src in images {
        let width = src.width.min(column_width);
        let mut height = height_for_width(src, width);
        if height_scale < 1.0 {
            height = ((height as f64 * height_scale).round() as u32).max(1);
        }
        let size = Size::new(width, height);
        let (col, &y) = bottoms
            .iter()
            .enumerate()
            .min_by_key(|&(_, bottom)| bottom)
            .unwrap_or((0, &0));
        let dx = gravity_offset_1d(column_width - width, gravity, true) as u64;
        slots.push(Slot {
            x: col as u64 * pitch + dx,
            y,
            size,
        });
        bottoms[col] = y + size.height as u64 + spacing;
    }

    let height = bottoms
        .iter()
        .map(|b| b.saturating_sub(spacing))
        .max()
        .unwrap_or(0);
    (height, slots)
}
