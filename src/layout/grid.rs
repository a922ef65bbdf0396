//! `grid-uniform`: near-square grid of equal cells.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use num_traits::Float;

use super::{
    LayoutResult, Slot, frame_size, grid_shape, into_placements, natural_cell, slot_budget, span,
};
use crate::error::Error;
use crate::geometry::{Size, gravity_offset, within};
use crate::options::LayoutOptions;

/// One image per cell, row-major in input order, each within-fit and
/// positioned by gravity inside its cell.
pub(super) fn grid_uniform(images: &[Size], options: &LayoutOptions) -> Result<LayoutResult, Error> {
    let (cols, rows) = grid_shape(images.len());
    let spacing = options.cell_spacing;
    let cell = cell_size(natural_cell(images), cols, rows, options)?;
    let frame = frame_size(
        span(cols, cell.width, spacing),
        span(rows, cell.height, spacing),
    )?;

    let pitch_x = cell.width as u64 + spacing as u64;
    let pitch_y = cell.height as u64 + spacing as u64;
    let slots: Vec<Slot> = images
        .iter()
        .enumerate()
        .map(|(i, &src)| {
            let col = (i % cols as usize) as u64;
            let row = (i / cols as usize) as u64;
            let size = within(src, cell);
            let (ox, oy) = gravity_offset(cell, size, &options.gravity);
            Slot {
                x: col * pitch_x + ox as u64,
                y: row * pitch_y + oy as u64,
                size,
            }
        })
        .collect();

    Ok(LayoutResult {
        frame,
        placements: into_placements(slots),
    })
}

/// Cell size: the natural cell (largest width × largest height), uniformly
/// shrunk until it fits the per-cell budget of every bounded axis. Never enlarged.
fn cell_size(natural: Size, cols: u32, rows: u32, options: &LayoutOptions) -> Result<Size, Error> {
    let budget_w = slot_budget(options.width_bound(), cols, options)?;
    let budget_h = slot_budget(options.height_bound(), rows, options)?;

    let scale = [
        budget_w.map(|b| b as f64 / natural.width as f64),
        budget_h.map(|b| b as f64 / natural.height as f64),
    ]
    .into_iter()
    .flatten()
    .fold(1.0f64, f64::min);
    if scale >= 1.0 {
        return Ok(natural);
    }

    let axis = |natural: u32, budget: Option<u32>| {
        let scaled = (natural as f64 * scale).round() as u32;
        scaled.clamp(1, budget.unwrap_or(u32::MAX).max(1))
    };
    Ok(Size::new(
        axis(natural.width, budget_w),
        axis(natural.height, budget_h),
    ))
}
