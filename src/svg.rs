//! SVG diagram of a computed layout.
//!
//! Draws the frame, every placement labelled with its image index and
//! size, and the uncovered background. Useful for eyeballing alignment modes
//! and for documentation.
//!
//! # Example
//!
//! ```
//! use zencombine::{Alignment, LayoutOptions, Size, compute_layout, svg::render_layout_svg};
//!
//! let sizes = [Size::new(400, 300), Size::new(300, 400), Size::new(500, 500)];
//! let options = LayoutOptions::new().alignment(Alignment::GridPacked).spacing(10);
//! let layout = compute_layout(&sizes, &options).unwrap();
//!
//! let svg = render_layout_svg(&layout);
//! assert!(svg.starts_with("<svg"));
//! ```

use alloc::format;
use alloc::string::String;

use crate::geometry::Size;
use crate::layout::LayoutResult;

/// Maximum drawn width of the frame.
const MAX_PANEL_W: f64 = 480.0;
/// Maximum drawn height of the frame.
const MAX_PANEL_H: f64 = 360.0;
const MARGIN: f64 = 30.0;
/// Height of the title line above the frame.
const LABEL_H: f64 = 24.0;

/// Render a complete SVG document for `layout`.
///
/// The frame is scaled to fit a fixed panel, so the document size does not
/// depend on the frame size.
pub fn render_layout_svg(layout: &LayoutResult) -> String {
    let (fw, fh, scale) = scale_to_fit(layout.frame);
    let total_w = fw.max(MAX_PANEL_W) + 2.0 * MARGIN;
    let total_h = MARGIN + LABEL_H + fh + MARGIN;

    let mut svg = String::with_capacity(1024 + layout.placements.len() * 256);
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        total_w as u32, total_h as u32, total_w, total_h
    ));
    svg.push('\n');
    svg.push_str(
        r##"<style>
  text { font-family: "Consolas", "DejaVu Sans Mono", "Courier New", monospace; }
  .label { font-size: 13px; font-weight: bold; fill: #333; }
  .index { fill: #fff; font-weight: bold; }
  .frame { fill: #e8e8e8; stroke: #999; stroke-width: 1; }
  .placement { fill: #6ba3d6; stroke: #2c6faa; stroke-width: 1; }
  @media (prefers-color-scheme: dark) {
    .label { fill: #e0e0e0; }
    .frame { fill: #2d2d2d; stroke: #555; }
    .placement { fill: #3a72a4; stroke: #5a9fd4; }
  }
</style>
"##,
    );

    let center_x = total_w / 2.0;
    let title = format!(
        "{}×{} frame, {} images, {:.0}% covered",
        layout.frame.width,
        layout.frame.height,
        layout.placements.len(),
        layout.coverage() * 100.0
    );
    svg.push_str(&format!(
        r#"<text x="{}" y="{}" class="label" text-anchor="middle">{}</text>"#,
        center_x,
        MARGIN + 14.0,
        escape_xml(&title)
    ));
    svg.push('\n');

    let panel_x = center_x - fw / 2.0;
    let panel_y = MARGIN + LABEL_H;
    svg.push_str(&format!(
        r#"<rect x="{panel_x:.1}" y="{panel_y:.1}" width="{fw:.1}" height="{fh:.1}" class="frame"/>"#
    ));
    svg.push('\n');

    for p in &layout.placements {
        let x = panel_x + p.x as f64 * scale;
        let y = panel_y + p.y as f64 * scale;
        let w = p.width as f64 * scale;
        let h = p.height as f64 * scale;
        svg.push_str(&format!(
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h:.1}" class="placement"><title>image {} at ({}, {}) {}×{}</title></rect>"#,
            p.image_index, p.x, p.y, p.width, p.height
        ));
        svg.push('\n');

        // Skip labels that could not be read at this scale.
        let font = (w.min(h) * 0.4).min(24.0);
        if font >= 6.0 {
            svg.push_str(&format!(
                r#"<text x="{:.1}" y="{:.1}" class="index" font-size="{font:.1}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                x + w / 2.0,
                y + h / 2.0,
                p.image_index
            ));
            svg.push('\n');
        }
    }

    svg.push_str("</svg>\n");
    svg
}

/// Scale `size` to fit within the panel, preserving aspect ratio.
/// Returns drawn width, drawn height and the scale factor.
fn scale_to_fit(size: Size) -> (f64, f64, f64) {
    let w = size.width as f64;
    let h = size.height as f64;
    if w == 0.0 || h == 0.0 {
        return (1.0, 1.0, 1.0);
    }
    let scale = (MAX_PANEL_W / w).min(MAX_PANEL_H / h);
    (w * scale, h * scale, scale)
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
