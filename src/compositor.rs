//! Rendering: resample every image into its placement, composite onto the
//! background, encode.
//!
//! # Example
//!
//! ```
//! use zencombine::{CanvasColor, Compositor, ImageRecord, LayoutOptions, OutputFormat, compute_layout};
//!
//! let images = vec![
//!     ImageRecord::from_rgba8(0, 4, 2, vec![255; 4 * 2 * 4]).unwrap(),
//!     ImageRecord::from_rgba8(1, 2, 4, vec![0; 2 * 4 * 4]).unwrap(),
//! ];
//! let sizes = zencombine::record::sizes(&images);
//! let layout = compute_layout(&sizes, &LayoutOptions::default()).unwrap();
//!
//! let output = Compositor::new()
//!     .format(OutputFormat::Png)
//!     .render(&images, &layout, CanvasColor::black())
//!     .unwrap();
//! assert_eq!(output.mime_type(), "image/png");
//! assert_eq!(output.layout, layout);
//! ```

use std::time::Instant;

use image::{Rgb, RgbImage, Rgba, RgbaImage};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Error;
use crate::geometry::CanvasColor;
use crate::layout::{LayoutResult, Placement};
use crate::options::Limits;
use crate::record::ImageRecord;
use crate::resample::{self, Px, blend_over, decode_pixel};

/// Encoded output container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OutputFormat {
    /// Lossless PNG with alpha.
    #[default]
    Png,
    /// Baseline JPEG, `quality` in `1..=100`. Alpha is flattened over white.
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// JPEG at the quality the combiner has always shipped with.
    pub const JPEG_DEFAULT: Self = Self::Jpeg { quality: 85 };

    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }

    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }
}

/// Encoded frame plus the layout that produced it.
///
/// The placements double as the manifest: which source image occupies which
/// region of the frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeOutput {
    /// Encoded image file.
    pub bytes: Vec<u8>,
    /// Layout used for rendering.
    pub layout: LayoutResult,
    /// Container of `bytes`.
    pub format: OutputFormat,
}

impl CompositeOutput {
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Configured renderer.
///
/// Holds no per-request state; one instance can serve any number of
/// concurrent requests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Compositor {
    format: OutputFormat,
    limits: Limits,
}

impl Compositor {
    /// PNG output, no limits.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Composite and encode. Either a complete output or an error, never a partial frame.
    pub fn render(
        &self,
        images: &[ImageRecord],
        layout: &LayoutResult,
        background: CanvasColor,
    ) -> Result<CompositeOutput, Error> {
        if let OutputFormat::Jpeg { quality } = self.format
            && !(1..=100).contains(&quality)
        {
            return Err(Error::InvalidOption {
                name: "quality",
                reason: "JPEG quality must be within 1..=100",
            });
        }
        let canvas = self.compose(images, layout, background)?;
        let bytes = encode(&canvas, self.format)?;
        Ok(CompositeOutput {
            bytes,
            layout: layout.clone(),
            format: self.format,
        })
    }

    /// Composite without encoding. Returns the straight-alpha sRGB canvas.
    pub fn compose(
        &self,
        images: &[ImageRecord],
        layout: &LayoutResult,
        background: CanvasColor,
    ) -> Result<RgbaImage, Error> {
        if images.len() != layout.placements.len() {
            let err = Error::DimensionMismatch {
                images: images.len(),
                placements: layout.placements.len(),
            };
            log::error!("render rejected: {err}");
            return Err(err);
        }
        let records = index_records(images)?;
        if let Err(err) = layout.validate() {
            log::error!("render rejected: {err}");
            return Err(err);
        }
        self.limits.check_images(images.len())?;
        self.limits
            .check_input_bytes(images.iter().map(ImageRecord::byte_len).sum())?;
        self.limits.check_frame_pixels(layout.frame.area())?;
        let canvas_bytes = layout.frame.area().saturating_mul(4);
        if usize::try_from(canvas_bytes).is_err() {
            return Err(Error::FrameTooLarge {
                width: layout.frame.width as u64,
                height: layout.frame.height as u64,
            });
        }

        let started = Instant::now();
        let jobs: Vec<_> = layout
            .placements
            .iter()
            .map(|p| (p.size(), records[p.image_index]))
            .collect();
        #[cfg(feature = "parallel")]
        let tiles: Vec<RgbaImage> = jobs
            .par_iter()
            .map(|(size, rec)| resample::resize(rec.image(), *size))
            .collect();
        #[cfg(not(feature = "parallel"))]
        let tiles: Vec<RgbaImage> = jobs
            .iter()
            .map(|(size, rec)| resample::resize(rec.image(), *size))
            .collect();

        let frame = layout.frame;
        let bg = background.to_srgba8();
        let bg_linear = decode_pixel(bg);
        let mut canvas = RgbaImage::from_pixel(frame.width, frame.height, Rgba(bg));
        let stride = frame.width as usize * 4;

        // Each worker owns whole canvas rows; placements never overlap, so
        // every pixel under a placement still holds the background.
        let raw: &mut [u8] = &mut canvas;
        #[cfg(feature = "parallel")]
        raw.par_chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| paint_row(y, row, &layout.placements, &tiles, bg_linear));
        #[cfg(not(feature = "parallel"))]
        raw.chunks_mut(stride)
            .enumerate()
            .for_each(|(y, row)| paint_row(y, row, &layout.placements, &tiles, bg_linear));

        log::debug!(
            "composited {} images into {}x{} in {:?}",
            images.len(),
            frame.width,
            frame.height,
            started.elapsed()
        );
        Ok(canvas)
    }
}

/// Paint canvas row `y` from every placement crossing it.
fn paint_row(
    y: usize,
    row: &mut [u8],
    placements: &[Placement],
    tiles: &[RgbaImage],
    bg_linear: Px,
) {
    let y = y as u64;
    for (p, tile) in placements.iter().zip(tiles) {
        if y < p.y as u64 || y >= p.rect().bottom() {
            continue;
        }
        let len = p.width as usize * 4;
        let ty = (y - p.y as u64) as usize;
        let src = &tile.as_raw()[ty * len..][..len];
        let dst = &mut row[p.x as usize * 4..][..len];
        for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
            let s = [s[0], s[1], s[2], s[3]];
            match s[3] {
                0 => {}
                255 => d.copy_from_slice(&s),
                _ => d.copy_from_slice(&blend_over(decode_pixel(s), bg_linear)),
            }
        }
    }
}

/// Composite and encode with default settings (PNG, no limits).
///
/// Fails with [`Error::DimensionMismatch`] when `images` and
/// `layout.placements` differ in length.
pub fn render(
    images: &[ImageRecord],
    layout: &LayoutResult,
    background: CanvasColor,
) -> Result<CompositeOutput, Error> {
    Compositor::default().render(images, layout, background)
}

/// Records addressed by their input index. Indices must cover `0..len` exactly once.
fn index_records(images: &[ImageRecord]) -> Result<Vec<&ImageRecord>, Error> {
    let len = images.len();
    let mut slots: Vec<Option<&ImageRecord>> = vec![None; len];
    for rec in images {
        let slot = slots
            .get_mut(rec.index())
            .filter(|s| s.is_none())
            .ok_or(Error::RecordIndex {
                index: rec.index(),
                len,
            })?;
        *slot = Some(rec);
    }
    Ok(slots.into_iter().flatten().collect())
}

fn encode(canvas: &RgbaImage, format: OutputFormat) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    match format {
        OutputFormat::Png => encode_png(canvas, &mut bytes)?,
        OutputFormat::Jpeg { quality } => encode_jpeg(&flatten(canvas), quality, &mut bytes)?,
    }
    Ok(bytes)
}

/// Drop alpha by compositing over opaque white.
fn flatten(canvas: &RgbaImage) -> RgbImage {
    let white = decode_pixel([255, 255, 255, 255]);
    RgbImage::from_fn(canvas.width(), canvas.height(), |x, y| {
        let p = canvas.get_pixel(x, y).0;
        let [r, g, b, _] = if p[3] == 255 {
            p
        } else {
            blend_over(decode_pixel(p), white)
        };
        Rgb([r, g, b])
    })
}

#[cfg(feature = "png")]
fn encode_png(canvas: &RgbaImage, out: &mut Vec<u8>) -> Result<(), Error> {
    use image::ImageEncoder;
    image::codecs::png::PngEncoder::new(out).write_image(
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(())
}

#[cfg(not(feature = "png"))]
fn encode_png(_: &RgbaImage, _: &mut Vec<u8>) -> Result<(), Error> {
    Err(Error::UnsupportedFormat("png"))
}

#[cfg(feature = "jpeg")]
fn encode_jpeg(canvas: &RgbImage, quality: u8, out: &mut Vec<u8>) -> Result<(), Error> {
    use image::ImageEncoder;
    image::codecs::jpeg::JpegEncoder::new_with_quality(out, quality).write_image(
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        image::ExtendedColorType::Rgb8,
    )?;
    Ok(())
}

#[cfg(not(feature = "jpeg"))]
fn encode_jpeg(_: &RgbImage, _: u8, _: &mut Vec<u8>) -> Result<(), Error> {
    Err(Error::UnsupportedFormat("jpeg"))
}
