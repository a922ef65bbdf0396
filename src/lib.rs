//! Aspect-preserving grid layout and compositing of image batches.
//!
//! Two stages, usable separately:
//!
//! - [`compute_layout`]: pure geometry. Takes the pixel sizes of a batch and
//!   [`LayoutOptions`], returns a [`LayoutResult`]: the frame size and one
//!   non-overlapping [`Placement`] per image. `no_std` compatible.
//! - [`render`] / [`Compositor`]: resamples every [`ImageRecord`] into its
//!   placement, composites onto a background-filled canvas and encodes the
//!   canvas into a [`CompositeOutput`]. Requires `std`.
//!
//! # Example
//!
//! ```
//! use zencombine::{Alignment, LayoutOptions, Size, compute_layout};
//!
//! let sizes = [
//!     Size::new(100, 100),
//!     Size::new(200, 100),
//!     Size::new(100, 200),
//!     Size::new(300, 300),
//! ];
//! let layout = compute_layout(&sizes, &LayoutOptions::default()).unwrap();
//!
//! // 2×2 grid of 300×300 cells
//! assert_eq!(layout.frame, Size::new(600, 600));
//! // 200×100 is centered in the second cell, not enlarged
//! let p = layout.placements[1];
//! assert_eq!((p.x, p.y, p.width, p.height), (350, 100, 200, 100));
//! # let _ = Alignment::GridUniform;
//! ```
//!
//! # Modules
//!
//! - [`geometry`]: sizes, rects, gravity, canvas colors, contain-fit math
//! - [`options`]: layout options, alignment modes, resource limits
//! - [`layout`]: the layout engine
//! - [`compositor`]: resampling, compositing, encoding (`std`)
//! - [`query`]: `key=value` option parsing (feature `query`)
//! - [`svg`]: SVG diagram of a layout (feature `svg`)

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod color;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod options;

#[cfg(feature = "std")]
pub mod compositor;
#[cfg(feature = "std")]
pub mod record;
#[cfg(feature = "std")]
mod resample;

#[cfg(feature = "query")]
pub mod query;
#[cfg(feature = "svg")]
pub mod svg;

pub use error::{Error, ErrorKind};
pub use geometry::{CanvasColor, Gravity, Rect, Size};
pub use layout::{LayoutResult, Placement, compute_layout};
pub use options::{Alignment, LayoutOptions, Limits};

#[cfg(feature = "std")]
pub use compositor::{CompositeOutput, Compositor, OutputFormat, render};
#[cfg(feature = "std")]
pub use record::ImageRecord;
