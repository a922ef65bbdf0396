//! Error types for layout and compositing.

use core::fmt;

/// Broad category of an [`Error`], deciding who has to act on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed, empty or over-limit input. The caller must fix the input.
    InvalidInput,
    /// The geometry cannot satisfy the frame bounds. The caller must relax options.
    UnsatisfiableConstraint,
    /// Layout and render inputs disagree. An integration bug, fatal to the request.
    DimensionMismatch,
    /// Decoding or encoding pixel data failed.
    Codec,
}

/// Error returned by [`compute_layout`](crate::compute_layout) and
/// [`render`](crate::render).
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
    /// No images were supplied.
    EmptyBatch,
    /// An image has zero width or height.
    ZeroDimension { index: usize, width: u32, height: u32 },
    /// A layout option holds a value outside its domain.
    InvalidOption {
        name: &'static str,
        reason: &'static str,
    },
    /// A raw pixel buffer does not match its declared dimensions.
    InvalidBuffer { expected: usize, actual: usize },
    /// Record indices are not a permutation of `0..len`.
    RecordIndex { index: usize, len: usize },
    /// A caller-supplied limit was exceeded.
    LimitExceeded {
        limit: &'static str,
        actual: u64,
        max: u64,
    },
    /// The computed frame does not fit in `u32` pixel coordinates.
    FrameTooLarge { width: u64, height: u64 },
    /// The frame bounds cannot hold every image at the 1×1 pixel floor.
    Unsatisfiable {
        max_width: u32,
        max_height: u32,
        reason: &'static str,
    },
    /// Number of images differs from number of placements.
    DimensionMismatch { images: usize, placements: usize },
    /// A placement is unusable: unknown or repeated index, out of frame, overlapping.
    InvalidPlacement {
        image_index: usize,
        reason: &'static str,
    },
    /// The requested codec was compiled out.
    UnsupportedFormat(&'static str),
    /// Decoding or encoding failed inside the `image` crate.
    #[cfg(feature = "std")]
    Image(image::ImageError),
}

impl Error {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyBatch
            | Self::ZeroDimension { .. }
            | Self::InvalidOption { .. }
            | Self::InvalidBuffer { .. }
            | Self::RecordIndex { .. }
            | Self::LimitExceeded { .. }
            | Self::FrameTooLarge { .. } => ErrorKind::InvalidInput,
            Self::Unsatisfiable { .. } => ErrorKind::UnsatisfiableConstraint,
            Self::DimensionMismatch { .. } | Self::InvalidPlacement { .. } => {
                ErrorKind::DimensionMismatch
            }
            Self::UnsupportedFormat(_) => ErrorKind::Codec,
            #[cfg(feature = "std")]
            Self::Image(_) => ErrorKind::Codec,
        }
    }

    /// Never true. Layout and render are pure, so repeating a failed
    /// request with the same inputs fails the same way.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBatch => write!(f, "no images supplied"),
            Self::ZeroDimension {
                index,
                width,
                height,
            } => write!(f, "image {index} has zero dimension ({width}x{height})"),
            Self::InvalidOption { name, reason } => write!(f, "invalid option {name}: {reason}"),
            Self::InvalidBuffer { expected, actual } => {
                write!(f, "expected {expected} bytes of pixel data, got {actual}")
            }
            Self::RecordIndex { index, len } => {
                write!(f, "record index {index} is repeated or outside 0..{len}")
            }
            Self::LimitExceeded { limit, actual, max } => {
                write!(f, "{limit} limit exceeded: {actual} > {max}")
            }
            Self::FrameTooLarge { width, height } => {
                write!(f, "frame {width}x{height} exceeds u32 pixel coordinates")
            }
            Self::Unsatisfiable {
                max_width,
                max_height,
                reason,
            } => write!(
                f,
                "frame bounds {max_width}x{max_height} cannot be satisfied: {reason}"
            ),
            Self::DimensionMismatch { images, placements } => write!(
                f,
                "{images} images supplied for a layout with {placements} placements"
            ),
            Self::InvalidPlacement {
                image_index,
                reason,
            } => write!(f, "placement for image {image_index}: {reason}"),
            Self::UnsupportedFormat(name) => write!(f, "{name} support is not compiled in"),
            #[cfg(feature = "std")]
            Self::Image(e) => write!(f, "image codec error: {e}"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            #[cfg(feature = "std")]
            Self::Image(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Self::Image(e)
    }
}
