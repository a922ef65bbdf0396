//! Layout options from `key=value&key=value` query strings.
//!
//! Handy when options arrive as a URL query or a CLI argument:
//!
//! ```
//! use zencombine::{Alignment, CanvasColor, query};
//!
//! let result = query::parse("?maxw=1200&gap=8&mode=masonry&bgcolor=black");
//! assert!(result.warnings.is_empty());
//!
//! let options = result.options;
//! assert_eq!(options.max_frame_width, 1200);
//! assert_eq!(options.cell_spacing, 8);
//! assert_eq!(options.alignment, Alignment::MasonryColumns);
//! assert_eq!(options.background_color, CanvasColor::black());
//! ```
//!
//! Missing keys keep their [`LayoutOptions`] default. Unknown keys and
//! unparseable values never fail the parse; they are reported as
//! [`ParseWarning`]s and otherwise ignored. Output keys (`format`,
//! `quality`, `filename`) don't affect layout and are kept in
//! [`ParseResult::extras`]. `filename` is never interpreted here; it is
//! passed through for the calling service to name its response.

mod color;
mod parse;

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::options::LayoutOptions;

pub use color::parse_color;

/// Result of parsing an option string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult {
    /// Options with every recognized key applied on top of the defaults.
    pub options: LayoutOptions,
    /// Recognized keys that don't affect layout (`format`, `quality`, `filename`).
    pub extras: BTreeMap<String, String>,
    /// Non-fatal problems, in input order.
    pub warnings: Vec<ParseWarning>,
}

/// Non-fatal warning from option parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A key appeared more than once (last value wins).
    DuplicateKey { key: String, value: String },
    /// A key is neither a layout option nor a known output key.
    KeyNotRecognized { key: String, value: String },
    /// A key was recognized but its value could not be parsed.
    ValueInvalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl core::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::DuplicateKey { key, value } => {
                write!(f, "duplicate key {key}={value}, last value wins")
            }
            Self::KeyNotRecognized { key, value } => write!(f, "unrecognized key {key}={value}"),
            Self::ValueInvalid { key, value, reason } => {
                write!(f, "invalid value {key}={value}: {reason}")
            }
        }
    }
}

/// Parse an option string (with or without leading `?`).
///
/// Every warning is also logged at `warn` level.
pub fn parse(query: &str) -> ParseResult {
    let result = parse::parse_query(query);
    for warning in &result.warnings {
        log::warn!("layout query: {warning}");
    }
    result
}

impl ParseResult {
    /// Download name requested through `filename`, percent-decoded and otherwise as given.
    pub fn filename(&self) -> Option<&str> {
        self.extras.get("filename").map(String::as_str)
    }
}

#[cfg(feature = "std")]
impl ParseResult {
    /// Output format requested through `format` and `quality`.
    ///
    /// `None` when `format` is absent or names something other than PNG or
    /// JPEG. JPEG quality falls back to 85 when missing or outside `1..=100`.
    pub fn output_format(&self) -> Option<crate::OutputFormat> {
        let format = self.extras.get("format")?;
        match format.trim().to_ascii_lowercase().as_str() {
            "png" => Some(crate::OutputFormat::Png),
            "jpg" | "jpeg" => {
                let quality = self
                    .extras
                    .get("quality")
                    .and_then(|q| q.trim().parse::<u8>().ok())
                    .filter(|q| (1..=100).contains(q));
                Some(match quality {
                    Some(quality) => crate::OutputFormat::Jpeg { quality },
                    None => crate::OutputFormat::JPEG_DEFAULT,
                })
            }
            _ => None,
        }
    }
}
