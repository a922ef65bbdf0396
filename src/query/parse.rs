//! Query string tokenizer and value parsers.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use super::color::parse_color;
use super::{ParseResult, ParseWarning};
use crate::geometry::Gravity;
use crate::options::{Alignment, LayoutOptions};

/// Keys that are accepted without warning but don't affect layout.
/// Sorted for binary search.
const KNOWN_EXTRAS: &[&str] = &["filename", "format", "quality"];

/// Layout keys, each with its accepted spellings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Key {
    MaxWidth,
    MaxHeight,
    Spacing,
    Alignment,
    Background,
    Gravity,
    MaxImages,
    MaxInputBytes,
    MaxFramePixels,
}

impl Key {
    fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "maxwidth" | "maxw" | "w" | "width" => Self::MaxWidth,
            "maxheight" | "maxh" | "h" | "height" => Self::MaxHeight,
            "spacing" | "gap" | "margin" => Self::Spacing,
            "mode" | "layout" | "alignment" => Self::Alignment,
            "bgcolor" | "background" | "bg" => Self::Background,
            "gravity" | "anchor" => Self::Gravity,
            "maximages" | "maxcount" => Self::MaxImages,
            "maxinputbytes" => Self::MaxInputBytes,
            "maxpixels" | "maxframepixels" => Self::MaxFramePixels,
            _ => return None,
        })
    }

    /// Canonical name used in warnings and duplicate detection.
    fn name(self) -> &'static str {
        match self {
            Self::MaxWidth => "maxwidth",
            Self::MaxHeight => "maxheight",
            Self::Spacing => "spacing",
            Self::Alignment => "mode",
            Self::Background => "bgcolor",
            Self::Gravity => "gravity",
            Self::MaxImages => "maximages",
            Self::MaxInputBytes => "maxinputbytes",
            Self::MaxFramePixels => "maxpixels",
        }
    }

    /// Apply `value` to `options`, or return why it was rejected.
    fn apply(self, value: &str, options: &mut LayoutOptions) -> Result<(), &'static str> {
        const PIXELS: &str = "expected a non-negative integer";
        match self {
            Self::MaxWidth => options.max_frame_width = parse_u32(value).ok_or(PIXELS)?,
            Self::MaxHeight => options.max_frame_height = parse_u32(value).ok_or(PIXELS)?,
            Self::Spacing => options.cell_spacing = parse_u32(value).ok_or(PIXELS)?,
            Self::Alignment => {
                options.alignment = Alignment::from_name(value)
                    .ok_or("expected grid-uniform|grid-packed|masonry-columns")?;
            }
            Self::Background => {
                options.background_color =
                    parse_color(value).ok_or("expected hex color or color name")?;
            }
            Self::Gravity => {
                options.gravity =
                    parse_gravity(value).ok_or("expected position name or x,y percentages")?;
            }
            Self::MaxImages => {
                options.limits.max_images =
                    Some(value.trim().parse().map_err(|_| "expected a count")?);
            }
            Self::MaxInputBytes => {
                options.limits.max_input_bytes =
                    Some(value.trim().parse().map_err(|_| "expected a byte count")?);
            }
            Self::MaxFramePixels => {
                options.limits.max_frame_pixels =
                    Some(value.trim().parse().map_err(|_| "expected a pixel count")?);
            }
        }
        Ok(())
    }
}

pub(super) fn parse_query(query: &str) -> ParseResult {
    let mut options = LayoutOptions::default();
    let mut extras = BTreeMap::new();
    let mut warnings = Vec::new();
    let mut seen: Vec<&'static str> = Vec::new();

    for pair in split_query(query) {
        let (raw_key, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = percent_decode(raw_key).to_ascii_lowercase();
        let value = percent_decode(raw_value);

        let canonical = if let Some(k) = Key::lookup(&key) {
            if let Err(reason) = k.apply(&value, &mut options) {
                warnings.push(ParseWarning::ValueInvalid {
                    key: k.name(),
                    value,
                    reason,
                });
                continue;
            }
            k.name()
        } else if let Ok(i) = KNOWN_EXTRAS.binary_search(&key.as_str()) {
            extras.insert(key.clone(), value.clone());
            KNOWN_EXTRAS[i]
        } else {
            warnings.push(ParseWarning::KeyNotRecognized { key, value });
            continue;
        };

        if seen.contains(&canonical) {
            warnings.push(ParseWarning::DuplicateKey { key, value });
        } else {
            seen.push(canonical);
        }
    }

    ParseResult {
        options,
        extras,
        warnings,
    }
}

fn parse_u32(s: &str) -> Option<u32> {
    s.trim().parse().ok()
}

/// Named positions, or `x,y` as percentages in `0..=100`.
fn parse_gravity(s: &str) -> Option<Gravity> {
    let s = s.trim().to_ascii_lowercase();
    let (x, y) = match s.as_str() {
        "center" | "middle" | "middlecenter" => return Some(Gravity::Center),
        "topleft" => (0.0, 0.0),
        "top" | "topcenter" => (0.5, 0.0),
        "topright" => (1.0, 0.0),
        "left" | "middleleft" => (0.0, 0.5),
        "right" | "middleright" => (1.0, 0.5),
        "bottomleft" => (0.0, 1.0),
        "bottom" | "bottomcenter" => (0.5, 1.0),
        "bottomright" => (1.0, 1.0),
        other => {
            let (x, y) = other.split_once(',')?;
            let x: f32 = x.trim().parse().ok()?;
            let y: f32 = y.trim().parse().ok()?;
            (x / 100.0, y / 100.0)
        }
    };
    Some(Gravity::Percentage(x, y)).filter(Gravity::is_valid)
}

/// Split on `&`, dropping a leading `?` and empty segments.
fn split_query(query: &str) -> impl Iterator<Item = &str> {
    query
        .strip_prefix('?')
        .unwrap_or(query)
        .split('&')
        .filter(|s| !s.is_empty())
}

/// Decode `%XX` escapes and `+` as space. Malformed escapes pass through.
fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' => {
                let hex = s
                    .get(i + 1..i + 3)
                    .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                        continue;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
