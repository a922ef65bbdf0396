//! Background color values: hex digits or a color name.

use crate::geometry::CanvasColor;

/// Parse `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA` (the `#` is optional) or a
/// color name, ASCII case-insensitive. Alpha defaults to opaque.
///
/// ```
/// use zencombine::{CanvasColor, query::parse_color};
///
/// assert_eq!(parse_color("#fff"), Some(CanvasColor::white()));
/// assert_eq!(parse_color("Black"), Some(CanvasColor::black()));
/// assert_eq!(parse_color("transparent"), Some(CanvasColor::Transparent));
/// assert_eq!(parse_color("#12345"), None);
/// ```
pub fn parse_color(s: &str) -> Option<CanvasColor> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("transparent") {
        return Some(CanvasColor::Transparent);
    }
    let hex = s.strip_prefix('#').unwrap_or(s);
    parse_hex(hex).or_else(|| named(s))
}

fn parse_hex(hex: &str) -> Option<CanvasColor> {
    let digits = hex.as_bytes();
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let nibble = |b: u8| (b as char).to_digit(16).map(|d| d as u8);
    let mut channels = [255u8; 4];
    match digits.len() {
        3 | 4 => {
            for (c, &d) in channels.iter_mut().zip(digits) {
                let n = nibble(d)?;
                *c = n << 4 | n;
            }
        }
        6 | 8 => {
            for (c, pair) in channels.iter_mut().zip(digits.chunks_exact(2)) {
                *c = nibble(pair[0])? << 4 | nibble(pair[1])?;
            }
        }
        _ => return None,
    }
    let [r, g, b, a] = channels;
    Some(CanvasColor::Srgb { r, g, b, a })
}

fn named(name: &str) -> Option<CanvasColor> {
    NAMED
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, [r, g, b])| CanvasColor::rgb(r, g, b))
}

/// Basic CSS color keywords plus a few neutral grays common as backdrops.
const NAMED: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("silver", [192, 192, 192]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("white", [255, 255, 255]),
    ("maroon", [128, 0, 0]),
    ("red", [255, 0, 0]),
    ("purple", [128, 0, 128]),
    ("fuchsia", [255, 0, 255]),
    ("magenta", [255, 0, 255]),
    ("green", [0, 128, 0]),
    ("lime", [0, 255, 0]),
    ("olive", [128, 128, 0]),
    ("yellow", [255, 255, 0]),
    ("navy", [0, 0, 128]),
    ("blue", [0, 0, 255]),
    ("teal", [0, 128, 128]),
    ("aqua", [0, 255, 255]),
    ("cyan", [0, 255, 255]),
    ("orange", [255, 165, 0]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("darkgray", [169, 169, 169]),
    ("darkgrey", [169, 169, 169]),
    ("dimgray", [105, 105, 105]),
    ("whitesmoke", [245, 245, 245]),
    ("gainsboro", [220, 220, 220]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_hex_expands_nibbles() {
        assert_eq!(parse_color("0af"), Some(CanvasColor::rgb(0x00, 0xaa, 0xff)));
        assert_eq!(
            parse_color("#0af8"),
            Some(CanvasColor::Srgb {
                r: 0x00,
                g: 0xaa,
                b: 0xff,
                a: 0x88
            })
        );
    }

    #[test]
    fn long_hex() {
        assert_eq!(parse_color("#1A2b3C"), Some(CanvasColor::rgb(0x1a, 0x2b, 0x3c)));
        assert_eq!(
            parse_color("1a2b3c00"),
            Some(CanvasColor::Srgb {
                r: 0x1a,
                g: 0x2b,
                b: 0x3c,
                a: 0
            })
        );
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(parse_color("WhiteSmoke"), Some(CanvasColor::rgb(245, 245, 245)));
        assert_eq!(parse_color(" red "), Some(CanvasColor::rgb(255, 0, 0)));
    }

    #[test]
    fn hex_beats_names() {
        // "add" is valid hex, not a name lookup.
        assert_eq!(parse_color("add"), Some(CanvasColor::rgb(0xaa, 0xdd, 0xdd)));
    }

    #[test]
    fn rejects_garbage() {
        for s in ["", "#", "#ggg", "12345", "#1234567", "reddish", "é"] {
            assert_eq!(parse_color(s), None, "{s:?}");
        }
    }

    #[test]
    fn names_are_unique() {
        for (i, (a, _)) in NAMED.iter().enumerate() {
            assert!(NAMED[i + 1..].iter().all(|(b, _)| a != b), "{a}");
        }
    }
}
