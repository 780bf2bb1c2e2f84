//! Deterministic display colors derived from file extensions

use std::collections::{BTreeMap, BTreeSet};

use crate::filter::normalize_extension;

/// Color for files without an extension.
pub const NEUTRAL_COLOR: &str = "#ffffff";

const SATURATION: f64 = 0.7;
const VALUE: f64 = 0.95;

/// Map an extension (with or without the leading dot, any case) to a
/// `#rrggbb` color.
///
/// The hue comes from a BLAKE3 digest of the normalized extension, so the
/// result is identical across runs, processes and platforms.
pub fn color_for_extension(extension: &str) -> String {
    if extension.trim().is_empty() {
        return NEUTRAL_COLOR.to_string();
    }

    let key = normalize_extension(extension);
    let digest = blake3::hash(key.as_bytes());
    let mut head = [0u8; 16];
    head.copy_from_slice(&digest.as_bytes()[..16]);
    let hue = (u128::from_be_bytes(head) % 360) as f64 / 360.0;

    let (r, g, b) = hsv_to_rgb(hue, SATURATION, VALUE);
    format!(
        "#{:02x}{:02x}{:02x}",
        (r * 255.0) as u8,
        (g * 255.0) as u8,
        (b * 255.0) as u8
    )
}

/// Colors for every extension seen during a traversal.
pub fn color_map(extensions: &BTreeSet<String>) -> BTreeMap<String, String> {
    extensions
        .iter()
        .map(|ext| (ext.clone(), color_for_extension(ext)))
        .collect()
}

/// Parse `#rrggbb` into components.
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// HSV to RGB with all components in `[0, 1]`.
fn hsv_to_rgb(h: f64, s: f64, v: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (v, v, v);
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_is_deterministic() {
        let first = color_for_extension(".py");
        let second = color_for_extension(".py");
        assert_eq!(first, second);
    }

    #[test]
    fn test_known_colors_are_stable() {
        // Fixed outputs: any change to the hash input or hue mapping breaks these.
        assert_eq!(color_for_extension(".py"), "#f2a848");
        assert_eq!(color_for_extension("PY"), "#f2a848");
        assert_eq!(color_for_extension(".rs"), "#f27548");
        assert_eq!(color_for_extension(".txt"), "#8ff248");
        assert_eq!(color_for_extension(".js"), "#48b1f2");
    }

    #[test]
    fn test_color_is_case_and_dot_insensitive() {
        assert_eq!(color_for_extension(".TXT"), color_for_extension(".txt"));
        assert_eq!(color_for_extension("txt"), color_for_extension(".txt"));
    }

    #[test]
    fn test_empty_extension_is_neutral() {
        assert_eq!(color_for_extension(""), NEUTRAL_COLOR);
        assert_eq!(color_for_extension("  "), NEUTRAL_COLOR);
    }

    #[test]
    fn test_color_format() {
        for ext in [".rs", ".py", ".md", ".json", ".a"] {
            let color = color_for_extension(ext);
            assert_eq!(color.len(), 7, "{}", color);
            assert!(parse_hex(&color).is_some(), "{}", color);
        }
    }

    #[test]
    fn test_fixed_saturation_and_value() {
        // Brightest channel is always VALUE * 255, truncated.
        for ext in [".rs", ".py", ".md", ".toml", ".lock"] {
            let (r, g, b) = parse_hex(&color_for_extension(ext)).unwrap();
            assert_eq!(r.max(g).max(b), 242, "{}", ext);
        }
    }

    #[test]
    fn test_hsv_to_rgb_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), (1.0, 0.0, 0.0));
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0).1, 1.0);
        assert_eq!(hsv_to_rgb(0.5, 0.0, 0.5), (0.5, 0.5, 0.5));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ff8000"), Some((255, 128, 0)));
        assert_eq!(parse_hex("ff8000"), None);
        assert_eq!(parse_hex("#fff"), None);
    }

    #[test]
    fn test_color_map_covers_all_extensions() {
        let exts: BTreeSet<String> = [".rs", ".md"].iter().map(|s| s.to_string()).collect();
        let map = color_map(&exts);
        assert_eq!(map.len(), 2);
        assert_eq!(map[".rs"], color_for_extension(".rs"));
    }
}
