//! Color parsing and WCAG contrast math.
//!
//! Supported notations: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`,
//! `rgb()`/`rgba()` and `hsl()`/`hsla()`. Alpha is parsed past and ignored;
//! contrast is computed on opaque channels.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Opaque 8-bit sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

fn hex_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^#([0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$")
            .expect("hex color regex must compile")
    })
}

fn rgb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^rgba?\(([^)]+)\)$").expect("rgb color regex must compile"))
}

fn hsl_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^hsla?\(([^)]+)\)$").expect("hsl color regex must compile"))
}

/// Parse a token value into an RGB triple. Non-strings are unparsable.
pub fn parse_color(value: &Value) -> Option<Rgb> {
    value.as_str().and_then(parse_color_str)
}

pub fn parse_color_str(raw: &str) -> Option<Rgb> {
    let raw = raw.trim();

    if let Some(caps) = hex_re().captures(raw) {
        return parse_hex(&caps[1]);
    }
    if let Some(caps) = rgb_re().captures(raw) {
        return parse_rgb_channels(&caps[1]);
    }
    if let Some(caps) = hsl_re().captures(raw) {
        return parse_hsl_channels(&caps[1]);
    }
    None
}

fn parse_hex(digits: &str) -> Option<Rgb> {
    let nibble = |index: usize| u8::from_str_radix(&digits[index..=index], 16).ok();
    let byte = |index: usize| u8::from_str_radix(&digits[index..index + 2], 16).ok();

    match digits.len() {
        3 | 4 => Some(Rgb(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
        )),
        6 | 8 => Some(Rgb(byte(0)?, byte(2)?, byte(4)?)),
        _ => None,
    }
}

fn split_channels(body: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = body.split(',').map(str::trim).collect();
    (parts.len() >= 3).then_some(parts)
}

fn parse_rgb_channels(body: &str) -> Option<Rgb> {
    let parts = split_channels(body)?;
    let channel = |part: &str| part.parse::<f64>().ok().map(|c| clamp_channel(c.trunc()));
    Some(Rgb(channel(parts[0])?, channel(parts[1])?, channel(parts[2])?))
}

fn parse_hsl_channels(body: &str) -> Option<Rgb> {
    let parts = split_channels(body)?;
    let hue = parts[0].parse::<f64>().ok()?.rem_euclid(360.0);
    let saturation = parse_fraction(parts[1])?;
    let lightness = parse_fraction(parts[2])?;

    let (r, g, b) = hsl_to_rgb(hue / 360.0, saturation, lightness);
    let channel = |c: f64| clamp_channel((c * 255.0).round_ties_even());
    Some(Rgb(channel(r), channel(g), channel(b)))
}

/// `50%` → 0.5, `0.5` → 0.5.
fn parse_fraction(part: &str) -> Option<f64> {
    match part.strip_suffix('%') {
        Some(percent) => percent.trim().parse::<f64>().ok().map(|p| p / 100.0),
        None => part.parse::<f64>().ok(),
    }
}

fn clamp_channel(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 255.0) as u8
}

/// Standard HSL→RGB transform over unit-interval components.
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }
    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;
    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

/// WCAG 2.x relative luminance.
pub fn relative_luminance(rgb: Rgb) -> f64 {
    fn linear(channel: u8) -> f64 {
        let srgb = f64::from(channel) / 255.0;
        if srgb <= 0.03928 {
            srgb / 12.92
        } else {
            ((srgb + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * linear(rgb.0) + 0.7152 * linear(rgb.1) + 0.0722 * linear(rgb.2)
}

/// WCAG contrast ratio rounded to three decimals. Symmetric in its arguments.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = relative_luminance(a);
    let lb = relative_luminance(b);
    let ratio = (la.max(lb) + 0.05) / (la.min(lb) + 0.05);
    (ratio * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn short_and_long_hex_agree() {
        assert_eq!(parse_color_str("#fff"), Some(Rgb(255, 255, 255)));
        assert_eq!(parse_color_str("#ffffff"), Some(Rgb(255, 255, 255)));
        assert_eq!(parse_color_str("#FfF"), parse_color_str("#ffffff"));
    }

    #[test]
    fn hex_alpha_is_ignored() {
        assert_eq!(parse_color_str("#1f936d80"), Some(Rgb(0x1f, 0x93, 0x6d)));
        assert_eq!(parse_color_str("#abc8"), Some(Rgb(0xaa, 0xbb, 0xcc)));
    }

    #[test]
    fn malformed_hex_is_unparsable() {
        assert_eq!(parse_color_str("#ff"), None);
        assert_eq!(parse_color_str("#fffff"), None);
        assert_eq!(parse_color_str("#gggggg"), None);
        assert_eq!(parse_color_str("ffffff"), None);
    }

    #[test]
    fn rgb_channels_truncate_and_clamp() {
        assert_eq!(parse_color_str("rgb(12.9, 300, -5)"), Some(Rgb(12, 255, 0)));
        assert_eq!(
            parse_color_str(" rgba(10, 20, 30, 0.5) "),
            Some(Rgb(10, 20, 30))
        );
        assert_eq!(parse_color_str("rgb(10, 20)"), None);
        assert_eq!(parse_color_str("rgb(a, b, c)"), None);
    }

    #[test]
    fn hsl_converts_percent_and_fraction_forms() {
        assert_eq!(parse_color_str("hsl(0, 100%, 50%)"), Some(Rgb(255, 0, 0)));
        assert_eq!(parse_color_str("hsl(120, 1, 0.5)"), Some(Rgb(0, 255, 0)));
        assert_eq!(parse_color_str("hsl(480, 100%, 50%)"), Some(Rgb(0, 255, 0)));
        assert_eq!(parse_color_str("hsl(-120, 100%, 50%)"), Some(Rgb(0, 0, 255)));
        assert_eq!(parse_color_str("hsla(0, 0%, 100%, 0.4)"), Some(Rgb(255, 255, 255)));
        assert_eq!(parse_color_str("hsl(120deg, 100%, 50%)"), None);
    }

    #[test]
    fn non_string_values_are_unparsable() {
        assert_eq!(parse_color(&json!(16777215)), None);
        assert_eq!(parse_color(&json!({"$value": "#fff"})), None);
        assert_eq!(parse_color(&json!("red")), None);
    }

    #[test]
    fn black_on_white_is_twenty_one() {
        let ratio = contrast_ratio(Rgb(0, 0, 0), Rgb(255, 255, 255));
        assert_eq!(ratio, 21.0);
    }

    #[test]
    fn contrast_is_symmetric() {
        let pairs = [
            (Rgb(17, 24, 39), Rgb(255, 255, 255)),
            (Rgb(156, 163, 175), Rgb(249, 250, 251)),
            (Rgb(31, 147, 109), Rgb(0, 0, 0)),
        ];
        for (a, b) in pairs {
            assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
        }
    }

    #[test]
    fn identical_colors_have_unit_ratio() {
        assert_eq!(contrast_ratio(Rgb(90, 90, 90), Rgb(90, 90, 90)), 1.0);
    }

    #[test]
    fn known_pairs_straddle_aa_threshold() {
        let white = Rgb(255, 255, 255);
        let dark = parse_color_str("#111827").expect("dark parses");
        let gray = parse_color_str("#9ca3af").expect("gray parses");
        assert!(contrast_ratio(dark, white) >= 4.5);
        assert!(contrast_ratio(gray, white) < 3.0);
    }
}
