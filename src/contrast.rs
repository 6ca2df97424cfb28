// SPDX-License-Identifier: PMPL-1.0-or-later
//! Color contrast calculator - WCAG 1.4.3 Contrast (Minimum), 1.4.6 Contrast (Enhanced)
//!
//! Parses CSS color values and computes contrast ratios using the WCAG
//! relative luminance formula.
//! - AAA: 7:1 for normal text, 4.5:1 for large text
//! - AA: 4.5:1 for normal text, 3:1 for large text
//!
//! Large text is at least 18pt (24px), or at least 14pt (~18.67px) bold.

use crate::model::WcagLevel;
use regex::Regex;
use std::sync::LazyLock;

/// Large text threshold in px (18pt)
pub const LARGE_TEXT_PX: f64 = 24.0;

/// Large bold text threshold in px (14pt)
pub const LARGE_BOLD_TEXT_PX: f64 = 14.0 * 4.0 / 3.0;

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^rgba?\(\s*([\d.]+%?)\s*[,\s]\s*([\d.]+%?)\s*[,\s]\s*([\d.]+%?)\s*(?:[,/]\s*([\d.]+%?)\s*)?\)$",
    )
    .expect("valid regex")
});

static HSL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^hsla?\(\s*(-?[\d.]+)(?:deg)?\s*[,\s]\s*([\d.]+)%\s*[,\s]\s*([\d.]+)%\s*(?:[,/]\s*([\d.]+%?)\s*)?\)$",
    )
    .expect("valid regex")
});

static COLOR_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)#[0-9a-f]{3,8}\b|rgba?\([^)]*\)|hsla?\([^)]*\)|\b[a-z]+\b").expect("valid regex")
});

/// An sRGB color with straight (non-premultiplied) alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0.0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 0.999
    }

    pub fn is_transparent(&self) -> bool {
        self.a <= 0.001
    }

    /// Hex notation, e.g. `#595959`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Parse a CSS hex color (#rgb, #rgba, #rrggbb, #rrggbbaa)
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    let short = |i: usize| channel(&hex[i..i + 1].repeat(2));
    match hex.len() {
        3 => Some(Color::rgb(short(0)?, short(1)?, short(2)?)),
        4 => Some(Color { a: short(3)? as f64 / 255.0, ..Color::rgb(short(0)?, short(1)?, short(2)?) }),
        6 => Some(Color::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)),
        8 => Some(Color {
            a: channel(&hex[6..8])? as f64 / 255.0,
            ..Color::rgb(channel(&hex[0..2])?, channel(&hex[2..4])?, channel(&hex[4..6])?)
        }),
        _ => None,
    }
}

fn parse_channel(token: &str) -> Option<u8> {
    let value = match token.strip_suffix('%') {
        Some(pct) => pct.parse::<f64>().ok()? * 255.0 / 100.0,
        None => token.parse::<f64>().ok()?,
    };
    Some(value.round().clamp(0.0, 255.0) as u8)
}

fn parse_alpha(token: Option<&str>) -> Option<f64> {
    match token {
        None => Some(1.0),
        Some(t) => {
            let value = match t.strip_suffix('%') {
                Some(pct) => pct.parse::<f64>().ok()? / 100.0,
                None => t.parse::<f64>().ok()?,
            };
            Some(value.clamp(0.0, 1.0))
        }
    }
}

/// Parse an rgb() or rgba() color, comma or space separated
pub fn parse_rgb_color(value: &str) -> Option<Color> {
    let caps = RGB_RE.captures(value.trim())?;
    Some(Color {
        r: parse_channel(&caps[1])?,
        g: parse_channel(&caps[2])?,
        b: parse_channel(&caps[3])?,
        a: parse_alpha(caps.get(4).map(|m| m.as_str()))?,
    })
}

/// Parse an hsl() or hsla() color
pub fn parse_hsl_color(value: &str) -> Option<Color> {
    let caps = HSL_RE.captures(value.trim())?;
    let h = caps[1].parse::<f64>().ok()?.rem_euclid(360.0) / 360.0;
    let s = (caps[2].parse::<f64>().ok()? / 100.0).clamp(0.0, 1.0);
    let l = (caps[3].parse::<f64>().ok()? / 100.0).clamp(0.0, 1.0);
    let a = parse_alpha(caps.get(4).map(|m| m.as_str()))?;

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue = |mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0).round().clamp(0.0, 255.0) as u8
    };
    Some(Color { r: hue(h + 1.0 / 3.0), g: hue(h), b: hue(h - 1.0 / 3.0), a })
}

/// Parse a named CSS color
pub fn parse_named_color(name: &str) -> Option<Color> {
    let (r, g, b) = match name {
        "white" => (255, 255, 255),
        "black" => (0, 0, 0),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "gray" | "grey" => (128, 128, 128),
        "darkgray" | "darkgrey" => (169, 169, 169),
        "lightgray" | "lightgrey" => (211, 211, 211),
        "dimgray" | "dimgrey" => (105, 105, 105),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "lime" => (0, 255, 0),
        "aqua" | "cyan" => (0, 255, 255),
        "teal" => (0, 128, 128),
        "navy" => (0, 0, 128),
        "fuchsia" | "magenta" => (255, 0, 255),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        "pink" => (255, 192, 203),
        "brown" => (165, 42, 42),
        "gold" => (255, 215, 0),
        "whitesmoke" => (245, 245, 245),
        "gainsboro" => (220, 220, 220),
        "transparent" => return Some(Color::TRANSPARENT),
        _ => return None,
    };
    Some(Color::rgb(r, g, b))
}

/// Parse any CSS color value; keywords that defer to other properties
/// (`inherit`, `currentcolor`, ...) return `None`
pub fn parse_color(value: &str) -> Option<Color> {
    let trimmed = value.trim().to_lowercase();
    if trimmed.starts_with('#') {
        parse_hex_color(&trimmed)
    } else if trimmed.starts_with("rgb") {
        parse_rgb_color(&trimmed)
    } else if trimmed.starts_with("hsl") {
        parse_hsl_color(&trimmed)
    } else {
        parse_named_color(&trimmed)
    }
}

/// Find the first color token inside a shorthand such as
/// `background: url(x.png) no-repeat #fff`
pub fn extract_color(value: &str) -> Option<Color> {
    let lower = value.to_lowercase();
    if lower.trim() == "none" {
        return Some(Color::TRANSPARENT);
    }
    COLOR_TOKEN_RE
        .find_iter(&lower)
        .find_map(|m| parse_color(m.as_str()))
}

/// Composite `top` over `bottom` (source-over)
pub fn composite(top: Color, bottom: Color) -> Color {
    let a = top.a + bottom.a * (1.0 - top.a);
    if a <= 0.0 {
        return Color::TRANSPARENT;
    }
    let mix = |t: u8, b: u8| {
        let v = (t as f64 * top.a + b as f64 * bottom.a * (1.0 - top.a)) / a;
        v.round().clamp(0.0, 255.0) as u8
    };
    Color { r: mix(top.r, bottom.r), g: mix(top.g, bottom.g), b: mix(top.b, bottom.b), a }
}

/// Calculate relative luminance per WCAG 2.x
/// <https://www.w3.org/TR/WCAG21/#dfn-relative-luminance>
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    let srgb = [r, g, b].map(|c| {
        let v = c as f64 / 255.0;
        if v <= 0.04045 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        }
    });
    0.2126 * srgb[0] + 0.7152 * srgb[1] + 0.0722 * srgb[2]
}

/// Calculate contrast ratio between two opaque colors.
/// Returns a ratio >= 1.0 (e.g., 4.5, 7.0, 21.0)
pub fn contrast_ratio(fg: Color, bg: Color) -> f64 {
    let l1 = relative_luminance(fg.r, fg.g, fg.b);
    let l2 = relative_luminance(bg.r, bg.g, bg.b);
    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };
    (lighter + 0.05) / (darker + 0.05)
}

/// Whether text of this size and weight counts as large
pub fn is_large_text(font_px: f64, bold: bool) -> bool {
    font_px >= LARGE_TEXT_PX || (bold && font_px >= LARGE_BOLD_TEXT_PX - 0.01)
}

/// Minimum contrast ratio for a level
pub fn required_ratio(level: WcagLevel, large_text: bool) -> f64 {
    match (level, large_text) {
        (WcagLevel::AAA, false) => 7.0,
        (WcagLevel::AAA, true) => 4.5,
        (_, false) => 4.5,
        (_, true) => 3.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#fff"), Some(Color::WHITE));
        assert_eq!(parse_hex_color("#000"), Some(Color::BLACK));
        assert_eq!(parse_hex_color("#ff0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(parse_hex_color("#FFFFFF"), Some(Color::WHITE));
        assert!(parse_hex_color("#00000000").expect("8-digit").is_transparent());
        assert_eq!(parse_hex_color("#zzz"), None);
    }

    #[test]
    fn test_parse_rgb_color() {
        assert_eq!(parse_rgb_color("rgb(255, 0, 0)"), Some(Color::rgb(255, 0, 0)));
        let c = parse_rgb_color("rgba(0, 128, 0, 0.5)").expect("rgba");
        assert_eq!((c.r, c.g, c.b), (0, 128, 0));
        assert!((c.a - 0.5).abs() < 1e-9);
        assert_eq!(parse_rgb_color("rgb(0 0 0 / 100%)"), Some(Color::BLACK));
    }

    #[test]
    fn test_parse_hsl_color() {
        assert_eq!(parse_hsl_color("hsl(0, 100%, 50%)"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(parse_hsl_color("hsl(0, 0%, 100%)"), Some(Color::WHITE));
    }

    #[test]
    fn test_parse_color_keywords() {
        assert_eq!(parse_color("  White "), Some(Color::WHITE));
        assert!(parse_color("transparent").expect("transparent").is_transparent());
        assert_eq!(parse_color("currentColor"), None);
        assert_eq!(parse_color("inherit"), None);
    }

    #[test]
    fn test_extract_color_from_shorthand() {
        assert_eq!(extract_color("url(bg.png) no-repeat #fff"), Some(Color::WHITE));
        assert_eq!(extract_color("rgb(0, 0, 0) center"), Some(Color::BLACK));
        assert_eq!(extract_color("url(bg.png)"), None);
    }

    #[test]
    fn test_contrast_ratio_black_white() {
        let ratio = contrast_ratio(Color::BLACK, Color::WHITE);
        assert!((ratio - 21.0).abs() < 0.1, "Black on white should be ~21:1, got {:.2}", ratio);
    }

    #[test]
    fn test_contrast_ratio_same_color() {
        let gray = Color::rgb(128, 128, 128);
        let ratio = contrast_ratio(gray, gray);
        assert!((ratio - 1.0).abs() < 0.01, "Same color should be 1:1, got {:.2}", ratio);
    }

    #[test]
    fn test_reference_grays() {
        let dark = parse_color("#595959").expect("color");
        let light = parse_color("#999999").expect("color");
        let ratio = contrast_ratio(dark, Color::WHITE);
        assert!(ratio >= 7.0 && ratio < 7.1, "#595959 on white is ~7:1, got {:.3}", ratio);
        let ratio = contrast_ratio(light, Color::WHITE);
        assert!(ratio < 3.0 && ratio > 2.7, "#999999 on white is ~2.8:1, got {:.3}", ratio);
    }

    #[test]
    fn test_relative_luminance() {
        let white = relative_luminance(255, 255, 255);
        let black = relative_luminance(0, 0, 0);
        assert!((white - 1.0).abs() < 0.01);
        assert!(black.abs() < 0.01);
    }

    #[test]
    fn test_composite_half_black_over_white() {
        let half_black = Color { a: 0.5, ..Color::BLACK };
        let c = composite(half_black, Color::WHITE);
        assert!(c.is_opaque());
        assert_eq!((c.r, c.g, c.b), (128, 128, 128));
    }

    #[test]
    fn test_large_text_thresholds() {
        assert!(is_large_text(24.0, false));
        assert!(!is_large_text(20.0, false));
        assert!(is_large_text(18.67, true));
        assert!(!is_large_text(16.0, true));
        assert_eq!(required_ratio(WcagLevel::AA, false), 4.5);
        assert_eq!(required_ratio(WcagLevel::AA, true), 3.0);
        assert_eq!(required_ratio(WcagLevel::AAA, false), 7.0);
        assert_eq!(required_ratio(WcagLevel::AAA, true), 4.5);
    }
}
