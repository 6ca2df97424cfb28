// SPDX-License-Identifier: PMPL-1.0-or-later
//! CSS value helpers: lengths, font sizes, durations and angles.
//!
//! Relative units are resolved against a fixed base font size. Viewport
//! units cannot be resolved without a viewport and return `None`.

use regex::Regex;
use std::sync::LazyLock;

static LENGTH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(-?(?:\d+\.?\d*|\.\d+))\s*(px|pt|pc|rem|em|%|in|cm|mm|q|ex|ch)?\s*$")
        .expect("valid regex")
});

static TIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[\s,(])(-?(?:\d+\.?\d*|\.\d+))(ms|s)\b").expect("valid regex")
});

static ANGLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(-?(?:\d+\.?\d*|\.\d+))\s*(deg|rad|grad|turn)?\s*$").expect("valid regex")
});

/// Convert a CSS length to pixels
pub fn length_to_px(value: &str, base_px: f64) -> Option<f64> {
    let caps = LENGTH_RE.captures(value)?;
    let number: f64 = caps[1].parse().ok()?;
    let unit = caps.get(2).map(|m| m.as_str().to_lowercase());
    let px = match unit.as_deref() {
        Some("px") => number,
        Some("pt") => number * 4.0 / 3.0,
        Some("pc") => number * 16.0,
        Some("in") => number * 96.0,
        Some("cm") => number * 96.0 / 2.54,
        Some("mm") => number * 96.0 / 25.4,
        Some("q") => number * 96.0 / 101.6,
        Some("rem") | Some("em") => number * base_px,
        Some("ex") | Some("ch") => number * base_px / 2.0,
        Some("%") => number * base_px / 100.0,
        // Unitless lengths are only valid for zero
        None if number == 0.0 => 0.0,
        _ => return None,
    };
    Some(px)
}

/// Convert a `font-size` value (length or keyword) to pixels
pub fn font_size_px(value: &str, base_px: f64) -> Option<f64> {
    let keyword = value.trim().to_lowercase();
    let scale = match keyword.as_str() {
        "xx-small" => Some(9.0 / 16.0),
        "x-small" => Some(10.0 / 16.0),
        "small" => Some(13.0 / 16.0),
        "medium" => Some(1.0),
        "large" => Some(18.0 / 16.0),
        "x-large" => Some(24.0 / 16.0),
        "xx-large" => Some(2.0),
        "xxx-large" => Some(3.0),
        _ => None,
    };
    match scale {
        Some(s) => Some(s * base_px),
        None => length_to_px(&keyword, base_px),
    }
}

/// Parse a bare number
pub fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// All time values in a declaration, in milliseconds, in source order
pub fn time_values_ms(value: &str) -> Vec<f64> {
    TIME_RE
        .captures_iter(value)
        .filter_map(|caps| {
            let number: f64 = caps[1].parse().ok()?;
            Some(if caps[2].eq_ignore_ascii_case("s") { number * 1000.0 } else { number })
        })
        .collect()
}

/// Convert an angle to degrees; unitless zero is accepted
pub fn angle_to_deg(value: &str) -> Option<f64> {
    let caps = ANGLE_RE.captures(value)?;
    let number: f64 = caps[1].parse().ok()?;
    let unit = caps.get(2).map(|m| m.as_str().to_lowercase());
    match unit.as_deref() {
        Some("deg") => Some(number),
        Some("rad") => Some(number.to_degrees()),
        Some("grad") => Some(number * 0.9),
        Some("turn") => Some(number * 360.0),
        None if number == 0.0 => Some(0.0),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_units() {
        assert_eq!(length_to_px("12px", 16.0), Some(12.0));
        assert_eq!(length_to_px("9pt", 16.0), Some(12.0));
        assert_eq!(length_to_px("0.5rem", 16.0), Some(8.0));
        assert_eq!(length_to_px("50%", 16.0), Some(8.0));
        assert_eq!(length_to_px("0", 16.0), Some(0.0));
        assert_eq!(length_to_px("12", 16.0), None);
        assert_eq!(length_to_px("10vh", 16.0), None);
    }

    #[test]
    fn test_font_size_keywords() {
        assert_eq!(font_size_px("x-small", 16.0), Some(10.0));
        assert_eq!(font_size_px("Medium", 16.0), Some(16.0));
        assert_eq!(font_size_px("smaller", 16.0), None);
    }

    #[test]
    fn test_time_values() {
        assert_eq!(time_values_ms("spin 0.2s linear infinite"), vec![200.0]);
        assert_eq!(time_values_ms("opacity 150ms, transform .5s 100ms"), vec![150.0, 500.0, 100.0]);
        assert!(time_values_ms("none").is_empty());
    }

    #[test]
    fn test_angles() {
        assert_eq!(angle_to_deg("90deg"), Some(90.0));
        assert_eq!(angle_to_deg("0.5turn"), Some(180.0));
        assert_eq!(angle_to_deg("0"), Some(0.0));
        assert_eq!(angle_to_deg("45"), None);
    }
}
