//! Tag value parsing for sizes and layer offsets.

use crate::domain::Tagged;

const FEET: f64 = 0.3048;
const YARDS: f64 = 0.9144;

/// Widest lane assumed when a width is derived from a `lanes` tag
const MAX_LANE_WIDTH: f64 = 5.0;

/// Vertical offset per `layer` step, meters
const LAYER_STEP: f64 = 1.0 / 500.0;

/// Leading decimal number of `text`, or 0 when there is none.
///
/// Accepts what a C `atof` would: leading spaces, a sign, digits with an
/// optional fraction and exponent. The rest of the string is ignored.
pub fn leading_number(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end == digits_start || &text[digits_start..end] == "." {
        return 0.0;
    }

    // exponent only counts when followed by at least one digit
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    text[..end].parse().unwrap_or(0.0)
}

/// Length in meters from a tag value like `"12"`, `"12 ft"` or `"3 yd"`
pub fn read_dimension(text: &str) -> f64 {
    let value = leading_number(text);
    if text.len() > 3 {
        if text.ends_with(" ft") {
            return value * FEET;
        }
        if text.ends_with(" yd") {
            return value * YARDS;
        }
    }
    value
}

/// Width of a way: its `width` tag, else `lanes` times half the default
/// (at most 5 m per lane), else the default.
pub fn compute_way_width(way: &impl Tagged, default_width: f64) -> f64 {
    if let Some(width) = way.attribute("width") {
        let width = read_dimension(width);
        return if width > 0.0 { width } else { default_width };
    }
    if let Some(lanes) = way.attribute("lanes") {
        let lanes = leading_number(lanes);
        if lanes > 0.0 {
            return (default_width / 2.0).min(MAX_LANE_WIDTH) * lanes;
        }
    }
    default_width
}

/// Elevation offset from a `layer` value; negative means below ground
pub fn layer_offset(layer: Option<&str>) -> f64 {
    layer.map_or(0.0, |l| leading_number(l) * LAYER_STEP)
}
