//! Value normalization applied before comparison.
//!
//! Both extractors call [`elide_unset_values`] on their output so a property
//! that is "unset" on one side never shows up as a spurious value on the other.

use super::{CanonicalStyle, StyleProperty, StyleValue};

/// Resolved values that mean "nothing set" on either side.
const UNSET_SENTINELS: &[&str] = &["normal", "none", "0px", "none none none none"];

/// Render a number with at most four decimals and no trailing zeros.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = (value * 10_000.0).round() / 10_000.0;
    let text = format!("{:.4}", rounded);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Numeric px magnitude of a value, or `None` when no number can be read.
pub fn parse_pixels(value: &StyleValue) -> Option<f64> {
    match value {
        StyleValue::Number(n) if n.is_finite() => Some(*n),
        StyleValue::Number(_) => None,
        StyleValue::Text(text) => parse_first_number(text),
    }
}

/// First signed decimal run in `input` ("-1.5px" -> -1.5, "auto" -> None).
pub fn parse_first_number(input: &str) -> Option<f64> {
    let bytes = input.as_bytes();
    let digit_at = |i: usize| bytes.get(i).is_some_and(u8::is_ascii_digit);

    let start = (0..bytes.len()).find(|&i| match bytes[i] {
        b'0'..=b'9' => true,
        b'.' => digit_at(i + 1),
        b'-' => digit_at(i + 1) || (bytes.get(i + 1) == Some(&b'.') && digit_at(i + 2)),
        _ => false,
    })?;

    let mut end = start;
    if bytes[end] == b'-' {
        end += 1;
    }
    while digit_at(end) {
        end += 1;
    }
    if bytes.get(end) == Some(&b'.') && digit_at(end + 1) {
        end += 1;
        while digit_at(end) {
            end += 1;
        }
    }

    input[start..end].parse().ok()
}

/// Map weight keywords to their numeric form ("semibold" -> "600").
pub fn normalize_font_weight(value: &str) -> String {
    let key: String = value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .collect();

    let mapped = match key.as_str() {
        "thin" | "hairline" => "100",
        "extralight" | "ultralight" => "200",
        "light" => "300",
        "normal" | "regular" | "book" => "400",
        "medium" => "500",
        "semibold" | "demibold" => "600",
        "bold" => "700",
        "extrabold" | "ultrabold" => "800",
        "black" | "heavy" => "900",
        _ => return key,
    };
    mapped.to_string()
}

pub fn normalize_color(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Lowercase a family list and strip the quotes around each entry.
pub fn normalize_font_family(value: &str) -> String {
    family_entries(value).collect::<Vec<_>>().join(", ")
}

/// First family of a (possibly comma separated) family list, normalized.
pub fn primary_font_family(value: &str) -> String {
    family_entries(value).next().unwrap_or_default()
}

fn family_entries(value: &str) -> impl Iterator<Item = String> + '_ {
    value
        .split(',')
        .map(|entry| {
            entry
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim()
                .to_lowercase()
        })
        .filter(|entry| !entry.is_empty())
}

/// Collapse four box sides into CSS shorthand.
///
/// Missing sides count as `0px`. Returns `None` only when every side is absent.
pub fn collapse_box_sides(
    top: Option<f64>,
    right: Option<f64>,
    bottom: Option<f64>,
    left: Option<f64>,
) -> Option<String> {
    if top.is_none() && right.is_none() && bottom.is_none() && left.is_none() {
        return None;
    }

    let px = |side: Option<f64>| format!("{}px", format_number(side.unwrap_or(0.0)));
    Some(collapse_box_values(
        &px(top),
        &px(right),
        &px(bottom),
        &px(left),
    ))
}

/// Shorthand for four already-rendered edge values (top, right, bottom, left).
pub fn collapse_box_values(top: &str, right: &str, bottom: &str, left: &str) -> String {
    let (t, r, b, l) = (top.trim(), right.trim(), bottom.trim(), left.trim());

    if t == r && r == b && b == l {
        t.to_string()
    } else if t == b && r == l {
        format!("{t} {r}")
    } else {
        format!("{t} {r} {b} {l}")
    }
}

pub fn is_unset_value(value: &StyleValue) -> bool {
    let text = match value {
        StyleValue::Number(n) => format!("{}px", format_number(*n)),
        StyleValue::Text(s) => s.trim().to_ascii_lowercase(),
    };
    UNSET_SENTINELS.contains(&text.as_str())
}

/// Drop every property whose value is an initial/no-op sentinel.
pub fn elide_unset_values(style: &mut CanonicalStyle) {
    for property in StyleProperty::ALL {
        if style.get(property).is_some_and(is_unset_value) {
            style.remove(property);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_number_trims_float_noise() {
        assert_eq!(format_number(16.0), "16");
        assert_eq!(format_number(16.0 - 15.6), "0.4");
        assert_eq!(format_number(1.25), "1.25");
        assert_eq!(format_number(-0.00001), "0");
    }

    #[test]
    fn parse_first_number_reads_leading_run() {
        assert_eq!(parse_first_number("15.6px"), Some(15.6));
        assert_eq!(parse_first_number("-0.5px"), Some(-0.5));
        assert_eq!(parse_first_number(".75em"), Some(0.75));
        assert_eq!(parse_first_number("calc(12px + 2px)"), Some(12.0));
        assert_eq!(parse_first_number("150%"), Some(150.0));
    }

    #[test]
    fn parse_first_number_reports_missing_number() {
        assert_eq!(parse_first_number("auto"), None);
        assert_eq!(parse_first_number(""), None);
        assert_eq!(parse_first_number("-"), None);
    }

    #[test]
    fn parse_pixels_passes_numbers_through() {
        assert_eq!(parse_pixels(&StyleValue::Number(16.0)), Some(16.0));
        assert_eq!(parse_pixels(&StyleValue::Number(f64::NAN)), None);
        assert_eq!(parse_pixels(&StyleValue::from("18px")), Some(18.0));
    }

    #[test]
    fn font_weight_keywords_map_to_numbers() {
        assert_eq!(normalize_font_weight("Bold"), "700");
        assert_eq!(normalize_font_weight("Semi Bold"), "600");
        assert_eq!(normalize_font_weight("extra-light"), "200");
        assert_eq!(normalize_font_weight("regular"), "400");
        assert_eq!(normalize_font_weight("Black"), "900");
        assert_eq!(normalize_font_weight("650"), "650");
        assert_eq!(normalize_font_weight("Wobbly"), "wobbly");
    }

    #[test]
    fn font_family_strips_quotes_and_case() {
        assert_eq!(
            normalize_font_family("\"Open Sans\", 'Helvetica', sans-serif"),
            "open sans, helvetica, sans-serif"
        );
        assert_eq!(primary_font_family("'Inter', Arial"), "inter");
        assert_eq!(primary_font_family(""), "");
    }

    #[test]
    fn box_sides_collapse_to_one_two_or_four_values() {
        assert_eq!(
            collapse_box_sides(Some(8.0), Some(8.0), Some(8.0), Some(8.0)).as_deref(),
            Some("8px")
        );
        assert_eq!(
            collapse_box_sides(Some(8.0), Some(16.0), Some(8.0), Some(16.0)).as_deref(),
            Some("8px 16px")
        );
        assert_eq!(
            collapse_box_sides(Some(1.0), Some(2.0), Some(3.0), Some(4.0)).as_deref(),
            Some("1px 2px 3px 4px")
        );
    }

    #[test]
    fn box_sides_default_missing_to_zero() {
        assert_eq!(
            collapse_box_sides(Some(4.0), None, Some(4.0), None).as_deref(),
            Some("4px 0px")
        );
        assert_eq!(collapse_box_sides(None, None, None, None), None);
    }

    #[test]
    fn edge_values_collapse_like_box_sides() {
        assert_eq!(collapse_box_values("solid", "solid", "solid", "solid"), "solid");
        assert_eq!(
            collapse_box_values("1px", "2px", "1px", "2px"),
            "1px 2px"
        );
        assert_eq!(
            collapse_box_values("solid", "none", "none", "none"),
            "solid none none none"
        );
    }

    #[test]
    fn elision_removes_sentinels_from_both_value_kinds() {
        let mut style = CanonicalStyle::default()
            .with(StyleProperty::LineHeight, "normal")
            .with(StyleProperty::TextDecoration, "None")
            .with(StyleProperty::Margin, "0px")
            .with(StyleProperty::LetterSpacing, 0.0)
            .with(StyleProperty::BorderStyle, "none none none none")
            .with(StyleProperty::FontSize, 16.0)
            .with(StyleProperty::TextAlign, "center");

        elide_unset_values(&mut style);

        assert_eq!(style.len(), 2);
        assert_eq!(style.font_size, Some(StyleValue::Number(16.0)));
        assert_eq!(style.text_align, Some(StyleValue::from("center")));
    }
}
