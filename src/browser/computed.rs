//! Computed style payload from Playwright and its canonical mapping.

use serde::Deserialize;

use crate::style::color::{css_color_to_hex, parse_css_color};
use crate::style::normalize::{collapse_box_values, parse_first_number};
use crate::style::{elide_unset_values, format_number, CanonicalStyle, StyleValue};

/// Raw `getComputedStyle` values as returned by the Playwright script.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawComputedStyle {
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub font_variant: Option<String>,
    pub line_height: Option<String>,
    pub letter_spacing: Option<String>,
    pub text_align: Option<String>,
    pub text_decoration_line: Option<String>,
    pub text_transform: Option<String>,
    pub text_indent: Option<String>,
    pub color: Option<String>,
    pub opacity: Option<String>,
    pub background_color: Option<String>,
    pub border_top_style: Option<String>,
    pub border_right_style: Option<String>,
    pub border_bottom_style: Option<String>,
    pub border_left_style: Option<String>,
    pub border_top_width: Option<String>,
    pub border_right_width: Option<String>,
    pub border_bottom_width: Option<String>,
    pub border_left_width: Option<String>,
    pub border_top_color: Option<String>,
    pub border_right_color: Option<String>,
    pub border_bottom_color: Option<String>,
    pub border_left_color: Option<String>,
    pub border_radius: Option<String>,
    pub padding_top: Option<String>,
    pub padding_right: Option<String>,
    pub padding_bottom: Option<String>,
    pub padding_left: Option<String>,
    pub margin_top: Option<String>,
    pub margin_right: Option<String>,
    pub margin_bottom: Option<String>,
    pub margin_left: Option<String>,
    pub text_shadow: Option<String>,
}

/// Map resolved browser values into a canonical record.
pub fn live_style_from_computed(raw: &RawComputedStyle) -> CanonicalStyle {
    let text = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(StyleValue::from)
    };

    let mut style = CanonicalStyle {
        font_family: text(&raw.font_family),
        font_size: text(&raw.font_size),
        font_weight: text(&raw.font_weight),
        font_style: text(&raw.font_style),
        font_variant: text(&raw.font_variant),
        line_height: text(&raw.line_height),
        letter_spacing: text(&raw.letter_spacing),
        text_align: text(&raw.text_align),
        text_decoration: text(&raw.text_decoration_line),
        text_transform: text(&raw.text_transform),
        text_indent: text(&raw.text_indent),
        color: raw.color.as_deref().map(|c| StyleValue::Text(css_color_to_hex(c))),
        opacity: text(&raw.opacity),
        border_radius: text(&raw.border_radius),
        ..CanonicalStyle::default()
    };

    style.background_color = raw
        .background_color
        .as_deref()
        .filter(|bg| !is_fully_transparent(bg))
        .map(|bg| StyleValue::Text(css_color_to_hex(bg)));

    let border_styles = edges(
        &raw.border_top_style,
        &raw.border_right_style,
        &raw.border_bottom_style,
        &raw.border_left_style,
    );
    let all_none = border_styles
        .iter()
        .all(|s| s.is_empty() || s.eq_ignore_ascii_case("none"));
    if !all_none {
        let widths = edges(
            &raw.border_top_width,
            &raw.border_right_width,
            &raw.border_bottom_width,
            &raw.border_left_width,
        );
        let colors = edges(
            &raw.border_top_color,
            &raw.border_right_color,
            &raw.border_bottom_color,
            &raw.border_left_color,
        )
        .map(|c| css_color_to_hex(&c));

        style.border_style = collapse_edges(&border_styles);
        style.border_width = collapse_edges(&widths);
        style.border_color = collapse_edges(&colors);
    }

    style.padding = collapse_edges(&edges(
        &raw.padding_top,
        &raw.padding_right,
        &raw.padding_bottom,
        &raw.padding_left,
    ));
    style.margin = collapse_edges(&edges(
        &raw.margin_top,
        &raw.margin_right,
        &raw.margin_bottom,
        &raw.margin_left,
    ));

    style.text_shadow = raw
        .text_shadow
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| StyleValue::Text(rewrite_text_shadow(s)));

    elide_unset_values(&mut style);
    style
}

fn edges(
    top: &Option<String>,
    right: &Option<String>,
    bottom: &Option<String>,
    left: &Option<String>,
) -> [String; 4] {
    [top, right, bottom, left].map(|side| side.as_deref().unwrap_or("").trim().to_string())
}

fn collapse_edges(sides: &[String; 4]) -> Option<StyleValue> {
    if sides.iter().all(String::is_empty) {
        return None;
    }
    let side = |i: usize| if sides[i].is_empty() { "0px" } else { sides[i].as_str() };
    Some(StyleValue::Text(collapse_box_values(
        side(0),
        side(1),
        side(2),
        side(3),
    )))
}

fn is_fully_transparent(value: &str) -> bool {
    let value = value.trim();
    value.is_empty()
        || value.eq_ignore_ascii_case("transparent")
        || parse_css_color(value).is_some_and(|c| c.is_transparent())
}

/// Rewrite `rgb(r, g, b) Xpx Ypx Bpx` shadows as `Xpx Ypx Bpx #hex`.
///
/// Values that cannot be read are returned unchanged.
pub fn rewrite_text_shadow(value: &str) -> String {
    let shadows: Option<Vec<String>> = split_top_level(value)
        .into_iter()
        .map(rewrite_single_shadow)
        .collect();

    shadows
        .map(|parts| parts.join(", "))
        .unwrap_or_else(|| value.to_string())
}

fn rewrite_single_shadow(shadow: &str) -> Option<String> {
    let (color, rest) = take_color(shadow.trim())?;
    let lengths: Vec<f64> = rest
        .split_whitespace()
        .map(parse_first_number)
        .collect::<Option<Vec<_>>>()?;

    let (dx, dy, blur) = match lengths.as_slice() {
        [dx, dy] => (*dx, *dy, 0.0),
        [dx, dy, blur] | [dx, dy, blur, _] => (*dx, *dy, *blur),
        _ => return None,
    };

    Some(format!(
        "{}px {}px {}px {}",
        format_number(dx),
        format_number(dy),
        format_number(blur),
        color
    ))
}

/// Split out the color of one shadow, wherever it appears.
fn take_color(shadow: &str) -> Option<(String, String)> {
    if let Some(start) = shadow.find("rgb") {
        let end = start + shadow[start..].find(')')? + 1;
        let color = parse_css_color(&shadow[start..end])?;
        let rest = format!("{} {}", &shadow[..start], &shadow[end..]);
        return Some((color.hex(), rest));
    }

    let mut color = None;
    let mut rest = Vec::new();
    for token in shadow.split_whitespace() {
        let starts_numeric = token
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == '-' || c == '.' || c == '+');
        if starts_numeric {
            rest.push(token);
        } else if color.is_none() {
            color = Some(parse_css_color(token)?.hex());
        } else {
            return None;
        }
    }
    Some((color?, rest.join(" ")))
}

/// Split on commas that are not inside parentheses.
fn split_top_level(value: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, ch) in value.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&value[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&value[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleProperty;

    fn heading() -> RawComputedStyle {
        serde_json::from_str(
            r#"{
                "fontFamily": "Inter, sans-serif",
                "fontSize": "16px",
                "fontWeight": "600",
                "fontStyle": "normal",
                "fontVariant": "normal",
                "lineHeight": "24px",
                "letterSpacing": "normal",
                "textAlign": "center",
                "textDecorationLine": "none",
                "textTransform": "uppercase",
                "textIndent": "0px",
                "color": "rgb(17, 34, 51)",
                "opacity": "1",
                "backgroundColor": "rgba(0, 0, 0, 0)",
                "borderTopStyle": "none",
                "borderRightStyle": "none",
                "borderBottomStyle": "none",
                "borderLeftStyle": "none",
                "borderTopWidth": "0px",
                "borderRightWidth": "0px",
                "borderBottomWidth": "0px",
                "borderLeftWidth": "0px",
                "borderTopColor": "rgb(17, 34, 51)",
                "borderRightColor": "rgb(17, 34, 51)",
                "borderBottomColor": "rgb(17, 34, 51)",
                "borderLeftColor": "rgb(17, 34, 51)",
                "borderRadius": "0px",
                "paddingTop": "8px",
                "paddingRight": "16px",
                "paddingBottom": "8px",
                "paddingLeft": "16px",
                "marginTop": "0px",
                "marginRight": "0px",
                "marginBottom": "0px",
                "marginLeft": "0px",
                "textShadow": "none"
            }"#,
        )
        .expect("computed style")
    }

    #[test]
    fn resolved_values_are_copied_and_sentinels_dropped() {
        let style = live_style_from_computed(&heading());

        assert_eq!(style.font_family, Some(StyleValue::from("Inter, sans-serif")));
        assert_eq!(style.font_size, Some(StyleValue::from("16px")));
        assert_eq!(style.font_weight, Some(StyleValue::from("600")));
        assert_eq!(style.line_height, Some(StyleValue::from("24px")));
        assert_eq!(style.text_align, Some(StyleValue::from("center")));
        assert_eq!(style.text_transform, Some(StyleValue::from("uppercase")));
        assert_eq!(style.color, Some(StyleValue::from("#112233")));
        assert_eq!(style.opacity, Some(StyleValue::from("1")));
        assert_eq!(style.padding, Some(StyleValue::from("8px 16px")));

        for property in [
            StyleProperty::FontStyle,
            StyleProperty::FontVariant,
            StyleProperty::LetterSpacing,
            StyleProperty::TextDecoration,
            StyleProperty::TextIndent,
            StyleProperty::BackgroundColor,
            StyleProperty::BorderStyle,
            StyleProperty::BorderWidth,
            StyleProperty::BorderColor,
            StyleProperty::BorderRadius,
            StyleProperty::Margin,
            StyleProperty::TextShadow,
        ] {
            assert!(style.get(property).is_none(), "{property} should be elided");
        }
    }

    #[test]
    fn opaque_background_is_reported_as_hex() {
        let raw = RawComputedStyle {
            background_color: Some("rgb(255, 255, 255)".into()),
            ..RawComputedStyle::default()
        };

        let style = live_style_from_computed(&raw);

        assert_eq!(style.background_color, Some(StyleValue::from("#ffffff")));
    }

    #[test]
    fn transparent_keyword_background_is_omitted() {
        let raw = RawComputedStyle {
            background_color: Some("transparent".into()),
            ..RawComputedStyle::default()
        };

        assert!(live_style_from_computed(&raw).background_color.is_none());
    }

    #[test]
    fn uniform_border_collapses_to_single_values() {
        let raw = RawComputedStyle {
            border_top_style: Some("dashed".into()),
            border_right_style: Some("dashed".into()),
            border_bottom_style: Some("dashed".into()),
            border_left_style: Some("dashed".into()),
            border_top_width: Some("2px".into()),
            border_right_width: Some("2px".into()),
            border_bottom_width: Some("2px".into()),
            border_left_width: Some("2px".into()),
            border_top_color: Some("rgb(0, 0, 255)".into()),
            border_right_color: Some("rgb(0, 0, 255)".into()),
            border_bottom_color: Some("rgb(0, 0, 255)".into()),
            border_left_color: Some("rgb(0, 0, 255)".into()),
            ..RawComputedStyle::default()
        };

        let style = live_style_from_computed(&raw);

        assert_eq!(style.border_style, Some(StyleValue::from("dashed")));
        assert_eq!(style.border_width, Some(StyleValue::from("2px")));
        assert_eq!(style.border_color, Some(StyleValue::from("#0000ff")));
    }

    #[test]
    fn mixed_border_edges_keep_every_side() {
        let raw = RawComputedStyle {
            border_top_style: Some("solid".into()),
            border_right_style: Some("none".into()),
            border_bottom_style: Some("none".into()),
            border_left_style: Some("none".into()),
            border_top_width: Some("1px".into()),
            border_right_width: Some("0px".into()),
            border_bottom_width: Some("0px".into()),
            border_left_width: Some("0px".into()),
            ..RawComputedStyle::default()
        };

        let style = live_style_from_computed(&raw);

        assert_eq!(
            style.border_style,
            Some(StyleValue::from("solid none none none"))
        );
        assert_eq!(
            style.border_width,
            Some(StyleValue::from("1px 0px 0px 0px"))
        );
    }

    #[test]
    fn browser_shadows_are_rewritten_in_design_order() {
        assert_eq!(
            rewrite_text_shadow("rgba(0, 0, 0, 0.25) 0px 2px 4px"),
            "0px 2px 4px #000000"
        );
        assert_eq!(
            rewrite_text_shadow("rgb(255, 255, 255) -1px 1px 1px, rgb(0, 0, 0) 0px 2px 4px"),
            "-1px 1px 1px #ffffff, 0px 2px 4px #000000"
        );
        assert_eq!(rewrite_text_shadow("1px 1px #FF0000"), "1px 1px 0px #ff0000");
    }

    #[test]
    fn unreadable_shadows_pass_through() {
        assert_eq!(rewrite_text_shadow("wobble 1px"), "wobble 1px");
        assert_eq!(rewrite_text_shadow("rgb(0, 0, 0) 1px"), "rgb(0, 0, 0) 1px");
    }

    #[test]
    fn top_level_split_ignores_commas_in_functions() {
        assert_eq!(
            split_top_level("rgb(1, 2, 3) 1px 1px, rgb(4, 5, 6) 2px 2px"),
            vec!["rgb(1, 2, 3) 1px 1px", " rgb(4, 5, 6) 2px 2px"]
        );
    }

    #[test]
    fn mapping_is_idempotent() {
        let raw = heading();
        assert_eq!(live_style_from_computed(&raw), live_style_from_computed(&raw));
    }
}
