//! Mapping from a Figma node to a [`CanonicalStyle`].

use tracing::debug;

use super::api_types::{FigmaEffect, FigmaNodeData, FigmaPaint, FigmaTypeStyle};
use super::client::FigmaClient;
use crate::style::normalize::collapse_box_sides;
use crate::style::{elide_unset_values, format_number, CanonicalStyle, StyleValue};
use crate::Result;

/// Fetch one design node and map its styling into a canonical record.
///
/// Non-text nodes produce an empty style rather than an error.
pub async fn extract_design_style(
    client: &FigmaClient,
    file_key: &str,
    node_id: &str,
) -> Result<CanonicalStyle> {
    let node = client.fetch_node(file_key, node_id).await?;
    let style = design_style_from_node(&node);
    debug!(
        file_key,
        node_id,
        node_type = %node.node_type,
        properties = style.len(),
        "extracted design style"
    );
    Ok(style)
}

pub fn design_style_from_node(node: &FigmaNodeData) -> CanonicalStyle {
    if !node.is_text() {
        return CanonicalStyle::default();
    }

    let mut style = CanonicalStyle::default();

    if let Some(text) = &node.style {
        style.font_family = text.font_family.clone().map(StyleValue::Text);
        style.font_size = text.font_size.map(StyleValue::Number);
        style.font_weight = text.font_weight.map(|w| StyleValue::Text(format_number(w)));
        style.font_style = text
            .italic
            .map(|italic| StyleValue::from(if italic { "italic" } else { "normal" }));
        style.font_variant = text.text_case.as_deref().and_then(font_variant);
        style.line_height = line_height(text);
        style.letter_spacing = text.letter_spacing.map(StyleValue::Number);
        style.text_align = text.text_align_horizontal.as_deref().and_then(text_align);
        style.text_decoration = text.text_decoration.as_deref().and_then(text_decoration);
        style.text_transform = text.text_case.as_deref().and_then(text_transform);
        style.text_indent = text.paragraph_indent.map(StyleValue::Number);
    }

    style.color = first_color(&node.fills);
    style.opacity = node.opacity.map(|o| StyleValue::Text(format_number(o)));
    style.background_color = node
        .background_color
        .filter(|c| c.a > 0.0)
        .map(|c| StyleValue::Text(c.to_hex()))
        .or_else(|| first_color(&node.background));

    if node.strokes.iter().any(FigmaPaint::is_visible) {
        let border = if node.stroke_dashes.is_empty() {
            "solid"
        } else {
            "dashed"
        };
        style.border_style = Some(border.into());
        style.border_width = node.stroke_weight.map(StyleValue::Number);
        style.border_color = first_color(&node.strokes);
    }
    style.border_radius = node
        .corner_radius
        .map(|r| StyleValue::Text(format!("{}px", format_number(r))));

    style.padding = collapse_box_sides(
        node.padding_top,
        node.padding_right,
        node.padding_bottom,
        node.padding_left,
    )
    .map(StyleValue::Text);

    style.text_shadow = text_shadow(&node.effects);

    elide_unset_values(&mut style);
    style
}

/// Unitless ratio when the px line height is known, else the percentage.
fn line_height(text: &FigmaTypeStyle) -> Option<StyleValue> {
    match (text.line_height_px, text.font_size) {
        (Some(px), Some(size)) if size > 0.0 => {
            Some(StyleValue::Number((px / size * 100.0).round() / 100.0))
        }
        _ => text
            .line_height_percent_font_size
            .map(|pct| StyleValue::Text(format!("{}%", format_number(pct)))),
    }
}

fn first_color(paints: &[FigmaPaint]) -> Option<StyleValue> {
    paints
        .iter()
        .filter(|paint| paint.is_visible())
        .find_map(|paint| paint.color.as_ref())
        .map(|color| StyleValue::Text(color.to_hex()))
}

fn font_variant(text_case: &str) -> Option<StyleValue> {
    match text_case {
        "SMALL_CAPS" | "SMALL_CAPS_FORCED" => Some("small-caps".into()),
        _ => None,
    }
}

fn text_align(horizontal: &str) -> Option<StyleValue> {
    let align = match horizontal {
        "LEFT" => "left",
        "RIGHT" => "right",
        "CENTER" => "center",
        "JUSTIFIED" => "justify",
        _ => return None,
    };
    Some(align.into())
}

fn text_decoration(decoration: &str) -> Option<StyleValue> {
    match decoration {
        "UNDERLINE" => Some("underline".into()),
        "STRIKETHROUGH" => Some("line-through".into()),
        _ => None,
    }
}

fn text_transform(text_case: &str) -> Option<StyleValue> {
    let transform = match text_case {
        "UPPER" => "uppercase",
        "LOWER" => "lowercase",
        "TITLE" => "capitalize",
        _ => return None,
    };
    Some(transform.into())
}

fn text_shadow(effects: &[FigmaEffect]) -> Option<StyleValue> {
    let shadows: Vec<String> = effects
        .iter()
        .filter(|effect| effect.is_shadow())
        .map(|effect| {
            let offset = effect.offset.unwrap_or_default();
            let color = effect
                .color
                .map(|c| c.to_hex())
                .unwrap_or_else(|| "#000000".to_string());
            format!(
                "{}px {}px {}px {}",
                format_number(offset.x),
                format_number(offset.y),
                format_number(effect.radius.unwrap_or(0.0)),
                color
            )
        })
        .collect();

    if shadows.is_empty() {
        None
    } else {
        Some(StyleValue::Text(shadows.join(", ")))
    }
}
