//! Figma API response types for parsing JSON from the Figma REST API.
//!
//! Only the styling subset of a node is modelled; unknown fields are ignored.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::style::color::unit_rgb_to_hex;

/// Response from the nodes endpoint.
///
/// Figma answers `null` for ids it cannot resolve, hence the `Option`.
#[derive(Debug, Deserialize)]
pub struct FigmaNodesResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub nodes: HashMap<String, Option<FigmaNodeWrapper>>,
}

/// Wrapper containing the document for a node.
#[derive(Debug, Deserialize)]
pub struct FigmaNodeWrapper {
    pub document: FigmaNodeData,
}

/// Raw Figma node data from the API.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaNodeData {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub characters: Option<String>,
    pub style: Option<FigmaTypeStyle>,
    pub opacity: Option<f64>,
    #[serde(default)]
    pub fills: Vec<FigmaPaint>,
    #[serde(default)]
    pub strokes: Vec<FigmaPaint>,
    pub stroke_weight: Option<f64>,
    #[serde(default)]
    pub stroke_dashes: Vec<f64>,
    pub corner_radius: Option<f64>,
    pub background_color: Option<FigmaColor>,
    #[serde(default)]
    pub background: Vec<FigmaPaint>,
    #[serde(default)]
    pub effects: Vec<FigmaEffect>,
    pub padding_top: Option<f64>,
    pub padding_right: Option<f64>,
    pub padding_bottom: Option<f64>,
    pub padding_left: Option<f64>,
}

impl FigmaNodeData {
    pub fn is_text(&self) -> bool {
        self.node_type.eq_ignore_ascii_case("TEXT")
    }
}

/// Typography style from Figma.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaTypeStyle {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<f64>,
    pub italic: Option<bool>,
    pub letter_spacing: Option<f64>,
    pub line_height_px: Option<f64>,
    pub line_height_percent_font_size: Option<f64>,
    pub text_align_horizontal: Option<String>,
    pub text_decoration: Option<String>,
    pub text_case: Option<String>,
    pub paragraph_indent: Option<f64>,
}

/// Paint used for fills, strokes, and backgrounds.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaPaint {
    #[serde(rename = "type")]
    pub paint_type: String,
    pub visible: Option<bool>,
    pub color: Option<FigmaColor>,
    pub opacity: Option<f64>,
}

impl FigmaPaint {
    pub fn is_visible(&self) -> bool {
        self.visible.unwrap_or(true)
    }
}

/// RGBA color from Figma (0.0-1.0 range).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct FigmaColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl FigmaColor {
    /// Convert to hex color string (e.g., "#ff8000"); alpha is dropped.
    pub fn to_hex(&self) -> String {
        unit_rgb_to_hex(self.r, self.g, self.b)
    }
}

/// Visual effect (shadow or blur) attached to a node.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FigmaEffect {
    #[serde(rename = "type")]
    pub effect_type: String,
    pub visible: Option<bool>,
    pub radius: Option<f64>,
    pub color: Option<FigmaColor>,
    pub offset: Option<FigmaVector>,
}

impl FigmaEffect {
    pub fn is_shadow(&self) -> bool {
        self.visible.unwrap_or(true)
            && matches!(self.effect_type.as_str(), "DROP_SHADOW" | "INNER_SHADOW")
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct FigmaVector {
    pub x: f64,
    pub y: f64,
}
