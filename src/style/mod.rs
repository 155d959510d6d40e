//! Canonical typography style shared by the design and live extractors.
//!
//! This module provides:
//! - [`CanonicalStyle`] - One optional member per recognised property
//! - [`StyleProperty`] - The closed set of property names
//! - [`StyleValue`] - A numeric px magnitude or a textual CSS value
//! - [`color`] - RGB/hex color conversion
//! - [`normalize`] - Per-class value normalization
//! - [`compare`] - Tolerant property-by-property comparison

pub mod color;
pub mod compare;
pub mod normalize;


pub use compare::{
    compare, CompareOptions, ComparisonDiscrepancy, ComparisonResult, MismatchKind,
    DEFAULT_TOLERANCE,
};
pub use normalize::{elide_unset_values, format_number, parse_pixels};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A typography property recognised by the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleProperty {
    FontFamily,
    FontSize,
    FontWeight,
    FontStyle,
    FontVariant,
    LineHeight,
    LetterSpacing,
    TextAlign,
    TextDecoration,
    TextTransform,
    TextIndent,
    Color,
    Opacity,
    BackgroundColor,
    BorderStyle,
    BorderWidth,
    BorderColor,
    BorderRadius,
    Padding,
    Margin,
    TextShadow,
}

/// How a property's values are normalized and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyClass {
    /// Numeric magnitude compared with a tolerance.
    Pixel,
    FontWeight,
    Color,
    FontFamily,
    /// Case-insensitive exact comparison.
    Other,
}

impl StyleProperty {
    /// All properties in declaration order.
    pub const ALL: [StyleProperty; 21] = [
        StyleProperty::FontFamily,
        StyleProperty::FontSize,
        StyleProperty::FontWeight,
        StyleProperty::FontStyle,
        StyleProperty::FontVariant,
        StyleProperty::LineHeight,
        StyleProperty::LetterSpacing,
        StyleProperty::TextAlign,
        StyleProperty::TextDecoration,
        StyleProperty::TextTransform,
        StyleProperty::TextIndent,
        StyleProperty::Color,
        StyleProperty::Opacity,
        StyleProperty::BackgroundColor,
        StyleProperty::BorderStyle,
        StyleProperty::BorderWidth,
        StyleProperty::BorderColor,
        StyleProperty::BorderRadius,
        StyleProperty::Padding,
        StyleProperty::Margin,
        StyleProperty::TextShadow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StyleProperty::FontFamily => "fontFamily",
            StyleProperty::FontSize => "fontSize",
            StyleProperty::FontWeight => "fontWeight",
            StyleProperty::FontStyle => "fontStyle",
            StyleProperty::FontVariant => "fontVariant",
            StyleProperty::LineHeight => "lineHeight",
            StyleProperty::LetterSpacing => "letterSpacing",
            StyleProperty::TextAlign => "textAlign",
            StyleProperty::TextDecoration => "textDecoration",
            StyleProperty::TextTransform => "textTransform",
            StyleProperty::TextIndent => "textIndent",
            StyleProperty::Color => "color",
            StyleProperty::Opacity => "opacity",
            StyleProperty::BackgroundColor => "backgroundColor",
            StyleProperty::BorderStyle => "borderStyle",
            StyleProperty::BorderWidth => "borderWidth",
            StyleProperty::BorderColor => "borderColor",
            StyleProperty::BorderRadius => "borderRadius",
            StyleProperty::Padding => "padding",
            StyleProperty::Margin => "margin",
            StyleProperty::TextShadow => "textShadow",
        }
    }

    pub fn class(&self) -> PropertyClass {
        match self {
            StyleProperty::FontSize
            | StyleProperty::LineHeight
            | StyleProperty::LetterSpacing
            | StyleProperty::TextIndent
            | StyleProperty::BorderWidth => PropertyClass::Pixel,
            StyleProperty::FontWeight => PropertyClass::FontWeight,
            StyleProperty::Color | StyleProperty::BackgroundColor | StyleProperty::BorderColor => {
                PropertyClass::Color
            }
            StyleProperty::FontFamily => PropertyClass::FontFamily,
            _ => PropertyClass::Other,
        }
    }
}

impl fmt::Display for StyleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single style value: a px magnitude or a textual CSS value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Text(String),
}

impl StyleValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            StyleValue::Text(s) => Some(s),
            StyleValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            StyleValue::Number(n) => Some(*n),
            StyleValue::Text(_) => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(n) => f.write_str(&format_number(*n)),
            StyleValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

/// Typography style record produced by either extractor.
///
/// Absent properties are `None` and never serialized, so "unset" looks the
/// same whichever side produced the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_style: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_variant: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_transform: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_indent: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_style: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_width: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_color: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<StyleValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_shadow: Option<StyleValue>,
}

impl CanonicalStyle {
    pub fn get(&self, property: StyleProperty) -> Option<&StyleValue> {
        self.slot(property).as_ref()
    }

    pub fn set(&mut self, property: StyleProperty, value: Option<StyleValue>) {
        *self.slot_mut(property) = value;
    }

    pub fn remove(&mut self, property: StyleProperty) -> Option<StyleValue> {
        self.slot_mut(property).take()
    }

    /// Builder-style setter, handy when constructing records by hand.
    pub fn with(mut self, property: StyleProperty, value: impl Into<StyleValue>) -> Self {
        self.set(property, Some(value.into()));
        self
    }

    /// Present properties in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (StyleProperty, &StyleValue)> + '_ {
        StyleProperty::ALL
            .iter()
            .filter_map(move |p| self.get(*p).map(|v| (*p, v)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    fn slot(&self, property: StyleProperty) -> &Option<StyleValue> {
        match property {
            StyleProperty::FontFamily => &self.font_family,
            StyleProperty::FontSize => &self.font_size,
            StyleProperty::FontWeight => &self.font_weight,
            StyleProperty::FontStyle => &self.font_style,
            StyleProperty::FontVariant => &self.font_variant,
            StyleProperty::LineHeight => &self.line_height,
            StyleProperty::LetterSpacing => &self.letter_spacing,
            StyleProperty::TextAlign => &self.text_align,
            StyleProperty::TextDecoration => &self.text_decoration,
            StyleProperty::TextTransform => &self.text_transform,
            StyleProperty::TextIndent => &self.text_indent,
            StyleProperty::Color => &self.color,
            StyleProperty::Opacity => &self.opacity,
            StyleProperty::BackgroundColor => &self.background_color,
            StyleProperty::BorderStyle => &self.border_style,
            StyleProperty::BorderWidth => &self.border_width,
            StyleProperty::BorderColor => &self.border_color,
            StyleProperty::BorderRadius => &self.border_radius,
            StyleProperty::Padding => &self.padding,
            StyleProperty::Margin => &self.margin,
            StyleProperty::TextShadow => &self.text_shadow,
        }
    }

    fn slot_mut(&mut self, property: StyleProperty) -> &mut Option<StyleValue> {
        match property {
            StyleProperty::FontFamily => &mut self.font_family,
            StyleProperty::FontSize => &mut self.font_size,
            StyleProperty::FontWeight => &mut self.font_weight,
            StyleProperty::FontStyle => &mut self.font_style,
            StyleProperty::FontVariant => &mut self.font_variant,
            StyleProperty::LineHeight => &mut self.line_height,
            StyleProperty::LetterSpacing => &mut self.letter_spacing,
            StyleProperty::TextAlign => &mut self.text_align,
            StyleProperty::TextDecoration => &mut self.text_decoration,
            StyleProperty::TextTransform => &mut self.text_transform,
            StyleProperty::TextIndent => &mut self.text_indent,
            StyleProperty::Color => &mut self.color,
            StyleProperty::Opacity => &mut self.opacity,
            StyleProperty::BackgroundColor => &mut self.background_color,
            StyleProperty::BorderStyle => &mut self.border_style,
            StyleProperty::BorderWidth => &mut self.border_width,
            StyleProperty::BorderColor => &mut self.border_color,
            StyleProperty::BorderRadius => &mut self.border_radius,
            StyleProperty::Padding => &mut self.padding,
            StyleProperty::Margin => &mut self.margin,
            StyleProperty::TextShadow => &mut self.text_shadow,
        }
    }
}
