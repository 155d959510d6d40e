//! Property-by-property comparison of a design style against a live style.

use serde::{Deserialize, Serialize};

use super::normalize::{
    format_number, normalize_color, normalize_font_family, normalize_font_weight, parse_pixels,
    primary_font_family,
};
use super::{CanonicalStyle, PropertyClass, StyleProperty, StyleValue};

/// Default maximum px difference for pixel-like properties.
pub const DEFAULT_TOLERANCE: f64 = 0.5;

/// Absorbs float noise such as `16.0 - 15.6 = 0.40000000000000036`.
const TOLERANCE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareOptions {
    pub tolerance: f64,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl CompareOptions {
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

/// Category of a property mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MismatchKind {
    ToleranceExceeded,
    FontWeight,
    Color,
    FontFamily,
    Value,
    MissingOnLive,
}

impl MismatchKind {
    fn reason(&self, delta: Option<f64>) -> String {
        match self {
            MismatchKind::ToleranceExceeded => format!(
                "Difference exceeds tolerance: {}px",
                format_number(delta.unwrap_or(f64::NAN))
            ),
            MismatchKind::FontWeight => "Font weights do not match after normalization".into(),
            MismatchKind::Color => "Colors do not match after normalization".into(),
            MismatchKind::FontFamily => {
                "Font families do not match or primary font is not included".into()
            }
            MismatchKind::Value => "Values do not match".into(),
            MismatchKind::MissingOnLive => "Property is not present on the live element".into(),
        }
    }
}

/// One mismatched property, carrying the raw values from both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDiscrepancy {
    pub property: StyleProperty,
    pub design_value: StyleValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_value: Option<StyleValue>,
    pub kind: MismatchKind,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub design_style: CanonicalStyle,
    pub live_style: CanonicalStyle,
    pub matches: bool,
    #[serde(default)]
    pub discrepancies: Vec<ComparisonDiscrepancy>,
}

impl ComparisonResult {
    pub fn discrepancy(&self, property: StyleProperty) -> Option<&ComparisonDiscrepancy> {
        self.discrepancies.iter().find(|d| d.property == property)
    }
}

/// Compare every property the design specifies against the live style.
///
/// A design property the live style lacks is reported as
/// [`MismatchKind::MissingOnLive`] with the reason "Property is not present on
/// the live element". Properties only present on the live side are ignored.
/// All mismatches are collected; the comparison never fails.
pub fn compare(
    design: &CanonicalStyle,
    live: &CanonicalStyle,
    options: &CompareOptions,
) -> ComparisonResult {
    let discrepancies: Vec<ComparisonDiscrepancy> = design
        .iter()
        .filter_map(|(property, design_value)| {
            let live_value = live.get(property);
            let (kind, delta) = match live_value {
                None => Some((MismatchKind::MissingOnLive, None)),
                Some(live_value) => {
                    check_property(property, design_value, live_value, options.tolerance)
                }
            }?;

            Some(ComparisonDiscrepancy {
                property,
                design_value: design_value.clone(),
                live_value: live_value.cloned(),
                kind,
                reason: kind.reason(delta),
                delta,
            })
        })
        .collect();

    ComparisonResult {
        design_style: design.clone(),
        live_style: live.clone(),
        matches: discrepancies.is_empty(),
        discrepancies,
    }
}

/// Returns the mismatch category, or `None` when the values match.
fn check_property(
    property: StyleProperty,
    design: &StyleValue,
    live: &StyleValue,
    tolerance: f64,
) -> Option<(MismatchKind, Option<f64>)> {
    match property.class() {
        PropertyClass::Pixel => match (parse_pixels(design), parse_pixels(live)) {
            (Some(d), Some(l)) => {
                let delta = (d - l).abs();
                (delta > tolerance + TOLERANCE_EPSILON)
                    .then_some((MismatchKind::ToleranceExceeded, Some(delta)))
            }
            // Unparseable magnitudes degrade to plain value equality.
            _ => (!values_equal(design, live)).then_some((MismatchKind::Value, None)),
        },
        PropertyClass::FontWeight => {
            let d = normalize_font_weight(&design.to_string());
            let l = normalize_font_weight(&live.to_string());
            (d != l).then_some((MismatchKind::FontWeight, None))
        }
        PropertyClass::Color => {
            let d = normalize_color(&design.to_string());
            let l = normalize_color(&live.to_string());
            (d != l).then_some((MismatchKind::Color, None))
        }
        PropertyClass::FontFamily => {
            let primary = primary_font_family(&design.to_string());
            let families = normalize_font_family(&live.to_string());
            (!families.contains(&primary)).then_some((MismatchKind::FontFamily, None))
        }
        PropertyClass::Other => (!values_equal(design, live)).then_some((MismatchKind::Value, None)),
    }
}

fn values_equal(a: &StyleValue, b: &StyleValue) -> bool {
    match (a, b) {
        (StyleValue::Number(x), StyleValue::Number(y)) => x == y,
        _ => a.to_string().trim().to_lowercase() == b.to_string().trim().to_lowercase(),
    }
}
