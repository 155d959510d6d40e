use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ErrorPayload;
use crate::report::{ElementReport, RunSummary};
use crate::style::CanonicalStyle;

/// Schema version for output payloads.
pub const TPC_OUTPUT_VERSION: &str = "0.1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum TpcOutput {
    Compare(CompareOutput),
    Batch(BatchOutput),
    Extract(ExtractOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareOutput {
    pub version: String,
    pub design: DesignSource,
    pub live: LiveSource,
    pub tolerance: f64,
    pub report: ElementReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutput {
    pub version: String,
    pub tolerance: f64,
    pub passed: bool,
    pub summary: RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifacts_dir: Option<PathBuf>,
}

/// A single extracted style, without comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractOutput {
    pub version: String,
    pub side: StyleSide,
    pub source: String,
    pub style: CanonicalStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleSide {
    Design,
    Live,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSource {
    pub file_key: String,
    pub node_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveSource {
    pub url: String,
    pub selector: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    pub error: ErrorPayload,
}

impl ErrorOutput {
    pub fn new(error: ErrorPayload) -> Self {
        Self {
            version: TPC_OUTPUT_VERSION.to_string(),
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::report::{build_report, ElementOutcome};
    use crate::style::{compare, CompareOptions, StyleProperty};

    #[test]
    fn compare_output_serializes() {
        let design = CanonicalStyle::default().with(StyleProperty::FontSize, 16.0);
        let live = CanonicalStyle::default().with(StyleProperty::FontSize, "18px");
        let report = build_report("Hero", compare(&design, &live, &CompareOptions::default()));

        let output = TpcOutput::Compare(CompareOutput {
            version: TPC_OUTPUT_VERSION.to_string(),
            design: DesignSource {
                file_key: "FILE".into(),
                node_id: "1:2".into(),
            },
            live: LiveSource {
                url: "https://example.com".into(),
                selector: "h1".into(),
            },
            tolerance: 0.5,
            report,
            artifacts_dir: None,
        });

        let json = serde_json::to_value(&output).expect("serialize compare output");
        assert_eq!(json["mode"], "compare");
        assert_eq!(json["design"]["nodeId"], "1:2");
        assert_eq!(json["report"]["matches"], false);
        assert_eq!(
            json["report"]["result"]["discrepancies"][0]["reason"],
            "Difference exceeds tolerance: 2px"
        );
        assert!(json.get("artifactsDir").is_none());
    }

    #[test]
    fn batch_output_serializes() {
        let output = TpcOutput::Batch(BatchOutput {
            version: TPC_OUTPUT_VERSION.to_string(),
            tolerance: 1.0,
            passed: true,
            summary: RunSummary::from_outcomes(Vec::<ElementOutcome>::new()),
            artifacts_dir: Some(PathBuf::from("artifacts")),
        });

        let json = serde_json::to_string(&output).expect("serialize batch output");
        assert!(json.contains("\"mode\":\"batch\""));
        assert!(json.contains("\"artifactsDir\":\"artifacts\""));
    }

    #[test]
    fn extract_and_error_outputs_serialize() {
        let extract = TpcOutput::Extract(ExtractOutput {
            version: TPC_OUTPUT_VERSION.to_string(),
            side: StyleSide::Live,
            source: "h1 @ https://example.com".into(),
            style: CanonicalStyle::default().with(StyleProperty::Color, "#112233"),
        });
        let json = serde_json::to_value(&extract).expect("serialize extract output");
        assert_eq!(json["mode"], "extract");
        assert_eq!(json["side"], "live");
        assert_eq!(json["style"]["color"], "#112233");

        let error = TpcOutput::Error(ErrorOutput::new(ErrorPayload::new(
            ErrorCategory::Config,
            "bad input".into(),
            "check flags",
        )));
        let json = serde_json::to_value(&error).expect("serialize error output");
        assert_eq!(json["mode"], "error");
        assert_eq!(json["error"]["category"], "config");
    }
}
