use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum TpcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] ParseError),

    #[error("Figma API error (status: {status:?}): {message}")]
    FigmaApi {
        status: Option<StatusCode>,
        message: String,
    },

    #[error("DOM extraction error: {0}")]
    DomExtraction(String),

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TpcError {
    pub fn figma_api(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        TpcError::FigmaApi {
            status,
            message: message.into(),
        }
    }

    pub fn dom(message: impl Into<String>) -> Self {
        TpcError::DomExtraction(message.into())
    }

    /// Configuration problems abort the whole run rather than a single element.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TpcError::Config(_) | TpcError::Toml(_))
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            TpcError::Io(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            TpcError::Network(e) => ErrorPayload::new(
                ErrorCategory::Network,
                e.to_string(),
                "Check connectivity/proxy/VPN and retry.",
            ),
            TpcError::InvalidUrl(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Verify URL/format (e.g., https://example.com).",
            ),
            TpcError::FigmaApi { status, message } => {
                let remediation = match status.map(|s| s.as_u16()) {
                    Some(401) | Some(403) => {
                        "Check that FIGMA_TOKEN (or FIGMA_OAUTH_TOKEN) is valid and has access to the file."
                    }
                    Some(404) => "Verify the Figma file key and node-id.",
                    Some(429) => "Rate limited by Figma; wait for the retry-after period and rerun.",
                    _ => "Check FIGMA_TOKEN/URL and rate limits; retry after waiting.",
                };
                ErrorPayload::new(
                    ErrorCategory::Figma,
                    format!("Figma API error (status {:?}): {}", status, message),
                    remediation,
                )
            }
            TpcError::DomExtraction(msg) => ErrorPayload::new(
                ErrorCategory::Dom,
                msg.to_string(),
                "Check the CSS selector matches exactly one attached element once the page has loaded.",
            ),
            TpcError::Browser(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("playwright npm package is missing") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Install Playwright (e.g., `npm install playwright` and `npx playwright install chromium`).",
                    )
                } else if lower.contains("not found on path") || lower.contains("node command") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Install Node.js and ensure the node binary is on PATH; rerun after installing Playwright if needed.",
                    )
                } else if lower.contains("timeout") || lower.contains("timed out") {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Increase the browser timeouts in the config file or ensure the page loads without blocking.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Browser,
                        msg.to_string(),
                        "Re-run with --verbose to see the Playwright output.",
                    )
                }
            }
            TpcError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Unknown,
                e.to_string(),
                "Check JSON/serialization inputs; run with --verbose for details.",
            ),
            TpcError::Toml(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Fix the TOML syntax in the config or manifest file.",
            ),
            TpcError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("figma_token") || lower.contains("figma token") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Set FIGMA_TOKEN (or FIGMA_OAUTH_TOKEN) before extracting design styles.",
                    )
                } else if lower.contains("node-id") || lower.contains("node id") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Include a Figma node-id in the URL (e.g., ?node-id=1-2) or pass --node-id.",
                    )
                } else if lower.contains("file key") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use a Figma URL with a file key: https://www.figma.com/design/<FILE_KEY>/... or pass --file-key.",
                    )
                } else if lower.contains("tolerance") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Use a finite, non-negative tolerance in pixels (e.g., --tolerance 0.5).",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags, config file values, and required tokens.",
                    )
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, TpcError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Network,
    Figma,
    Dom,
    Browser,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
