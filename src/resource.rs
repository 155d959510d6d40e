//! Parsing of design and live element locators.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use url::Url;

use crate::browser::ElementTarget;
use crate::figma::normalize_node_id;
use crate::TpcError;

/// A design node: Figma file key plus node id in API form (`1:2`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignTarget {
    pub file_key: String,
    pub node_id: String,
}

impl fmt::Display for DesignTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.file_key, self.node_id)
    }
}

#[derive(Debug, Error)]
pub enum ResourceParseError {
    #[error("Invalid URL '{value}': {message}. Hint: include http(s):// and ensure the URL is well-formed.")]
    InvalidUrl { value: String, message: String },
    #[error("'{url}' is not a Figma URL. Hint: use https://www.figma.com/design/<FILE_KEY>/...?node-id=1-2")]
    NotFigma { url: String },
    #[error("Figma URL missing file key in '{url}'. Hint: use https://www.figma.com/file/<FILE_KEY>/... with a node-id.")]
    FigmaMissingFileKey { url: String },
    #[error("Figma URL missing node-id in '{url}'. Hint: copy the link to the text layer so it includes ?node-id=...")]
    FigmaMissingNodeId { url: String },
    #[error("Provide either a Figma URL or both a file key and a node id")]
    MissingDesignLocator,
    #[error("Live URL '{url}' must use an http(s) or file URL")]
    UnsupportedScheme { url: String },
}

impl From<ResourceParseError> for TpcError {
    fn from(err: ResourceParseError) -> Self {
        TpcError::Config(err.to_string())
    }
}

/// Parse `https://www.figma.com/{file|design}/<KEY>/...?node-id=1-2`.
pub fn parse_figma_url(value: &str) -> Result<DesignTarget, ResourceParseError> {
    let url = Url::parse(value.trim()).map_err(|e| ResourceParseError::InvalidUrl {
        value: value.to_string(),
        message: e.to_string(),
    })?;

    if !url.host_str().unwrap_or("").ends_with("figma.com") {
        return Err(ResourceParseError::NotFigma {
            url: value.to_string(),
        });
    }

    let path_segments: Vec<&str> = url.path_segments().map(|c| c.collect()).unwrap_or_default();

    let file_key = path_segments
        .iter()
        .position(|&s| s == "file" || s == "design")
        .and_then(|i| path_segments.get(i + 1))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .ok_or_else(|| ResourceParseError::FigmaMissingFileKey {
            url: value.to_string(),
        })?;

    let node_id = url
        .query_pairs()
        .find(|(k, _)| k == "node-id")
        .map(|(_, v)| normalize_node_id(&v))
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ResourceParseError::FigmaMissingNodeId {
            url: value.to_string(),
        })?;

    Ok(DesignTarget { file_key, node_id })
}

/// Resolve a design locator from a URL or explicit identifiers.
///
/// The URL wins when both forms are given.
pub fn resolve_design_target(
    figma_url: Option<&str>,
    file_key: Option<&str>,
    node_id: Option<&str>,
) -> Result<DesignTarget, ResourceParseError> {
    if let Some(url) = figma_url.filter(|u| !u.trim().is_empty()) {
        return parse_figma_url(url);
    }

    match (file_key.map(str::trim), node_id.map(str::trim)) {
        (Some(key), Some(node)) if !key.is_empty() && !node.is_empty() => Ok(DesignTarget {
            file_key: key.to_string(),
            node_id: normalize_node_id(node),
        }),
        _ => Err(ResourceParseError::MissingDesignLocator),
    }
}

/// Validate a page URL and pair it with a selector.
pub fn parse_element_target(
    url: &str,
    selector: &str,
) -> Result<ElementTarget, ResourceParseError> {
    let parsed = Url::parse(url.trim()).map_err(|e| ResourceParseError::InvalidUrl {
        value: url.to_string(),
        message: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https" | "file") {
        return Err(ResourceParseError::UnsupportedScheme {
            url: url.to_string(),
        });
    }

    Ok(ElementTarget::new(parsed.as_str(), selector.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figma_file_url_parses() {
        let url = "https://www.figma.com/file/ABC123/My-Design?node-id=12-34";
        let target = parse_figma_url(url).unwrap();
        assert_eq!(target.file_key, "ABC123");
        assert_eq!(target.node_id, "12:34");
    }

    #[test]
    fn figma_design_url_parses() {
        let url = "https://www.figma.com/design/XYZ789/Another-Design?node-id=5-10&t=abc";
        let target = parse_figma_url(url).unwrap();
        assert_eq!(target.file_key, "XYZ789");
        assert_eq!(target.node_id, "5:10");
        assert_eq!(target.to_string(), "XYZ789#5:10");
    }

    #[test]
    fn figma_url_requires_node_id() {
        let res = parse_figma_url("https://www.figma.com/file/ABC123/My-Design");
        assert!(matches!(
            res,
            Err(ResourceParseError::FigmaMissingNodeId { .. })
        ));
    }

    #[test]
    fn figma_url_requires_file_key() {
        let res = parse_figma_url("https://www.figma.com/proto?node-id=1-2");
        assert!(matches!(
            res,
            Err(ResourceParseError::FigmaMissingFileKey { .. })
        ));
    }

    #[test]
    fn non_figma_hosts_are_rejected() {
        let res = parse_figma_url("https://example.com/file/ABC/x?node-id=1-2");
        assert!(matches!(res, Err(ResourceParseError::NotFigma { .. })));
        assert!(matches!(
            parse_figma_url("not a url"),
            Err(ResourceParseError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn explicit_identifiers_are_normalized() {
        let target = resolve_design_target(None, Some("KEY"), Some("3-4")).unwrap();
        assert_eq!(
            target,
            DesignTarget {
                file_key: "KEY".into(),
                node_id: "3:4".into()
            }
        );
    }

    #[test]
    fn url_takes_precedence_over_identifiers() {
        let target = resolve_design_target(
            Some("https://www.figma.com/design/URLKEY/x?node-id=1-2"),
            Some("KEY"),
            Some("3:4"),
        )
        .unwrap();
        assert_eq!(target.file_key, "URLKEY");
    }

    #[test]
    fn missing_locator_is_a_configuration_error() {
        let err = resolve_design_target(None, Some("KEY"), None).unwrap_err();
        assert!(matches!(err, ResourceParseError::MissingDesignLocator));
        assert!(matches!(TpcError::from(err), TpcError::Config(_)));
    }

    #[test]
    fn element_targets_require_web_urls() {
        let target = parse_element_target("http://localhost:3000/pricing", " h1 ").unwrap();
        assert_eq!(target.url, "http://localhost:3000/pricing");
        assert_eq!(target.selector, "h1");

        assert!(matches!(
            parse_element_target("ftp://example.com", "h1"),
            Err(ResourceParseError::UnsupportedScheme { .. })
        ));
    }
}
