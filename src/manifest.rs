//! Batch manifests: a TOML list of design/live element pairs.
//!
//! ```toml
//! tolerance = 1.0
//!
//! [[element]]
//! name = "Hero title"
//! figma = "https://www.figma.com/design/KEY/Site?node-id=1-2"
//! url = "https://example.com"
//! selector = "h1.hero"
//!
//! [[element]]
//! name = "Body copy"
//! file_key = "KEY"
//! node_id = "1:7"
//! url = "https://example.com"
//! selector = "main p"
//! ```

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::browser::ElementTarget;
use crate::observer::file_stem;
use crate::resource::{parse_element_target, resolve_design_target, DesignTarget};
use crate::{Result, TpcError};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawManifest {
    tolerance: Option<f64>,
    #[serde(default, rename = "element")]
    elements: Vec<RawElement>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawElement {
    name: String,
    figma: Option<String>,
    file_key: Option<String>,
    node_id: Option<String>,
    url: String,
    selector: String,
}

/// One named element to compare.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSpec {
    pub name: String,
    pub design: DesignTarget,
    pub live: ElementTarget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    /// Overrides the configured tolerance when set.
    pub tolerance: Option<f64>,
    pub elements: Vec<ElementSpec>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            TpcError::Config(format!("Failed to read manifest {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text).map_err(|e| match e {
            TpcError::Config(msg) => {
                TpcError::Config(format!("Invalid manifest ({}): {}", path.display(), msg))
            }
            other => TpcError::Config(format!("Invalid manifest ({}): {}", path.display(), other)),
        })
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let raw: RawManifest = toml::from_str(text)?;

        if let Some(tolerance) = raw.tolerance {
            if !tolerance.is_finite() || tolerance < 0.0 {
                return Err(TpcError::Config(format!(
                    "tolerance must be a non-negative number (got {tolerance})"
                )));
            }
        }
        if raw.elements.is_empty() {
            return Err(TpcError::Config(
                "manifest lists no [[element]] entries".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        let mut stems: HashMap<String, String> = HashMap::new();
        let mut elements = Vec::with_capacity(raw.elements.len());
        for element in raw.elements {
            let name = element.name.trim().to_string();
            if name.is_empty() {
                return Err(TpcError::Config("element name must not be empty".to_string()));
            }
            if !seen.insert(name.clone()) {
                return Err(TpcError::Config(format!("duplicate element name {name:?}")));
            }
            if let Some(other) = stems.insert(file_stem(&name), name.clone()) {
                return Err(TpcError::Config(format!(
                    "element {name:?} writes the same artifact files as {other:?}; rename one of them"
                )));
            }
            if element.selector.trim().is_empty() {
                return Err(TpcError::Config(format!("element {name:?} has an empty selector")));
            }

            let design = resolve_design_target(
                element.figma.as_deref(),
                element.file_key.as_deref(),
                element.node_id.as_deref(),
            )
            .map_err(|e| TpcError::Config(format!("element {name:?}: {e}")))?;
            let live = parse_element_target(&element.url, &element.selector)
                .map_err(|e| TpcError::Config(format!("element {name:?}: {e}")))?;

            elements.push(ElementSpec { name, design, live });
        }

        Ok(Self {
            tolerance: raw.tolerance,
            elements,
        })
    }
}
