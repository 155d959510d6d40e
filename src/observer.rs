//! Hooks for side effects around extraction and comparison.
//!
//! Extractor mappings and the comparator stay pure; callers that want
//! logging or artifacts pass a [`StyleObserver`] to the checker.

use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::TpcError;
use crate::report::ElementReport;
use crate::style::CanonicalStyle;

pub trait StyleObserver: Send + Sync {
    fn design_extracted(&self, _element: &str, _style: &CanonicalStyle) {}

    fn live_extracted(&self, _element: &str, _style: &CanonicalStyle) {}

    fn compared(&self, _report: &ElementReport) {}

    fn element_failed(&self, _element: &str, _error: &TpcError) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl StyleObserver for NoopObserver {}

/// Emits one structured `tracing` event per notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl StyleObserver for TracingObserver {
    fn design_extracted(&self, element: &str, style: &CanonicalStyle) {
        debug!(element, properties = style.len(), "design style extracted");
    }

    fn live_extracted(&self, element: &str, style: &CanonicalStyle) {
        debug!(element, properties = style.len(), "live style extracted");
    }

    fn compared(&self, report: &ElementReport) {
        if report.matches {
            info!(element = %report.element, "typography matches");
        } else {
            let properties: Vec<&str> = report
                .result
                .discrepancies
                .iter()
                .map(|d| d.property.as_str())
                .collect();
            warn!(
                element = %report.element,
                discrepancies = report.discrepancy_count,
                properties = ?properties,
                "typography mismatch"
            );
        }
    }

    fn element_failed(&self, element: &str, error: &TpcError) {
        warn!(element, error = %error, "element could not be compared");
    }
}

/// Writes `<element>.design.json`, `<element>.live.json` and
/// `<element>.report.json` into a directory.
#[derive(Debug, Clone)]
pub struct ArtifactObserver {
    dir: PathBuf,
}

impl ArtifactObserver {
    /// Create the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, TpcError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            TpcError::Config(format!(
                "Failed to create artifacts dir {}: {}",
                dir.display(),
                e
            ))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifact_path(&self, element: &str, kind: &str) -> PathBuf {
        self.dir.join(format!("{}.{}.json", file_stem(element), kind))
    }

    fn write<T: Serialize>(&self, element: &str, kind: &str, value: &T) {
        let path = self.artifact_path(element, kind);
        let written = serde_json::to_vec_pretty(value)
            .map_err(TpcError::from)
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(TpcError::from));
        if let Err(err) = written {
            warn!(path = %path.display(), error = %err, "failed to write artifact");
        }
    }
}

impl StyleObserver for ArtifactObserver {
    fn design_extracted(&self, element: &str, style: &CanonicalStyle) {
        self.write(element, "design", style);
    }

    fn live_extracted(&self, element: &str, style: &CanonicalStyle) {
        self.write(element, "live", style);
    }

    fn compared(&self, report: &ElementReport) {
        self.write(&report.element, "report", report);
    }

    fn element_failed(&self, element: &str, error: &TpcError) {
        self.write(element, "error", &error.to_payload());
    }
}

/// Fans notifications out to several observers in order.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn StyleObserver>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: impl StyleObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl StyleObserver for ObserverSet {
    fn design_extracted(&self, element: &str, style: &CanonicalStyle) {
        for observer in &self.observers {
            observer.design_extracted(element, style);
        }
    }

    fn live_extracted(&self, element: &str, style: &CanonicalStyle) {
        for observer in &self.observers {
            observer.live_extracted(element, style);
        }
    }

    fn compared(&self, report: &ElementReport) {
        for observer in &self.observers {
            observer.compared(report);
        }
    }

    fn element_failed(&self, element: &str, error: &TpcError) {
        for observer in &self.observers {
            observer.element_failed(element, error);
        }
    }
}

/// Element names become file names: anything outside `[A-Za-z0-9_-]` maps to `_`.
pub(crate) fn file_stem(element: &str) -> String {
    let stem: String = element
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "element".to_string()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::build_report;
    use crate::style::{compare, CompareOptions, StyleProperty};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn file_stems_are_filesystem_safe() {
        assert_eq!(file_stem("Hero title"), "Hero_title");
        assert_eq!(file_stem("nav/links:1"), "nav_links_1");
        assert_eq!(file_stem("  "), "element");
    }

    #[test]
    fn artifact_observer_writes_json_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let observer = ArtifactObserver::new(dir.path().join("artifacts")).expect("observer");

        let design = CanonicalStyle::default().with(StyleProperty::FontSize, 16.0);
        let live = CanonicalStyle::default().with(StyleProperty::FontSize, "16px");
        observer.design_extracted("Hero title", &design);
        observer.live_extracted("Hero title", &live);
        observer.compared(&build_report(
            "Hero title",
            compare(&design, &live, &CompareOptions::default()),
        ));
        observer.element_failed("Footer", &TpcError::dom("No element matches footer"));

        let design_json: serde_json::Value = serde_json::from_slice(
            &std::fs::read(observer.artifact_path("Hero title", "design")).expect("design"),
        )
        .expect("json");
        assert_eq!(design_json["fontSize"], 16.0);

        let report_json: serde_json::Value = serde_json::from_slice(
            &std::fs::read(observer.artifact_path("Hero title", "report")).expect("report"),
        )
        .expect("json");
        assert_eq!(report_json["matches"], true);

        let error_json: serde_json::Value = serde_json::from_slice(
            &std::fs::read(observer.artifact_path("Footer", "error")).expect("error"),
        )
        .expect("json");
        assert_eq!(error_json["category"], "dom");
    }

    struct Counting(Arc<AtomicUsize>);

    impl StyleObserver for Counting {
        fn compared(&self, _report: &ElementReport) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn observer_set_notifies_every_member() {
        let count = Arc::new(AtomicUsize::new(0));
        let set = ObserverSet::new()
            .with(Counting(count.clone()))
            .with(NoopObserver)
            .with(Counting(count.clone()));
        assert_eq!(set.len(), 3);

        let empty = CanonicalStyle::default();
        set.compared(&build_report(
            "a",
            compare(&empty, &empty, &CompareOptions::default()),
        ));

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
