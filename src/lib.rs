//! Typography Parity Checker (TPC) Library
//!
//! Compares the text styling a design specifies (a Figma text node) against
//! the styling a live web element actually computes, and reports every
//! property that differs.
//!
//! # Module Overview
//!
//! - [`style`] - Canonical style record, normalization and comparison
//! - [`figma`] - Figma API client and design-side extraction
//! - [`browser`] - Playwright-backed live-side extraction
//! - [`pipeline`] - Concurrent extraction and comparison of named elements
//! - [`report`] - Per-element reports and run summaries
//! - [`observer`] - Logging and artifact hooks
//! - [`config`] - Configuration file support
//! - [`manifest`] - Batch manifests
//! - [`resource`] - Figma URL and element locator parsing
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use tpc_lib::{compare, CanonicalStyle, CompareOptions, StyleProperty};
//!
//! let design = CanonicalStyle::default().with(StyleProperty::FontSize, 16.0);
//! let live = CanonicalStyle::default().with(StyleProperty::FontSize, "18px");
//! let result = compare(&design, &live, &CompareOptions::with_tolerance(1.0));
//! assert!(!result.matches);
//! ```

pub mod browser;
pub mod config;
pub mod error;
pub mod figma;
pub mod manifest;
pub mod observer;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod resource;
pub mod style;

pub use browser::{
    live_style_from_computed, BrowserManager, BrowserOptions, ElementTarget, RawComputedStyle,
    Viewport, DEFAULT_NAVIGATION_TIMEOUT, DEFAULT_NETWORK_IDLE_TIMEOUT, DEFAULT_PROCESS_TIMEOUT,
};
pub use config::Config;
pub use error::{ErrorCategory, ErrorPayload, Result, TpcError};
pub use figma::{design_style_from_node, extract_design_style, FigmaAuth, FigmaClient};
pub use manifest::{ElementSpec, Manifest};
pub use observer::{ArtifactObserver, NoopObserver, StyleObserver, TracingObserver};
pub use output::{ErrorOutput, TpcOutput, TPC_OUTPUT_VERSION};
pub use pipeline::TypographyChecker;
pub use report::{build_report, ElementOutcome, ElementReport, RunSummary};
pub use resource::{parse_figma_url, DesignTarget};
pub use style::{
    compare, CanonicalStyle, CompareOptions, ComparisonDiscrepancy, ComparisonResult,
    MismatchKind, StyleProperty, StyleValue, DEFAULT_TOLERANCE,
};
