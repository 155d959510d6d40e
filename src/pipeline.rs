//! Orchestration: extract both sides, compare, report.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, info_span, Instrument};

use crate::browser::BrowserManager;
use crate::figma::{extract_design_style, FigmaClient};
use crate::manifest::ElementSpec;
use crate::observer::{NoopObserver, StyleObserver};
use crate::report::{build_report, ElementOutcome, ElementReport, RunSummary};
use crate::style::{compare, CanonicalStyle, CompareOptions};
use crate::Result;

/// Runs element checks against one Figma client and one browser manager.
#[derive(Clone)]
pub struct TypographyChecker {
    figma: FigmaClient,
    browser: BrowserManager,
    options: CompareOptions,
    observer: Arc<dyn StyleObserver>,
}

impl TypographyChecker {
    pub fn new(figma: FigmaClient, browser: BrowserManager, options: CompareOptions) -> Self {
        Self {
            figma,
            browser,
            options,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn StyleObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn options(&self) -> &CompareOptions {
        &self.options
    }

    /// Extract design and live styles concurrently, then compare.
    pub async fn check_element(&self, element: &ElementSpec) -> Result<ElementReport> {
        let design = async {
            let style = extract_design_style(
                &self.figma,
                &element.design.file_key,
                &element.design.node_id,
            )
            .await?;
            self.observer.design_extracted(&element.name, &style);
            Ok::<_, crate::TpcError>(style)
        };
        let live = async {
            let style = self.browser.extract_live_style(&element.live).await?;
            self.observer.live_extracted(&element.name, &style);
            Ok::<_, crate::TpcError>(style)
        };

        // Both sides run to completion so observers see every extraction.
        let (design, live) = futures::join!(design, live);
        Ok(self.compare_styles(&element.name, &design?, &live?))
    }

    /// Compare two already-extracted styles and notify the observer.
    pub fn compare_styles(
        &self,
        element: &str,
        design: &CanonicalStyle,
        live: &CanonicalStyle,
    ) -> ElementReport {
        let report = build_report(element, compare(design, live, &self.options));
        debug!(
            element,
            matches = report.matches,
            discrepancies = report.discrepancy_count,
            "compared element"
        );
        self.observer.compared(&report);
        report
    }

    /// Check every element; failures become incomplete entries.
    pub async fn check_all(&self, elements: &[ElementSpec]) -> RunSummary {
        let checks = elements.iter().map(|element| {
            let span = info_span!("element", name = %element.name);
            async move {
                match self.check_element(element).await {
                    Ok(report) => ElementOutcome::Completed(report),
                    Err(err) => {
                        self.observer.element_failed(&element.name, &err);
                        ElementOutcome::Incomplete {
                            element: element.name.clone(),
                            error: err.to_payload(),
                        }
                    }
                }
            }
            .instrument(span)
        });

        RunSummary::from_outcomes(join_all(checks).await)
    }
}
