//! Per-element reports and run summaries.

use serde::{Deserialize, Serialize};

use crate::error::ErrorPayload;
use crate::style::ComparisonResult;

/// Outcome of comparing one named element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementReport {
    pub element: String,
    pub matches: bool,
    pub discrepancy_count: usize,
    pub result: ComparisonResult,
}

pub fn build_report(element_name: impl Into<String>, result: ComparisonResult) -> ElementReport {
    ElementReport {
        element: element_name.into(),
        matches: result.matches,
        discrepancy_count: result.discrepancies.len(),
        result,
    }
}

/// A compared element, or one whose extraction failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ElementOutcome {
    Completed(ElementReport),
    Incomplete {
        element: String,
        error: ErrorPayload,
    },
}

impl ElementOutcome {
    pub fn element(&self) -> &str {
        match self {
            ElementOutcome::Completed(report) => &report.element,
            ElementOutcome::Incomplete { element, .. } => element,
        }
    }

    pub fn report(&self) -> Option<&ElementReport> {
        match self {
            ElementOutcome::Completed(report) => Some(report),
            ElementOutcome::Incomplete { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub total: usize,
    pub matched: usize,
    pub mismatched: usize,
    pub incomplete: usize,
    pub elements: Vec<ElementOutcome>,
}

impl RunSummary {
    pub fn from_outcomes(elements: Vec<ElementOutcome>) -> Self {
        let mut matched = 0;
        let mut mismatched = 0;
        let mut incomplete = 0;
        for outcome in &elements {
            match outcome {
                ElementOutcome::Completed(report) if report.matches => matched += 1,
                ElementOutcome::Completed(_) => mismatched += 1,
                ElementOutcome::Incomplete { .. } => incomplete += 1,
            }
        }

        Self {
            total: elements.len(),
            matched,
            mismatched,
            incomplete,
            elements,
        }
    }

    /// True when every element was compared and matched.
    pub fn passed(&self) -> bool {
        self.mismatched == 0 && self.incomplete == 0
    }
}
