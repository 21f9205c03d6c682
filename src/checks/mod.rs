// src/checks/mod.rs
// =============================================================================
// The check registry: a fixed, ordered list of weighted rules that are run
// one by one against a fetched page.
//
// Submodules:
// - catalog: which checks exist (name, category, weight, critical flag)
// - rules: the predicate behind every automated check
// - robots: robots.txt and ads.txt parsing used by two of the rules
//
// Every rule returns Result<Verdict, CheckError>. `CheckSpec::settle` is the
// only place that turns that into a CheckResult, so a rule that errors shows
// up as a `fail` entry and the remaining rules still run.
// =============================================================================

mod catalog;
mod robots;
mod rules;

use serde::Serialize;
use thiserror::Error;

use crate::document::{Document, DocumentError};
use crate::fetch::{RetrievalError, RetrievalOutcome};

pub use catalog::{CheckKind, CheckSpec, CATALOG};
pub use rules::evaluate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Category {
    Automated,
    Structure,
    Content,
    Performance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Pass,
    Warn,
    Fail,
    Manual,
}

/// Outcome of one check, in the order the catalog declares them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub category: Category,
    pub weight: u32,
    pub status: Status,
    pub message: String,
    pub critical: bool,
}

impl CheckResult {
    /// Weight this result adds to the raw score: full, half or nothing.
    pub fn earned(&self) -> f64 {
        match self.status {
            Status::Pass => f64::from(self.weight),
            Status::Warn => f64::from(self.weight) / 2.0,
            Status::Fail | Status::Manual => 0.0,
        }
    }
}

/// What a rule decided, before it is attached to its catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub status: Status,
    pub message: String,
}

impl Verdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            status: Status::Pass,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            status: Status::Warn,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            message: message.into(),
        }
    }
}

/// Why a rule could not be evaluated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("{0}")]
    Unevaluable(String),
}

/// Result of a robots.txt / ads.txt probe.
pub type Probe = Result<RetrievalOutcome, RetrievalError>;

/// Everything a rule may look at. Rules get it explicitly; nothing is global.
pub struct CheckContext<'a> {
    pub document: &'a Document,
    pub page: &'a RetrievalOutcome,
    /// URL of the first request, before redirects and protocol fallback.
    pub requested_url: &'a str,
    pub robots: &'a Probe,
    pub ads_txt: &'a Probe,
}

/// Runs the full catalog against one page.
pub fn run_checks(ctx: &CheckContext<'_>) -> Vec<CheckResult> {
    run_catalog(&CATALOG, ctx, evaluate)
}

// Runs `catalog` in order, using `evaluate` for every automated check
//
// Manual checks never reach `evaluate`. The result always has exactly one
// entry per catalog item.
pub fn run_catalog<F>(
    catalog: &[CheckSpec],
    ctx: &CheckContext<'_>,
    evaluate: F,
) -> Vec<CheckResult>
where
    F: Fn(CheckKind, &CheckContext<'_>) -> Result<Verdict, CheckError>,
{
    catalog
        .iter()
        .map(|spec| match spec.kind.advisory() {
            Some(advisory) => spec.manual_result(advisory),
            None => spec.settle(evaluate(spec.kind, ctx)),
        })
        .collect()
}
