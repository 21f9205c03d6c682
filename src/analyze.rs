// src/analyze.rs
// =============================================================================
// Runs one complete analysis of a URL.
//
// Pipeline:
// 1. Resolve the raw input into an absolute http(s) URL
// 2. Retrieve the page; an https attempt that fails or returns a
//    non-success status is retried once over plain http
// 3. Reject non-HTML responses, near-empty bodies and unusable markup
// 4. Probe robots.txt and ads.txt at the site origin (concurrently)
// 5. Parse the page, run every check, score the results
//
// Steps 1-3 can end the analysis with an AnalysisError. After that, problems
// are reported as check results and the analysis always produces a report.
//
// The parsed document is not Send, so it never lives across an await point:
// step 3 parses and drops it, step 5 parses it again inside `evaluate`.
// =============================================================================

use serde::Serialize;
use tracing::{info, warn};
use url::Url;

use crate::checks::{run_checks, CheckContext, CheckResult, Probe};
use crate::config::RetrieverConfig;
use crate::document::{Document, DocumentError, MIN_CONTENT_CHARS};
use crate::error::AnalysisError;
use crate::fetch::{resolve_input, RequestOptions, RetrievalError, RetrievalOutcome, Retriever};
use crate::score::score;

/// Content types we are willing to analyze.
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// The full result of a successful analysis, as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub score: u8,
    pub checks: Vec<CheckResult>,
    pub final_resolved_url: String,
    pub penalties: Vec<String>,
    pub score_interpretation: String,
    pub recommendations: Vec<String>,
    pub metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub requested_url: String,
    pub status_code: u16,
    pub elapsed_ms: u64,
    pub raw_score: f64,
    pub total_possible_weight: u32,
    pub used_http_fallback: bool,
}

// The main page plus how we got it
struct FetchedPage {
    outcome: RetrievalOutcome,
    used_http_fallback: bool,
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    retriever: Retriever,
}

impl Analyzer {
    pub fn new(config: RetrieverConfig) -> anyhow::Result<Self> {
        Ok(Self {
            retriever: Retriever::new(config)?,
        })
    }

    // Analyzes a single URL
    //
    // Parameters:
    //   raw: user input, with or without a scheme
    //
    // Returns: the report, or the terminal error that stopped the analysis
    pub async fn analyze(&self, raw: &str) -> Result<AnalysisReport, AnalysisError> {
        let requested = resolve_input(raw)?;
        info!(url = %requested, "starting analysis");

        let fetched = self.fetch_page(&requested).await?;
        let page = fetched.outcome;
        ensure_html(&page)?;

        let length = page.body.trim().chars().count();
        if length < MIN_CONTENT_CHARS {
            return Err(AnalysisError::EmptyOrMinimalContent(length));
        }

        // No robots.txt or ads.txt requests for pages we would reject anyway
        ensure_parsable(&page.body)?;

        let final_url = Url::parse(&page.final_url)
            .map_err(|e| AnalysisError::InvalidUrl(format!("{} ({})", page.final_url, e)))?;
        let (robots, ads_txt) = futures::future::join(
            self.probe_file(&final_url, "/robots.txt"),
            self.probe_file(&final_url, "/ads.txt"),
        )
        .await;

        let report = evaluate(
            &page,
            requested.as_str(),
            &robots,
            &ads_txt,
            fetched.used_http_fallback,
        )?;

        info!(
            url = %report.final_resolved_url,
            score = report.score,
            elapsed_ms = page.elapsed_ms,
            "analysis finished"
        );
        Ok(report)
    }

    // Retrieves the main page with the https -> http fallback
    async fn fetch_page(&self, url: &Url) -> Result<FetchedPage, AnalysisError> {
        let options = RequestOptions::page(self.retriever.config());

        let first_problem = match self.retriever.retrieve(url, &options).await {
            Ok(outcome) if outcome.is_success() => {
                return Ok(FetchedPage {
                    outcome,
                    used_http_fallback: false,
                })
            }
            Ok(outcome) => format!("HTTP {} from {}", outcome.status_code, outcome.final_url),
            Err(e) => e.to_string(),
        };

        if url.scheme() != "https" {
            return Err(AnalysisError::UnreachableHost(first_problem));
        }

        let mut fallback = url.clone();
        if fallback.set_scheme("http").is_err() {
            return Err(AnalysisError::UnreachableHost(first_problem));
        }
        warn!(
            url = %url,
            problem = %first_problem,
            "https attempt failed, retrying over http"
        );

        match self.retriever.retrieve(&fallback, &options).await {
            Ok(outcome) if outcome.is_success() => Ok(FetchedPage {
                outcome,
                used_http_fallback: true,
            }),
            Ok(outcome) => Err(AnalysisError::UnreachableHost(format!(
                "{}; HTTP {} from {}",
                first_problem, outcome.status_code, outcome.final_url
            ))),
            Err(e) => Err(AnalysisError::UnreachableHost(format!(
                "{}; {}",
                first_problem, e
            ))),
        }
    }

    // Fetches robots.txt or ads.txt from the origin of `page_url`
    async fn probe_file(&self, page_url: &Url, path: &str) -> Probe {
        let target = match page_url.join(path) {
            Ok(target) => target,
            Err(e) => {
                return Err(RetrievalError::NetworkError {
                    url: page_url.to_string(),
                    message: format!("cannot build {} URL: {}", path, e),
                })
            }
        };

        let probe = self.retriever.probe(&target).await;
        if let Err(e) = &probe {
            warn!(url = %target, error = %e, "probe failed");
        }
        probe
    }
}

// Rejects responses that announce a non-HTML content type
//
// A missing Content-Type header is accepted; plenty of small servers omit it.
fn ensure_html(page: &RetrievalOutcome) -> Result<(), AnalysisError> {
    let Some(content_type) = page.header("content-type") else {
        return Ok(());
    };

    let lowered = content_type.to_ascii_lowercase();
    if HTML_CONTENT_TYPES.iter().any(|allowed| lowered.contains(allowed)) {
        Ok(())
    } else {
        Err(AnalysisError::UnsupportedContentType(content_type.to_string()))
    }
}

fn parse_document(body: &str) -> Result<Document, AnalysisError> {
    Document::parse(body).map_err(|e| match e {
        DocumentError::MinimalContent(length) => AnalysisError::EmptyOrMinimalContent(length),
        other => AnalysisError::MalformedDocument(other.to_string()),
    })
}

// Parses the body once and throws the document away
fn ensure_parsable(body: &str) -> Result<(), AnalysisError> {
    parse_document(body).map(|_| ())
}

// Parses the page, runs the registry and scores it
fn evaluate(
    page: &RetrievalOutcome,
    requested_url: &str,
    robots: &Probe,
    ads_txt: &Probe,
    used_http_fallback: bool,
) -> Result<AnalysisReport, AnalysisError> {
    let document = parse_document(&page.body)?;

    let checks = run_checks(&CheckContext {
        document: &document,
        page,
        requested_url,
        robots,
        ads_txt,
    });
    let report = score(&checks);

    Ok(AnalysisReport {
        score: report.final_score,
        checks,
        final_resolved_url: page.final_url.clone(),
        penalties: report.penalties,
        score_interpretation: report.interpretation,
        recommendations: report.recommendations,
        metadata: AnalysisMetadata {
            requested_url: requested_url.to_string(),
            status_code: page.status_code,
            elapsed_ms: page.elapsed_ms,
            raw_score: report.raw_score,
            total_possible_weight: report.total_possible_weight,
            used_http_fallback,
        },
    })
}
