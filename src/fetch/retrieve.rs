// src/fetch/retrieve.rs
// =============================================================================
// Downloads a single resource the way a browser would.
//
// Key functionality:
// - Sends browser-like headers (User-Agent, Accept, Accept-Language, ...)
// - Follows redirects by hand so we know every hop and can bound them
// - Applies a per-request timeout and reports timeouts separately from
//   other network failures
// - Never retries on its own; protocol fallback lives at the call site
//
// Redirect bound:
//   Up to `max_redirects` Location hops are followed. After that one last
//   request goes to the most recent target. With RedirectOverflow::FinalRequest
//   that response is returned whatever its status; with RedirectOverflow::Fail
//   a response that still redirects becomes TooManyRedirects.
// =============================================================================

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, LOCATION,
    USER_AGENT,
};
use reqwest::{Client, Response};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::config::{RedirectOverflow, RetrieverConfig};

/// Everything we keep from one completed retrieval.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalOutcome {
    pub final_url: String,
    pub status_code: u16,
    /// Response headers with lower-cased names; repeated headers are joined by ", ".
    pub headers: BTreeMap<String, String>,
    #[serde(skip)]
    pub body: String,
    pub elapsed_ms: u64,
}

impl RetrievalOutcome {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("Request to {url} timed out after {millis}ms")]
    RequestTimeout { url: String, millis: u64 },

    #[error("{message} ({url})")]
    NetworkError { url: String, message: String },

    #[error("Redirect from {url} points to an invalid location: {location}")]
    InvalidRedirect { url: String, location: String },

    #[error("Too many redirects (more than {max}) while fetching {url}")]
    TooManyRedirects { url: String, max: usize },
}

/// Per-call knobs. Build one with `page` or `probe`, then add header overrides.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub timeout: Duration,
    pub follow_redirects: bool,
    pub headers: HeaderMap,
}

impl RequestOptions {
    /// Main page: long timeout, redirects followed.
    pub fn page(config: &RetrieverConfig) -> Self {
        Self {
            timeout: config.page_timeout,
            follow_redirects: true,
            headers: HeaderMap::new(),
        }
    }

    /// Auxiliary files (robots.txt, ads.txt): short timeout, no redirect chasing.
    pub fn probe(config: &RetrieverConfig) -> Self {
        Self {
            timeout: config.probe_timeout,
            follow_redirects: false,
            headers: HeaderMap::new(),
        }
    }

    /// Replaces one of the default request headers for this call only.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Retriever {
    client: Client,
    config: RetrieverConfig,
    default_headers: HeaderMap,
}

impl Retriever {
    pub fn new(config: RetrieverConfig) -> anyhow::Result<Self> {
        // Redirects are chased manually in `retrieve`
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_str(&config.user_agent)?);
        default_headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
            ),
        );
        default_headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        default_headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        default_headers.insert(
            HeaderName::from_static("upgrade-insecure-requests"),
            HeaderValue::from_static("1"),
        );

        Ok(Self {
            client,
            config,
            default_headers,
        })
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    // Retrieves a URL, chasing redirects when the options ask for it
    //
    // Returns: the last response as a RetrievalOutcome (any status code),
    //          or a RetrievalError when no response could be obtained
    pub async fn retrieve(
        &self,
        url: &Url,
        options: &RequestOptions,
    ) -> Result<RetrievalOutcome, RetrievalError> {
        // elapsed_ms covers the whole chain, not just the last hop
        let started = Instant::now();
        let mut current = url.clone();

        if options.follow_redirects {
            for hop in 0..self.config.max_redirects {
                // Any transport error ends the chain; `?` hands it to the caller
                let response = self.send(&current, options).await?;
                match redirect_target(&current, &response)? {
                    Some(next) => {
                        debug!(
                            from = %current,
                            to = %next,
                            status = response.status().as_u16(),
                            hop = hop + 1,
                            "following redirect"
                        );
                        current = next;
                    }
                    // Not a redirect (or no Location): this is the answer
                    None => return self.finish(current, response, options, started).await,
                }
            }
            warn!(
                url = %current,
                max = self.config.max_redirects,
                "redirect bound reached, issuing final request"
            );
        }

        // Bound used up (or redirects disabled): one last request, no more hops
        let response = self.send(&current, options).await?;

        if options.follow_redirects
            && self.config.redirect_overflow == RedirectOverflow::Fail
            && redirect_target(&current, &response)?.is_some()
        {
            return Err(RetrievalError::TooManyRedirects {
                url: url.to_string(),
                max: self.config.max_redirects,
            });
        }

        self.finish(current, response, options, started).await
    }

    /// Fetches an auxiliary text file (robots.txt, ads.txt) with the probe options.
    pub async fn probe(&self, url: &Url) -> Result<RetrievalOutcome, RetrievalError> {
        let options = RequestOptions::probe(&self.config)
            .with_header(ACCEPT, HeaderValue::from_static("text/plain,*/*;q=0.8"));
        self.retrieve(url, &options).await
    }

    async fn send(&self, url: &Url, options: &RequestOptions) -> Result<Response, RetrievalError> {
        // Later .headers() calls replace earlier values with the same name,
        // which is how per-call overrides win over the browser defaults
        self.client
            .get(url.as_str())
            .headers(self.default_headers.clone())
            .headers(options.headers.clone())
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| categorize_error(url, e, options.timeout))
    }

    async fn finish(
        &self,
        url: Url,
        response: Response,
        options: &RequestOptions,
        started: Instant,
    ) -> Result<RetrievalOutcome, RetrievalError> {
        let status_code = response.status().as_u16();
        let headers = collect_headers(response.headers());
        // Reading the body counts towards the same timeout as the request
        let body = response
            .text()
            .await
            .map_err(|e| categorize_error(&url, e, options.timeout))?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        debug!(url = %url, status = status_code, elapsed_ms, "retrieval finished");

        Ok(RetrievalOutcome {
            final_url: url.to_string(),
            status_code,
            headers,
            body,
            elapsed_ms,
        })
    }
}

// Reads the Location header of a 3xx response and resolves it against `current`
fn redirect_target(current: &Url, response: &Response) -> Result<Option<Url>, RetrievalError> {
    if !response.status().is_redirection() {
        return Ok(None);
    }

    let Some(location) = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
    else {
        return Ok(None);
    };

    // Location may be relative ("/next") or absolute
    current
        .join(location)
        .map(Some)
        .map_err(|_| RetrievalError::InvalidRedirect {
            url: current.to_string(),
            location: location.to_string(),
        })
}

fn collect_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collected: BTreeMap<String, String> = BTreeMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        collected
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    collected
}

// Sorts reqwest errors into timeouts and everything else
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Connection refused
fn categorize_error(url: &Url, error: reqwest::Error, timeout: Duration) -> RetrievalError {
    if error.is_timeout() {
        return RetrievalError::RequestTimeout {
            url: url.to_string(),
            millis: timeout.as_millis() as u64,
        };
    }

    let error_string = error.to_string().to_lowercase();
    let message = if error.is_connect() {
        if error_string.contains("dns") {
            "Could not resolve hostname".to_string()
        } else {
            "Connection failed".to_string()
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "SSL certificate error".to_string()
    } else {
        error.to_string()
    };

    RetrievalError::NetworkError {
        url: url.to_string(),
        message,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why turn off reqwest's own redirect handling?
//    - reqwest would follow redirects silently and only show the last URL
//    - Doing it by hand lets us log every hop and decide what happens at the limit
//    - Policy::none() makes every 3xx come back to us as a normal response
//
// 2. What is `let ... else`?
//    - `let Some(x) = value else { return ...; };`
//    - Binds x when the pattern matches, otherwise runs the else block
//    - The else block must leave the function (return, break, ...)
//
// 3. Why BTreeMap for headers?
//    - Keys come out sorted, so JSON output is stable between runs
//    - HeaderMap can hold the same name twice; we join those values with ", "
//
// 4. Why is RetrievalError Clone + PartialEq?
//    - Tests can compare errors with assert_eq!
//    - robots.txt and ads.txt results are stored and read by several checks
// -----------------------------------------------------------------------------
