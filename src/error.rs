// src/error.rs
// =============================================================================
// Terminal errors for a single analysis.
//
// Any of these stops the analysis before the check registry runs. Everything
// that is not terminal (a failing predicate, an unreachable robots.txt) is
// represented as data in the check results instead.
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),

    #[error("Could not reach the website: {0}")]
    UnreachableHost(String),

    #[error("URL does not point to an HTML page (content type: {0})")]
    UnsupportedContentType(String),

    #[error("Page returned empty or minimal content ({0} characters)")]
    EmptyOrMinimalContent(usize),

    #[error("Failed to parse page markup: {0}")]
    MalformedDocument(String),
}

impl AnalysisError {
    /// Short label used as the `error` field of API responses.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingUrl => "URL is required",
            Self::InvalidUrl(_) => "Invalid URL format",
            Self::UnreachableHost(_) => "Failed to fetch website",
            Self::UnsupportedContentType(_) => "Unsupported content type",
            Self::EmptyOrMinimalContent(_) => "Website returned empty or minimal content",
            Self::MalformedDocument(_) => "Failed to parse website content",
        }
    }

    /// Remediation hint shown next to the error.
    pub fn hint(&self) -> &'static str {
        match self {
            Self::MissingUrl => "Provide a URL such as https://example.com.",
            Self::InvalidUrl(_) => "Check if the URL is correct, e.g. https://example.com.",
            Self::UnreachableHost(_) => {
                "Check if the URL is correct and the website is publicly accessible."
            }
            Self::UnsupportedContentType(_) => "Submit the address of an HTML page, not a file.",
            Self::EmptyOrMinimalContent(_) => {
                "The site may block automated requests or render content with JavaScript only."
            }
            Self::MalformedDocument(_) => "Validate the page markup and try again.",
        }
    }

    /// True for errors caused by the caller's input (HTTP 400).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MissingUrl
                | Self::InvalidUrl(_)
                | Self::UnsupportedContentType(_)
                | Self::EmptyOrMinimalContent(_)
        )
    }

    /// Full human-readable detail: the error text plus its hint.
    pub fn details(&self) -> String {
        format!("{self}. {}", self.hint())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_are_classified() {
        assert!(AnalysisError::MissingUrl.is_client_error());
        assert!(AnalysisError::InvalidUrl("x".into()).is_client_error());
        assert!(AnalysisError::UnsupportedContentType("image/png".into()).is_client_error());
        assert!(AnalysisError::EmptyOrMinimalContent(12).is_client_error());
        assert!(!AnalysisError::UnreachableHost("timeout".into()).is_client_error());
        assert!(!AnalysisError::MalformedDocument("no markup".into()).is_client_error());
    }

    #[test]
    fn test_details_include_hint() {
        let error = AnalysisError::UnreachableHost("Request timed out after 30s".into());
        let details = error.details();
        assert!(details.starts_with("Could not reach the website: Request timed out"));
        assert!(details.contains("Check if the URL is correct"));
    }
}
