// src/fetch/resolve.rs
// =============================================================================
// Turns whatever the user typed into an absolute URL we can request.
//
//   "example.com"          -> "https://example.com/"
//   "http://example.com"   -> "http://example.com/"
//   "not a url"            -> InvalidUrl
//
// Only http and https targets are accepted, and the URL must have a host.
// =============================================================================

use url::Url;

use crate::error::AnalysisError;

// Resolves raw input into the first URL the retriever should try
//
// Parameters:
//   raw: free-form user input (surrounding whitespace is ignored)
//
// Returns: the parsed Url, or MissingUrl / InvalidUrl
pub fn resolve_input(raw: &str) -> Result<Url, AnalysisError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::MissingUrl);
    }

    let candidate = if has_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| AnalysisError::InvalidUrl(format!("{}: {}", trimmed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(AnalysisError::InvalidUrl(format!(
            "{}: only http and https URLs are supported",
            trimmed
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(AnalysisError::InvalidUrl(format!("{}: missing host", trimmed)));
    }

    Ok(url)
}

// Returns true when the input starts with "<scheme>://"
fn has_scheme(input: &str) -> bool {
    match input.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepends_https_when_scheme_missing() {
        for input in ["example.com", "www.example.com/blog", "sub.example.org:8443/a?b=c"] {
            let url = resolve_input(input).unwrap();
            assert_eq!(url.scheme(), "https", "input: {}", input);
            assert!(url.as_str().starts_with("https://"));
        }
    }

    #[test]
    fn test_keeps_explicit_http() {
        let url = resolve_input("  http://example.com  ").unwrap();
        assert_eq!(url.as_str(), "http://example.com/");
    }

    #[test]
    fn test_empty_input_is_missing() {
        assert_eq!(resolve_input("   "), Err(AnalysisError::MissingUrl));
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(matches!(resolve_input("not a url"), Err(AnalysisError::InvalidUrl(_))));
        assert!(matches!(resolve_input("https://"), Err(AnalysisError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            resolve_input("ftp://example.com/file"),
            Err(AnalysisError::InvalidUrl(_))
        ));
    }
}
