// src/server.rs
// =============================================================================
// HTTP interface for the analyzer.
//
// Routes:
//   POST /api/analyze   body {"url": "..."} -> AnalysisReport as JSON
//   GET  /health        liveness probe, fixed plain-text body
//
// Errors come back as {"error": "...", "details": "..."} with status 400 for
// problems with the submitted URL and 500 for everything else.
//
// CORS accepts the configured origins plus any https origin under the
// trusted deployment suffix (for preview deployments).
// =============================================================================

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use url::Url;

use crate::analyze::Analyzer;
use crate::config::ServerConfig;

pub const HEALTH_BODY: &str = "OK";

pub struct AppState {
    pub analyzer: Analyzer,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

fn error_response(status: StatusCode, error: &str, details: Option<String>) -> Response {
    let body = ErrorBody {
        error: error.to_string(),
        details,
    };
    (status, Json(body)).into_response()
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Response {
    let raw = match payload {
        Ok(Json(request)) => request.url.unwrap_or_default(),
        Err(rejection) => {
            warn!(error = %rejection, "rejected analyze request body");
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid request body",
                Some(rejection.body_text()),
            );
        }
    };

    match state.analyzer.analyze(&raw).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            warn!(input = %raw, status = status.as_u16(), error = %e, "analysis failed");
            error_response(status, e.label(), Some(e.details()))
        }
    }
}

async fn health() -> &'static str {
    HEALTH_BODY
}

// Decides whether a browser origin may call the API
//
// Parameters:
//   origin: value of the Origin header, e.g. "https://app.example.com"
//   config: allow-list and trusted suffix
pub fn origin_allowed(origin: &str, config: &ServerConfig) -> bool {
    let origin = origin.trim().trim_end_matches('/');
    if config.allowed_origins.iter().any(|allowed| allowed == origin) {
        return true;
    }

    let Some(suffix) = config.trusted_origin_suffix.as_deref() else {
        return false;
    };
    let suffix = suffix.trim_start_matches('.');
    if suffix.is_empty() {
        return false;
    }

    let Ok(parsed) = Url::parse(origin) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };

    parsed.scheme() == "https" && (host == suffix || host.ends_with(&format!(".{}", suffix)))
}

fn cors_layer(config: Arc<ServerConfig>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &axum::http::request::Parts| {
                origin
                    .to_str()
                    .map(|origin| origin_allowed(origin, &config))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

pub fn router(state: Arc<AppState>, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze))
        .route("/health", get(health))
        .with_state(state)
        .layer(cors_layer(Arc::new(config.clone())))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
}

// Binds the listener and serves until the process is stopped
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        analyzer: Analyzer::new(config.retriever.clone())?,
    });
    let app = router(state, &config);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "ad-readiness API listening");

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetrieverConfig;
    use axum::body::Body;
    use axum::http::Request;
    use std::time::Duration;
    use tower::ServiceExt;

    fn config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            trusted_origin_suffix: Some(".vercel.app".to_string()),
            retriever: RetrieverConfig {
                page_timeout: Duration::from_secs(2),
                probe_timeout: Duration::from_secs(1),
                ..RetrieverConfig::default()
            },
        }
    }

    fn app() -> Router {
        let config = config();
        let state = Arc::new(AppState {
            analyzer: Analyzer::new(config.retriever.clone()).unwrap(),
        });
        router(state, &config)
    }

    fn analyze_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_returns_fixed_text() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], HEALTH_BODY.as_bytes());
    }

    #[tokio::test]
    async fn test_missing_url_is_bad_request() {
        let response = app().oneshot(analyze_request("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "URL is required");
        assert!(body["details"].is_string());
    }

    #[tokio::test]
    async fn test_invalid_url_is_bad_request() {
        let response = app()
            .oneshot(analyze_request(r#"{"url": "http://"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Invalid URL format");
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let response = app().oneshot(analyze_request("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_unreachable_site_is_server_error_without_checks() {
        let response = app()
            .oneshot(analyze_request(r#"{"url": "http://127.0.0.1:1/"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Failed to fetch website");
        assert!(body.get("checks").is_none());
    }

    #[tokio::test]
    async fn test_cors_echoes_allowed_origin_only() {
        let request = |origin: &str| {
            Request::builder()
                .uri("/health")
                .header("origin", origin)
                .body(Body::empty())
                .unwrap()
        };

        let allowed = app().oneshot(request("http://localhost:3000")).await.unwrap();
        assert_eq!(
            allowed.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:3000"
        );

        let denied = app().oneshot(request("https://evil.example")).await.unwrap();
        assert!(denied.headers().get("access-control-allow-origin").is_none());
    }

    #[test]
    fn test_origin_allow_list_and_trusted_suffix() {
        let config = config();
        assert!(origin_allowed("http://localhost:3000", &config));
        assert!(origin_allowed("http://localhost:3000/", &config));
        assert!(origin_allowed("https://preview-42.vercel.app", &config));
        assert!(!origin_allowed("http://preview-42.vercel.app", &config));
        assert!(!origin_allowed("https://evilvercel.app", &config));
        assert!(!origin_allowed("https://vercel.app.evil.com", &config));
        assert!(!origin_allowed("http://localhost:4000", &config));
    }

    #[test]
    fn test_no_suffix_means_allow_list_only() {
        let mut config = config();
        config.trusted_origin_suffix = None;
        assert!(!origin_allowed("https://preview-42.vercel.app", &config));
    }
}
