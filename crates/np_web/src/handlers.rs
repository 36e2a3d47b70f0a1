use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use np_core::Error;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ScrapeParams {
    pub url: Option<String>,
}

/// Maps pipeline failures onto the JSON error bodies of the HTTP API.
pub struct ApiError {
    error: Error,
    examples: Vec<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self.error {
            Error::UnsupportedSource { host, supported } => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("Unsupported source: {}", host),
                    "supported": supported,
                    "examples": self.examples,
                })),
            )
                .into_response(),
            Error::InvalidUrl(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("Invalid url: {}", message),
                    "examples": self.examples,
                })),
            )
                .into_response(),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "Scrape failed",
                    "message": other.to_string(),
                })),
            )
                .into_response(),
        }
    }
}

pub async fn scrape(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ScrapeParams>,
) -> Response {
    let Some(url) = params.url.filter(|u| !u.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Missing required query parameter: url" })),
        )
            .into_response();
    };

    info!(%url, "Scrape request");
    match state.pipeline.query(url.trim()).await {
        Ok(articles) => Json(articles).into_response(),
        Err(e) => {
            match &e {
                Error::UnsupportedSource { .. } | Error::InvalidUrl(_) => warn!(%url, error = %e, "Rejected scrape request"),
                _ => error!(%url, error = %e, "Scrape request failed"),
            }
            let examples = state
                .pipeline
                .registry()
                .sources()
                .map(|s| s.metadata.landing_url.to_string())
                .collect();
            ApiError { error: e, examples }.into_response()
        }
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let registry = state.pipeline.registry();
    Json(json!({
        "status": "OK",
        "total": registry.len(),
        "sources": registry.hosts(),
    }))
}
