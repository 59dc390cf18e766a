mod places;
mod recommend;

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    http::{header, HeaderName, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use lastday_core::AppConfig;
use lastday_providers::{KakaoClient, NaverTransitClient, ProviderError, TourClient};
use lastday_recommend::{Recommender, ScoringOptions};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

pub type SpotRecommender = Recommender<TourClient, NaverTransitClient>;

#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<SpotRecommender>,
    /// `None` when no Kakao key is configured.
    pub places: Option<Arc<KakaoClient>>,
}

impl AppState {
    /// Builds every provider client from the process configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if an HTTP client cannot be built or a
    /// configured base URL does not parse.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ProviderError> {
        let recommender = Recommender::new(
            TourClient::from_app_config(config)?,
            NaverTransitClient::from_app_config(config)?,
            ScoringOptions::from_app_config(config),
        );
        Ok(Self {
            recommender: Arc::new(recommender),
            places: KakaoClient::from_app_config(config)?.map(Arc::new),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    ok: bool,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }

    pub(super) fn validation(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(request_id, "validation_error", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_unavailable" => StatusCode::BAD_GATEWAY,
            "not_configured" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Unwraps a JSON body, turning malformed JSON or wrong field types into a
/// `validation_error`.
pub(super) fn json_body<T>(
    request_id: &str,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::validation(request_id, rejection.body_text()))
}

pub(super) fn map_upstream_error(
    request_id: String,
    error: &(dyn std::error::Error + 'static),
) -> ApiError {
    tracing::error!(request_id = %request_id, error = %error, "upstream provider failed");
    ApiError::new(
        request_id,
        "upstream_unavailable",
        "an upstream provider is unavailable",
    )
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER), header::CONTENT_TYPE])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/room", post(recommend::recommend_room))
        .route("/station", post(recommend::recommend_station))
        .route("/places", get(places::search_places))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn health() -> Json<HealthData> {
    Json(HealthData { ok: true })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
