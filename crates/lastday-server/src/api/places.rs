use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use lastday_core::Place;
use lastday_providers::kakao::MAX_PAGE_SIZE;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_upstream_error, ApiError, AppState};

const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub(super) struct PlacesQuery {
    pub query: String,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct PlacesResponse {
    pub places: Vec<Place>,
}

pub(super) fn normalize_limit(limit: Option<i64>) -> usize {
    let max = i64::try_from(MAX_PAGE_SIZE).unwrap_or(i64::MAX);
    usize::try_from(limit.unwrap_or(DEFAULT_LIMIT).clamp(1, max)).unwrap_or(1)
}

pub(super) async fn search_places(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<PlacesQuery>, QueryRejection>,
) -> Result<Json<PlacesResponse>, ApiError> {
    let Query(params) =
        params.map_err(|rejection| ApiError::validation(req_id.0.clone(), rejection.body_text()))?;

    let query = params.query.trim();
    if query.is_empty() {
        return Err(ApiError::validation(req_id.0, "query must not be empty"));
    }

    let Some(kakao) = state.places.as_ref() else {
        return Err(ApiError::new(
            req_id.0,
            "not_configured",
            "place search requires KAKAO_API_KEY",
        ));
    };

    let places = kakao
        .search_keyword(query, normalize_limit(params.limit))
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e))?;

    Ok(Json(PlacesResponse { places }))
}
