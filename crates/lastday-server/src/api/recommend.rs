use std::time::Instant;

use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use lastday_core::{Coordinate, Deadline, ScoredSpot};
use lastday_recommend::{RouteQuery, StationQuery};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{json_body, map_upstream_error, ApiError, AppState};

const DEFAULT_CONTENT_TYPE: u16 = 12;
const DEFAULT_CANDIDATES: i64 = 10;
const DEFAULT_LIMIT_HOUR: u32 = 15;
const DEFAULT_LIMIT_MINUTE: u32 = 30;
const DEFAULT_STATION_RADIUS_M: i64 = 10_000;

fn default_content_type() -> u16 {
    DEFAULT_CONTENT_TYPE
}

fn default_candidates() -> i64 {
    DEFAULT_CANDIDATES
}

fn default_limit_hour() -> u32 {
    DEFAULT_LIMIT_HOUR
}

fn default_limit_minute() -> u32 {
    DEFAULT_LIMIT_MINUTE
}

/// Body of `POST /room`: the lodging and the place the user must reach.
#[derive(Debug, Deserialize)]
pub(super) struct RoomRequest {
    pub source_x: f64,
    pub source_y: f64,
    pub dest_x: f64,
    pub dest_y: f64,
    #[serde(default = "default_content_type")]
    pub content_type: u16,
    #[serde(default = "default_candidates")]
    pub candidates: i64,
    #[serde(default = "default_limit_hour")]
    pub limit_time_hour: u32,
    #[serde(default = "default_limit_minute")]
    pub limit_time_min: u32,
}

/// Body of `POST /station`. A missing or `null` radius means 10 km.
#[derive(Debug, Deserialize)]
pub(super) struct StationRequest {
    pub source_x: f64,
    pub source_y: f64,
    #[serde(default)]
    pub radius: Option<i64>,
    #[serde(default = "default_content_type")]
    pub content_type: u16,
    #[serde(default = "default_candidates")]
    pub candidates: i64,
    #[serde(default = "default_limit_hour")]
    pub limit_time_hour: u32,
    #[serde(default = "default_limit_minute")]
    pub limit_time_min: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct RecommendResponse {
    pub recommended: Vec<ScoredSpot>,
    /// Wall-clock seconds spent serving the request.
    pub time_taken: f64,
}

impl RoomRequest {
    fn into_query(self, request_id: &str) -> Result<RouteQuery, ApiError> {
        Ok(RouteQuery {
            start: Coordinate::new(self.source_x, self.source_y),
            end: Coordinate::new(self.dest_x, self.dest_y),
            content_type: self.content_type,
            candidate_count: candidate_count(request_id, self.candidates)?,
            deadline: deadline(request_id, self.limit_time_hour, self.limit_time_min)?,
        })
    }
}

impl StationRequest {
    fn into_query(self, request_id: &str) -> Result<StationQuery, ApiError> {
        let radius = self.radius.unwrap_or(DEFAULT_STATION_RADIUS_M);
        let radius_m = u32::try_from(radius)
            .ok()
            .filter(|r| *r >= 1)
            .ok_or_else(|| {
                ApiError::validation(
                    request_id,
                    format!("radius must be a positive number of meters, got {radius}"),
                )
            })?;

        Ok(StationQuery {
            start: Coordinate::new(self.source_x, self.source_y),
            radius_m,
            content_type: self.content_type,
            candidate_count: candidate_count(request_id, self.candidates)?,
            deadline: deadline(request_id, self.limit_time_hour, self.limit_time_min)?,
        })
    }
}

fn candidate_count(request_id: &str, candidates: i64) -> Result<usize, ApiError> {
    usize::try_from(candidates)
        .ok()
        .filter(|c| *c >= 1)
        .ok_or_else(|| {
            ApiError::validation(
                request_id,
                format!("candidates must be at least 1, got {candidates}"),
            )
        })
}

fn deadline(request_id: &str, hour: u32, minute: u32) -> Result<Deadline, ApiError> {
    Deadline::new(hour, minute).map_err(|e| ApiError::validation(request_id, e.to_string()))
}

pub(super) async fn recommend_room(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<RoomRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let started = Instant::now();
    let query = json_body(&req_id.0, payload)?.into_query(&req_id.0)?;

    let recommended = state
        .recommender
        .score_route_candidates(&query)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e))?;

    tracing::info!(
        request_id = %req_id.0,
        returned = recommended.len(),
        "room recommendation served"
    );
    Ok(Json(RecommendResponse {
        recommended,
        time_taken: started.elapsed().as_secs_f64(),
    }))
}

pub(super) async fn recommend_station(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<StationRequest>, JsonRejection>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let started = Instant::now();
    let query = json_body(&req_id.0, payload)?.into_query(&req_id.0)?;

    let recommended = state
        .recommender
        .score_station_candidates(&query)
        .await
        .map_err(|e| map_upstream_error(req_id.0.clone(), &e))?;

    tracing::info!(
        request_id = %req_id.0,
        returned = recommended.len(),
        "station recommendation served"
    );
    Ok(Json(RecommendResponse {
        recommended,
        time_taken: started.elapsed().as_secs_f64(),
    }))
}
