//! Travel-time lookups against Naver map's public-transit and walking routers.
//!
//! The transit summary is asked first. When it reports error code `-99`
//! (no transit route between the points) the walking router is asked instead.
//! Any other provider-reported error means the destination is unreachable.

use std::future::Future;

use lastday_core::{AppConfig, Coordinate, TravelTime, TravelTimeEstimator};
use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::ProviderError;
use crate::http::{build_client, endpoint_url, send_for_json};
use crate::retry::retry_with_backoff;

const PROVIDER: &str = "naver";
const NO_TRANSIT_ROUTE: i64 = -99;
const ORIGIN_LABEL: &str = "출발지";
const DESTINATION_LABEL: &str = "도착지";

/// What the transit summary said about a pair of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TransitAnswer {
    Minutes(u32),
    /// Transit has no route; try walking.
    WalkOnly,
    Unreachable,
}

/// Client for Naver's transit summary and walking direction endpoints.
pub struct NaverTransitClient {
    client: Client,
    transit_url: Url,
    walk_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NaverTransitClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// built or [`ProviderError::InvalidBaseUrl`] if either URL does not parse.
    pub fn new(
        transit_url: &str,
        walk_url: &str,
        timeout_secs: u64,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            transit_url: endpoint_url(transit_url, "")?,
            walk_url: endpoint_url(walk_url, "")?,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// # Errors
    ///
    /// See [`NaverTransitClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ProviderError> {
        Ok(Self::new(
            &config.naver_transit_url,
            &config.naver_walk_url,
            config.request_timeout_secs,
        )?
        .with_retry(config.max_retries, config.retry_backoff_base_ms))
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Minutes from `from` to `to` by public transit, falling back to walking.
    ///
    /// # Errors
    ///
    /// Transport failures and bodies missing the expected fields are errors;
    /// a provider-reported "no route" is `Ok(TravelTime::Unreachable)`.
    pub async fn minutes_between(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> Result<TravelTime, ProviderError> {
        let summary = self.get_json(self.transit_request_url(from, to)).await?;
        match interpret_transit(&summary)? {
            TransitAnswer::Minutes(m) => Ok(TravelTime::Minutes(m)),
            TransitAnswer::Unreachable => Ok(TravelTime::Unreachable),
            TransitAnswer::WalkOnly => {
                tracing::debug!(%from, %to, "no transit route, asking walking router");
                let walk = self.get_json(self.walk_request_url(from, to)).await?;
                interpret_walk(&walk)
            }
        }
    }

    async fn get_json(&self, url: Url) -> Result<Value, ProviderError> {
        retry_with_backoff(PROVIDER, self.max_retries, self.backoff_base_ms, || {
            send_for_json(PROVIDER, self.client.get(url.clone()))
        })
        .await
    }

    fn transit_request_url(&self, from: Coordinate, to: Coordinate) -> Url {
        let mut url = self.transit_url.clone();
        url.query_pairs_mut()
            .append_pair("apiVersion", "3")
            .append_pair("searchType", "0")
            .append_pair("start", &format!("{from},{ORIGIN_LABEL}"))
            .append_pair("destination", &format!("{to},{DESTINATION_LABEL}"));
        url
    }

    fn walk_request_url(&self, from: Coordinate, to: Coordinate) -> Url {
        let mut url = self.walk_url.clone();
        url.query_pairs_mut()
            .append_pair("lo", "ko")
            .append_pair("r", "step")
            .append_pair("st", "1")
            .append_pair("o", "all")
            .append_pair(
                "l",
                &format!("{from},{ORIGIN_LABEL},1;{to},{DESTINATION_LABEL}"),
            )
            .append_pair("lang", "ko");
        url
    }
}

impl TravelTimeEstimator for NaverTransitClient {
    type Error = ProviderError;

    fn travel_time(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<TravelTime, Self::Error>> + Send {
        self.minutes_between(from, to)
    }
}

/// Reads `result.path[0].info.totalTime` (minutes) from a transit summary.
pub(crate) fn interpret_transit(body: &Value) -> Result<TransitAnswer, ProviderError> {
    if let Some(error) = body.get("error") {
        return Ok(
            if error.get("code").and_then(Value::as_i64) == Some(NO_TRANSIT_ROUTE) {
                TransitAnswer::WalkOnly
            } else {
                TransitAnswer::Unreachable
            },
        );
    }

    let total = body
        .pointer("/result/path/0/info/totalTime")
        .and_then(Value::as_u64)
        .ok_or_else(|| ProviderError::Parse {
            context: "naver transit summary".to_string(),
            reason: "missing result.path[0].info.totalTime".to_string(),
        })?;
    Ok(TransitAnswer::Minutes(clamp_minutes(total)))
}

/// Reads `routes[0].summary.duration` (seconds) from a walking route and
/// converts it to whole minutes.
pub(crate) fn interpret_walk(body: &Value) -> Result<TravelTime, ProviderError> {
    if body.get("error").is_some() {
        return Ok(TravelTime::Unreachable);
    }

    let seconds = body
        .pointer("/routes/0/summary/duration")
        .and_then(Value::as_u64)
        .ok_or_else(|| ProviderError::Parse {
            context: "naver walking route".to_string(),
            reason: "missing routes[0].summary.duration".to_string(),
        })?;
    Ok(TravelTime::Minutes(clamp_minutes(seconds / 60)))
}

fn clamp_minutes(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
