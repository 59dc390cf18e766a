//! Route-via-spot and station-round-trip scoring pipelines.
//!
//! Both pipelines share one shape: a single catalog lookup, truncation to the
//! requested candidate count, a bounded concurrent fan-out of travel-time
//! lookups (each candidate fills its own result slot), and a stable sort by
//! travel time. The only difference is how a candidate's trip is measured.

use std::time::Duration;

use futures::stream::{self, StreamExt};
use lastday_core::{
    minutes_until, search_region, AppConfig, Clock, ContentType, Coordinate, Deadline, ScoredSpot,
    Spot, SpotCatalog, SystemClock, TravelTime, TravelTimeEstimator,
};

use crate::error::RecommendError;

/// Fan-out limits for a single request.
#[derive(Debug, Clone, Copy)]
pub struct ScoringOptions {
    /// Candidates whose lookups may be in flight at once. Clamped to at least 1.
    pub max_concurrent_lookups: usize,
    /// Ceiling for one leg lookup; a slower leg counts as unreachable.
    pub lookup_timeout: Duration,
}

impl Default for ScoringOptions {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: 16,
            lookup_timeout: Duration::from_secs(15),
        }
    }
}

impl ScoringOptions {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_concurrent_lookups: config.max_concurrent_lookups,
            lookup_timeout: Duration::from_secs(config.lookup_timeout_secs),
        }
    }
}

/// Spots worth stopping at on the way from `start` to `end`.
#[derive(Debug, Clone, Copy)]
pub struct RouteQuery {
    pub start: Coordinate,
    pub end: Coordinate,
    pub content_type: u16,
    pub candidate_count: usize,
    pub deadline: Deadline,
}

/// Spots worth a round trip from `start` within `radius_m` meters.
#[derive(Debug, Clone, Copy)]
pub struct StationQuery {
    pub start: Coordinate,
    pub radius_m: u32,
    pub content_type: u16,
    pub candidate_count: usize,
    pub deadline: Deadline,
}

/// How a candidate's travel time is measured.
#[derive(Debug, Clone, Copy)]
enum Trip {
    /// `start -> spot -> end`, the sum of both legs.
    Via { start: Coordinate, end: Coordinate },
    /// `start -> spot`, doubled for the way back.
    RoundTrip { start: Coordinate },
}

pub struct Recommender<C, T, K = SystemClock> {
    catalog: C,
    estimator: T,
    clock: K,
    options: ScoringOptions,
}

impl<C, T> Recommender<C, T, SystemClock>
where
    C: SpotCatalog,
    T: TravelTimeEstimator,
{
    pub fn new(catalog: C, estimator: T, options: ScoringOptions) -> Self {
        Self::with_clock(catalog, estimator, SystemClock, options)
    }
}

impl<C, T, K> Recommender<C, T, K>
where
    C: SpotCatalog,
    T: TravelTimeEstimator,
    K: Clock,
{
    pub fn with_clock(catalog: C, estimator: T, clock: K, options: ScoringOptions) -> Self {
        Self {
            catalog,
            estimator,
            clock,
            options,
        }
    }

    /// Scores spots near the midpoint of `start` and `end` by the time it
    /// takes to travel `start -> spot -> end`.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::Catalog`] if the catalog lookup fails and
    /// [`RecommendError::MalformedSpot`] if a selected candidate cannot be
    /// placed. Individual travel-time failures only drop the affected
    /// candidate.
    pub async fn score_route_candidates(
        &self,
        query: &RouteQuery,
    ) -> Result<Vec<ScoredSpot>, RecommendError> {
        let region = search_region(query.start, query.end);
        tracing::debug!(
            center = %region.center,
            radius_m = region.radius_m,
            "derived route search region"
        );

        let spots = self
            .fetch_candidates(
                region.center,
                region.radius_m,
                query.content_type,
                query.candidate_count,
            )
            .await?;
        let trip = Trip::Via {
            start: query.start,
            end: query.end,
        };
        Ok(self.score(spots, trip, query.deadline).await)
    }

    /// Scores spots within `radius_m` of `start` by round-trip travel time.
    ///
    /// # Errors
    ///
    /// Same as [`Recommender::score_route_candidates`].
    pub async fn score_station_candidates(
        &self,
        query: &StationQuery,
    ) -> Result<Vec<ScoredSpot>, RecommendError> {
        let spots = self
            .fetch_candidates(
                query.start,
                query.radius_m,
                query.content_type,
                query.candidate_count,
            )
            .await?;
        let trip = Trip::RoundTrip { start: query.start };
        Ok(self.score(spots, trip, query.deadline).await)
    }

    async fn fetch_candidates(
        &self,
        center: Coordinate,
        radius_m: u32,
        content_type: u16,
        candidate_count: usize,
    ) -> Result<Vec<Spot>, RecommendError> {
        let mut items = self
            .catalog
            .search(center, radius_m, content_type)
            .await
            .map_err(|e| RecommendError::Catalog(Box::new(e)))?;

        let fetched = items.len();
        items.truncate(candidate_count);
        // Items past the cut are never parsed.
        let spots = items
            .into_iter()
            .enumerate()
            .map(|(position, fields)| {
                Spot::from_fields(fields)
                    .map_err(|source| RecommendError::MalformedSpot { position, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        for spot in &spots {
            tracing::debug!(
                title = spot.title().unwrap_or("-"),
                content_id = spot.content_id().unwrap_or("-"),
                dist = spot.dist,
                "catalog candidate"
            );
        }
        tracing::info!(
            content_type,
            category = ContentType::label_for(content_type),
            radius_m,
            fetched,
            candidates = spots.len(),
            "catalog candidates selected"
        );
        Ok(spots)
    }

    async fn score(&self, spots: Vec<Spot>, trip: Trip, deadline: Deadline) -> Vec<ScoredSpot> {
        let candidates = spots.len();
        let width = self.options.max_concurrent_lookups.max(1);

        let lookups: Vec<_> = spots
            .into_iter()
            .map(|spot| self.score_one(spot, trip, deadline))
            .collect();

        // `buffered` yields in input order, so the stable sort below keeps
        // catalog order among equal travel times.
        let slots: Vec<Option<ScoredSpot>> =
            stream::iter(lookups).buffered(width).collect().await;
        let mut scored: Vec<ScoredSpot> = slots.into_iter().flatten().collect();

        scored.sort_by_key(|s| s.travel_time);
        tracing::info!(
            candidates,
            reachable = scored.len(),
            dropped = candidates - scored.len(),
            "candidates scored"
        );
        scored
    }

    async fn score_one(&self, spot: Spot, trip: Trip, deadline: Deadline) -> Option<ScoredSpot> {
        let available = minutes_until(deadline, self.clock.now());
        let here = spot.coordinate;

        let travel_time = match trip {
            Trip::Via { start, end } => {
                let (inbound, outbound) =
                    tokio::join!(self.leg(start, here), self.leg(here, end));
                inbound? + outbound?
            }
            Trip::RoundTrip { start } => self.leg(start, here).await? * 2,
        };

        Some(ScoredSpot {
            spot,
            travel_time,
            free_time: available - travel_time,
        })
    }

    /// One leg in minutes, or `None` when the leg cannot be used.
    async fn leg(&self, from: Coordinate, to: Coordinate) -> Option<i64> {
        let lookup = self.estimator.travel_time(from, to);
        match tokio::time::timeout(self.options.lookup_timeout, lookup).await {
            Ok(Ok(TravelTime::Minutes(m))) => Some(i64::from(m)),
            Ok(Ok(TravelTime::Unreachable)) => {
                tracing::debug!(%from, %to, "no route, dropping candidate");
                None
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    %from,
                    %to,
                    error = %e,
                    "travel-time lookup failed, dropping candidate"
                );
                None
            }
            Err(_) => {
                tracing::warn!(
                    %from,
                    %to,
                    timeout_ms =
                        u64::try_from(self.options.lookup_timeout.as_millis()).unwrap_or(u64::MAX),
                    "travel-time lookup timed out, dropping candidate"
                );
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
