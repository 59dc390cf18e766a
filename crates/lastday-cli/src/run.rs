//! Subcommand handlers. Each prints its result to stdout as JSON.

use std::time::Instant;

use lastday_core::{AppConfig, Deadline, ScoredSpot};
use lastday_providers::{KakaoClient, NaverTransitClient, TourClient};
use lastday_recommend::{Recommender, RouteQuery, ScoringOptions, StationQuery};
use serde::Serialize;

use crate::point::{resolve, PointArg};

#[derive(Debug, Serialize)]
struct Recommendation {
    recommended: Vec<ScoredSpot>,
    time_taken: f64,
}

/// Shared knobs of the `room` and `station` subcommands.
pub(crate) struct SearchArgs {
    pub content_type: u16,
    pub candidates: usize,
    pub deadline: Deadline,
}

fn build_recommender(
    config: &AppConfig,
) -> anyhow::Result<Recommender<TourClient, NaverTransitClient>> {
    Ok(Recommender::new(
        TourClient::from_app_config(config)?,
        NaverTransitClient::from_app_config(config)?,
        ScoringOptions::from_app_config(config),
    ))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn run_room(
    config: &AppConfig,
    from: &PointArg,
    to: &PointArg,
    args: SearchArgs,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let kakao = KakaoClient::from_app_config(config)?;
    let start = resolve(from, kakao.as_ref()).await?;
    let end = resolve(to, kakao.as_ref()).await?;

    let recommended = build_recommender(config)?
        .score_route_candidates(&RouteQuery {
            start,
            end,
            content_type: args.content_type,
            candidate_count: args.candidates,
            deadline: args.deadline,
        })
        .await?;

    print_json(&Recommendation {
        recommended,
        time_taken: started.elapsed().as_secs_f64(),
    })
}

pub(crate) async fn run_station(
    config: &AppConfig,
    at: &PointArg,
    radius_m: u32,
    args: SearchArgs,
) -> anyhow::Result<()> {
    let started = Instant::now();
    let kakao = KakaoClient::from_app_config(config)?;
    let start = resolve(at, kakao.as_ref()).await?;

    let recommended = build_recommender(config)?
        .score_station_candidates(&StationQuery {
            start,
            radius_m,
            content_type: args.content_type,
            candidate_count: args.candidates,
            deadline: args.deadline,
        })
        .await?;

    print_json(&Recommendation {
        recommended,
        time_taken: started.elapsed().as_secs_f64(),
    })
}

pub(crate) async fn run_places(
    config: &AppConfig,
    query: &str,
    limit: usize,
) -> anyhow::Result<()> {
    let kakao = KakaoClient::from_app_config(config)?
        .ok_or_else(|| anyhow::anyhow!("place search requires KAKAO_API_KEY"))?;
    let places = kakao.search_keyword(query, limit).await?;
    if places.is_empty() {
        tracing::warn!(query, "no places matched");
    }
    print_json(&places)
}
