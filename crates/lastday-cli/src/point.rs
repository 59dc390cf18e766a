//! Command-line locations: either literal `x,y` coordinates or a place name
//! resolved through Kakao keyword search.

use std::convert::Infallible;
use std::str::FromStr;

use lastday_core::{ContentType, Coordinate, Deadline};
use lastday_providers::KakaoClient;

#[derive(Debug, Clone, PartialEq)]
pub enum PointArg {
    Coordinate(Coordinate),
    Place(String),
}

impl FromStr for PointArg {
    type Err = Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parsed = raw.split_once(',').and_then(|(x, y)| {
            let x = x.trim().parse::<f64>().ok()?;
            let y = y.trim().parse::<f64>().ok()?;
            Some(Coordinate::new(x, y))
        });
        Ok(match parsed {
            Some(coordinate) => PointArg::Coordinate(coordinate),
            None => PointArg::Place(raw.trim().to_string()),
        })
    }
}

/// Turns a point argument into coordinates, asking Kakao for place names.
///
/// # Errors
///
/// Fails when a place name is given without a Kakao key, when the search
/// fails, or when it finds nothing.
pub(crate) async fn resolve(
    point: &PointArg,
    places: Option<&KakaoClient>,
) -> anyhow::Result<Coordinate> {
    match point {
        PointArg::Coordinate(coordinate) => Ok(*coordinate),
        PointArg::Place(name) => {
            let kakao = places.ok_or_else(|| {
                anyhow::anyhow!("'{name}' is not an x,y pair and KAKAO_API_KEY is not set")
            })?;
            let hit = kakao
                .search_keyword(name, 1)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| anyhow::anyhow!("no place found for '{name}'"))?;
            tracing::info!(
                query = %name,
                place = %hit.place_name,
                location = %hit.location,
                "resolved place name"
            );
            Ok(hit.location)
        }
    }
}

/// Parses `HH:MM` into a same-day deadline.
pub(crate) fn parse_deadline(raw: &str) -> Result<Deadline, String> {
    let (hour, minute) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected HH:MM, got '{raw}'"))?;
    let hour = hour
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid hour '{hour}': {e}"))?;
    let minute = minute
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid minute '{minute}': {e}"))?;
    Deadline::new(hour, minute).map_err(|e| e.to_string())
}

/// Accepts a raw category id (`39`) or a known label (`restaurant`).
/// Unknown numeric ids are passed through.
pub(crate) fn parse_content_type(raw: &str) -> Result<u16, String> {
    let raw = raw.trim();
    if let Ok(code) = raw.parse::<u16>() {
        return Ok(code);
    }
    ContentType::ALL
        .into_iter()
        .find(|kind| kind.label().eq_ignore_ascii_case(raw))
        .map(ContentType::code)
        .ok_or_else(|| {
            let known = ContentType::ALL.map(ContentType::label).join(", ");
            format!("unknown category '{raw}', expected an id or one of: {known}")
        })
}
