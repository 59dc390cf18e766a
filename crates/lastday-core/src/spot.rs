use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Coordinate, CoreError};

/// One catalog record exactly as the provider sent it, tag name to text.
pub type RawSpot = BTreeMap<String, String>;

/// A catalog record ready for scoring.
///
/// Every field the provider sent is kept verbatim in `fields` and serialized
/// back out flat, except `dist`, which is coerced to an integer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spot {
    #[serde(flatten)]
    pub fields: BTreeMap<String, String>,
    pub dist: i64,
    #[serde(skip)]
    pub coordinate: Coordinate,
}

impl Spot {
    /// Builds a spot from raw provider fields.
    ///
    /// `mapx`/`mapy` must parse as floats. `dist` must parse as an integer;
    /// a decimal value is truncated toward zero.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::MissingSpotField`] or
    /// [`CoreError::InvalidSpotField`] when a required field is absent or
    /// malformed.
    pub fn from_fields(mut fields: RawSpot) -> Result<Self, CoreError> {
        let x = parse_float(&fields, "mapx")?;
        let y = parse_float(&fields, "mapy")?;
        let raw_dist = fields
            .remove("dist")
            .ok_or(CoreError::MissingSpotField { field: "dist" })?;
        let dist = parse_dist(&raw_dist)?;

        Ok(Self {
            fields,
            dist,
            coordinate: Coordinate::new(x, y),
        })
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").map(String::as_str)
    }

    #[must_use]
    pub fn content_id(&self) -> Option<&str> {
        self.fields.get("contentid").map(String::as_str)
    }
}

fn parse_float(fields: &RawSpot, field: &'static str) -> Result<f64, CoreError> {
    let raw = fields
        .get(field)
        .ok_or(CoreError::MissingSpotField { field })?;
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CoreError::InvalidSpotField {
            field,
            value: raw.clone(),
        })
}

#[allow(clippy::cast_possible_truncation)]
fn parse_dist(raw: &str) -> Result<i64, CoreError> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value.trunc() as i64),
        _ => Err(CoreError::InvalidSpotField {
            field: "dist",
            value: raw.to_string(),
        }),
    }
}

/// A spot that survived scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSpot {
    #[serde(flatten)]
    pub spot: Spot,
    /// Total minutes spent travelling (both legs).
    pub travel_time: i64,
    /// Minutes left before the deadline after travelling; may be negative.
    pub free_time: i64,
}

/// Outcome of a single travel-time lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TravelTime {
    Minutes(u32),
    /// Neither a transit nor a walking route exists.
    Unreachable,
}

/// A keyword search hit from the place lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub place_name: String,
    pub address_name: String,
    pub location: Coordinate,
}

/// Catalog category ids understood by the tourism catalog.
///
/// Pipelines forward the raw id untouched; this enum only labels known ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentType {
    #[default]
    Attraction,
    CulturalFacility,
    Festival,
    TravelCourse,
    LeisureSports,
    Lodging,
    Shopping,
    Restaurant,
}

impl ContentType {
    pub const ALL: [ContentType; 8] = [
        ContentType::Attraction,
        ContentType::CulturalFacility,
        ContentType::Festival,
        ContentType::TravelCourse,
        ContentType::LeisureSports,
        ContentType::Lodging,
        ContentType::Shopping,
        ContentType::Restaurant,
    ];

    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            ContentType::Attraction => 12,
            ContentType::CulturalFacility => 14,
            ContentType::Festival => 15,
            ContentType::TravelCourse => 25,
            ContentType::LeisureSports => 28,
            ContentType::Lodging => 32,
            ContentType::Shopping => 38,
            ContentType::Restaurant => 39,
        }
    }

    #[must_use]
    pub fn from_code(code: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ContentType::Attraction => "attraction",
            ContentType::CulturalFacility => "cultural_facility",
            ContentType::Festival => "festival",
            ContentType::TravelCourse => "travel_course",
            ContentType::LeisureSports => "leisure_sports",
            ContentType::Lodging => "lodging",
            ContentType::Shopping => "shopping",
            ContentType::Restaurant => "restaurant",
        }
    }

    /// Label for any id, `"unknown"` when the id is not one of the known kinds.
    #[must_use]
    pub fn label_for(code: u16) -> &'static str {
        Self::from_code(code).map_or("unknown", Self::label)
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
