//! Search-region geometry for the route pipeline.
//!
//! Distances here are plain Euclidean distances in coordinate space, scaled
//! by a calibration constant tuned to the catalog's radius parameter. They
//! are not geodesic.

use serde::{Deserialize, Serialize};

/// Fraction of the start/end distance used as search radius.
pub const DEFAULT_RADIUS_RATIO: f64 = 0.75;

/// Converts coordinate-space distance into the catalog's radius unit (meters).
pub const RADIUS_SCALE: f64 = 1_000_000.0;

/// Smallest radius ever sent to the catalog.
pub const MIN_SEARCH_RADIUS_M: u32 = 5_000;

/// A point as `(x, y)`: longitude-like `x`, latitude-like `y`.
///
/// Serialized as a two-element array. No range validation is performed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(c: Coordinate) -> Self {
        (c.x, c.y)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Center and radius handed to the spot catalog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRegion {
    pub center: Coordinate,
    pub radius_m: u32,
}

#[must_use]
pub fn euclidean_distance(a: Coordinate, b: Coordinate) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

#[must_use]
pub fn midpoint(a: Coordinate, b: Coordinate) -> Coordinate {
    Coordinate::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
}

/// Midpoint of `a` and `b` with a radius of `distance * ratio * RADIUS_SCALE`,
/// truncated to whole meters and floored at [`MIN_SEARCH_RADIUS_M`].
///
/// Non-finite input does not error: the float-to-int cast saturates (NaN
/// becomes 0) and the floor applies.
#[must_use]
pub fn midpoint_and_radius(a: Coordinate, b: Coordinate, ratio: f64) -> SearchRegion {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let computed = (euclidean_distance(a, b) * ratio * RADIUS_SCALE) as u32;
    let radius_m = if computed <= MIN_SEARCH_RADIUS_M {
        MIN_SEARCH_RADIUS_M
    } else {
        computed
    };

    SearchRegion {
        center: midpoint(a, b),
        radius_m,
    }
}

/// [`midpoint_and_radius`] with [`DEFAULT_RADIUS_RATIO`].
#[must_use]
pub fn search_region(a: Coordinate, b: Coordinate) -> SearchRegion {
    midpoint_and_radius(a, b, DEFAULT_RADIUS_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_arithmetic_midpoint() {
        let a = Coordinate::new(126.938_389, 37.565_557);
        let b = Coordinate::new(126.936_980, 37.555_198);
        let region = search_region(a, b);
        assert!((region.center.x - (a.x + b.x) / 2.0).abs() < 1e-12);
        assert!((region.center.y - (a.y + b.y) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn radius_scales_distance_by_ratio() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 0.5);
        assert_eq!(search_region(a, b).radius_m, 375_000);
        assert_eq!(midpoint_and_radius(a, b, 1.0).radius_m, 500_000);
    }

    #[test]
    fn radius_is_floored_for_nearby_points() {
        let a = Coordinate::new(126.9780, 37.5665);
        let b = Coordinate::new(126.9781, 37.5666);
        assert_eq!(search_region(a, b).radius_m, MIN_SEARCH_RADIUS_M);
    }

    #[test]
    fn identical_points_use_floor() {
        let a = Coordinate::new(127.0, 37.5);
        let region = search_region(a, a);
        assert_eq!(region.radius_m, MIN_SEARCH_RADIUS_M);
        assert_eq!(region.center, a);
    }

    #[test]
    fn nan_input_still_yields_floor() {
        let a = Coordinate::new(f64::NAN, 37.5);
        let b = Coordinate::new(127.0, 37.5);
        assert_eq!(search_region(a, b).radius_m, MIN_SEARCH_RADIUS_M);
    }

    #[test]
    fn radius_never_below_floor_across_samples() {
        let points = [
            (126.90, 37.50),
            (126.9001, 37.5001),
            (127.20, 37.10),
            (-0.5, 0.5),
            (129.07, 35.17),
        ];
        for &(ax, ay) in &points {
            for &(bx, by) in &points {
                let region = search_region(Coordinate::new(ax, ay), Coordinate::new(bx, by));
                assert!(region.radius_m >= MIN_SEARCH_RADIUS_M);
            }
        }
    }

    #[test]
    fn coordinate_serializes_as_pair() {
        let json = serde_json::to_string(&Coordinate::new(126.5, 37.25)).expect("serialize");
        assert_eq!(json, "[126.5,37.25]");
        let back: Coordinate = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Coordinate::new(126.5, 37.25));
    }
}
