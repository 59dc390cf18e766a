//! Collaborator seams the recommendation pipelines are written against.
//!
//! Production implementations live in `lastday-providers`; tests substitute
//! in-memory fakes.

use std::future::Future;

use crate::{Coordinate, RawSpot, TravelTime};

/// Location-based point-of-interest lookup.
pub trait SpotCatalog: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Raw records within `radius_m` of `center` in category `content_type`,
    /// nearest first. Records are validated only once they are selected as
    /// candidates, so a malformed record past the cut never fails a search.
    fn search(
        &self,
        center: Coordinate,
        radius_m: u32,
        content_type: u16,
    ) -> impl Future<Output = Result<Vec<RawSpot>, Self::Error>> + Send;
}

/// One-directional travel-time lookup between two points.
pub trait TravelTimeEstimator: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// `Ok(TravelTime::Unreachable)` means the provider answered and found
    /// no route; `Err` means the provider could not be asked.
    fn travel_time(
        &self,
        from: Coordinate,
        to: Coordinate,
    ) -> impl Future<Output = Result<TravelTime, Self::Error>> + Send;
}
