//! Domain types and pure logic shared by every LastDay crate.
//!
//! Holds the coordinate and spot model, the search-region geometry, the
//! deadline arithmetic, the collaborator traits the recommendation pipelines
//! are written against, and environment-driven application configuration.

pub mod app_config;
pub mod config;
pub mod deadline;
pub mod error;
pub mod geo;
pub mod sources;
pub mod spot;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use deadline::{minutes_until, seoul_now, Clock, Deadline, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError};
pub use geo::{midpoint_and_radius, search_region, Coordinate, SearchRegion};
pub use sources::{SpotCatalog, TravelTimeEstimator};
pub use spot::{ContentType, Place, RawSpot, ScoredSpot, Spot, TravelTime};
