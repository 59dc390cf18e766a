//! Upstream provider clients for LastDay.
//!
//! - [`TourClient`]: TourAPI `locationBasedList`, the spot catalog (XML).
//! - [`NaverTransitClient`]: Naver transit summary with walking fallback,
//!   the travel-time estimator (JSON).
//! - [`KakaoClient`]: Kakao Local keyword search, the place lookup (JSON).
//!
//! All clients retry transient failures with jittered exponential back-off.

pub mod error;
pub mod kakao;
pub mod naver;
pub mod tour;

mod http;
mod retry;

pub use error::ProviderError;
pub use kakao::KakaoClient;
pub use naver::NaverTransitClient;
pub use tour::TourClient;
