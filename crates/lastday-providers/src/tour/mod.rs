//! HTTP client for the Korea Tourism Organization TourAPI (`KorService`).

mod parse;

use std::future::Future;

use lastday_core::{AppConfig, Coordinate, RawSpot, SpotCatalog};
use reqwest::{Client, Url};

use crate::error::ProviderError;
use crate::http::{build_client, endpoint_url, send_for_text};
use crate::retry::retry_with_backoff;

pub(crate) const PROVIDER: &str = "tour";

const MOBILE_OS: &str = "ETC";
const MOBILE_APP: &str = "LastDay";
/// `E` orders results by distance from the query point.
const ARRANGE_BY_DISTANCE: &str = "E";

/// Client for TourAPI's `locationBasedList` operation.
///
/// Results are requested nearest-first, so truncating the returned list keeps
/// the closest spots.
pub struct TourClient {
    client: Client,
    service_key: String,
    list_url: Url,
    page_size: u32,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl TourClient {
    /// Creates a client against `base_url` (the `KorService` root).
    ///
    /// `service_key` is the *decoded* key; it is percent-encoded when the
    /// query string is built.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// built or [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        service_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            service_key: service_key.to_owned(),
            list_url: endpoint_url(base_url, "locationBasedList")?,
            page_size: 30,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Creates a client from the process configuration.
    ///
    /// # Errors
    ///
    /// See [`TourClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ProviderError> {
        Ok(Self::with_base_url(
            &config.tour_api_key,
            config.request_timeout_secs,
            &config.tour_base_url,
        )?
        .with_page_size(config.tour_page_size)
        .with_retry(config.max_retries, config.retry_backoff_base_ms))
    }

    /// Sets `numOfRows`, the number of spots requested per call.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches raw spot records of `content_type` within `radius_m` meters of
    /// `center`, nearest first.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Http`] / [`ProviderError::UnexpectedStatus`] on
    ///   transport failure after retries.
    /// - [`ProviderError::Xml`], [`ProviderError::Api`] or
    ///   [`ProviderError::Parse`] when the body is unusable. Individual item
    ///   fields are not checked.
    pub async fn location_based_list(
        &self,
        center: Coordinate,
        radius_m: u32,
        content_type: u16,
    ) -> Result<Vec<RawSpot>, ProviderError> {
        let url = self.build_url(center, radius_m, content_type);
        let body = retry_with_backoff(PROVIDER, self.max_retries, self.backoff_base_ms, || {
            send_for_text(PROVIDER, self.client.get(url.clone()))
        })
        .await?;

        let items = parse::parse_location_based_list(&body)?;
        tracing::debug!(
            x = center.x,
            y = center.y,
            radius_m,
            content_type,
            count = items.len(),
            "tour catalog returned spots"
        );
        Ok(items)
    }

    fn build_url(&self, center: Coordinate, radius_m: u32, content_type: u16) -> Url {
        let mut url = self.list_url.clone();
        url.query_pairs_mut()
            .append_pair("ServiceKey", &self.service_key)
            .append_pair("numOfRows", &self.page_size.to_string())
            .append_pair("MobileOS", MOBILE_OS)
            .append_pair("MobileApp", MOBILE_APP)
            .append_pair("mapX", &center.x.to_string())
            .append_pair("mapY", &center.y.to_string())
            .append_pair("radius", &radius_m.to_string())
            .append_pair("arrange", ARRANGE_BY_DISTANCE)
            .append_pair("ListYN", "Y")
            .append_pair("contentTypeId", &content_type.to_string());
        url
    }
}

impl SpotCatalog for TourClient {
    type Error = ProviderError;

    fn search(
        &self,
        center: Coordinate,
        radius_m: u32,
        content_type: u16,
    ) -> impl Future<Output = Result<Vec<RawSpot>, Self::Error>> + Send {
        self.location_based_list(center, radius_m, content_type)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn build_url_carries_all_query_parameters() {
        let client = TourClient::with_base_url("key+with/slash==", 5, "http://tour.test/KorService/")
            .expect("client")
            .with_page_size(20);
        let url = client.build_url(Coordinate::new(126.95, 37.56), 7_500, 14);
        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
        let get = |k: &str| pairs.get(k).map(String::as_str);

        assert_eq!(url.path(), "/KorService/locationBasedList");
        assert_eq!(get("ServiceKey"), Some("key+with/slash=="));
        assert_eq!(get("numOfRows"), Some("20"));
        assert_eq!(get("MobileOS"), Some("ETC"));
        assert_eq!(get("MobileApp"), Some("LastDay"));
        assert_eq!(get("mapX"), Some("126.95"));
        assert_eq!(get("mapY"), Some("37.56"));
        assert_eq!(get("radius"), Some("7500"));
        assert_eq!(get("arrange"), Some("E"));
        assert_eq!(get("ListYN"), Some("Y"));
        assert_eq!(get("contentTypeId"), Some("14"));
    }

    #[test]
    fn service_key_is_percent_encoded_once() {
        let client = TourClient::with_base_url("a+b=", 5, "http://tour.test").expect("client");
        let url = client.build_url(Coordinate::new(0.0, 0.0), 5_000, 12);
        assert!(url.as_str().contains("ServiceKey=a%2Bb%3D"), "{url}");
    }

    #[test]
    fn page_size_never_zero() {
        let client = TourClient::with_base_url("k", 5, "http://tour.test")
            .expect("client")
            .with_page_size(0);
        assert_eq!(client.page_size, 1);
    }
}
