//! Kakao Local keyword search, used to turn place names into coordinates.

use lastday_core::{AppConfig, Coordinate, Place};
use reqwest::{header::AUTHORIZATION, Client, Url};
use serde::Deserialize;

use crate::error::ProviderError;
use crate::http::{build_client, endpoint_url, send_for_json};
use crate::retry::retry_with_backoff;

const PROVIDER: &str = "kakao";

/// Kakao returns at most 15 documents per page.
pub const MAX_PAGE_SIZE: usize = 15;

#[derive(Debug, Deserialize)]
struct KeywordSearchResponse {
    documents: Vec<KeywordDocument>,
}

#[derive(Debug, Deserialize)]
struct KeywordDocument {
    place_name: String,
    address_name: String,
    x: String,
    y: String,
}

pub struct KakaoClient {
    client: Client,
    api_key: String,
    search_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl KakaoClient {
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the `reqwest::Client` cannot be
    /// built or [`ProviderError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(timeout_secs)?,
            api_key: api_key.to_owned(),
            search_url: endpoint_url(base_url, "v2/local/search/keyword.json")?,
            max_retries: 0,
            backoff_base_ms: 0,
        })
    }

    /// Returns `Ok(None)` when no Kakao key is configured.
    ///
    /// # Errors
    ///
    /// See [`KakaoClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Option<Self>, ProviderError> {
        config
            .kakao_api_key
            .as_deref()
            .map(|key| {
                Self::with_base_url(key, config.request_timeout_secs, &config.kakao_base_url)
                    .map(|c| c.with_retry(config.max_retries, config.retry_backoff_base_ms))
            })
            .transpose()
    }

    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// First `limit` places matching `query`, in Kakao's relevance order.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Http`] / [`ProviderError::UnexpectedStatus`] on
    ///   transport failure or a rejected key.
    /// - [`ProviderError::Deserialize`] / [`ProviderError::Parse`] when the
    ///   body does not match the documented shape.
    pub async fn search_keyword(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Place>, ProviderError> {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("page", "1");
        let authorization = format!("KakaoAK {}", self.api_key);

        let body = retry_with_backoff(PROVIDER, self.max_retries, self.backoff_base_ms, || {
            send_for_json(
                PROVIDER,
                self.client
                    .get(url.clone())
                    .header(AUTHORIZATION, authorization.as_str()),
            )
        })
        .await?;

        let places = parse_keyword_response(body, limit)?;
        tracing::debug!(query, count = places.len(), "kakao keyword search");
        Ok(places)
    }
}

fn parse_keyword_response(
    body: serde_json::Value,
    limit: usize,
) -> Result<Vec<Place>, ProviderError> {
    let response: KeywordSearchResponse =
        serde_json::from_value(body).map_err(|e| ProviderError::Deserialize {
            context: "kakao keyword search".to_string(),
            source: e,
        })?;

    response
        .documents
        .into_iter()
        .take(limit)
        .map(|doc| {
            let x = parse_coord(&doc.x)?;
            let y = parse_coord(&doc.y)?;
            Ok(Place {
                place_name: doc.place_name,
                address_name: doc.address_name,
                location: Coordinate::new(x, y),
            })
        })
        .collect()
}

fn parse_coord(raw: &str) -> Result<f64, ProviderError> {
    raw.trim().parse::<f64>().map_err(|e| ProviderError::Parse {
        context: "kakao keyword search".to_string(),
        reason: format!("invalid coordinate \"{raw}\": {e}"),
    })
}
