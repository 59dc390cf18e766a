//! Shared `reqwest` plumbing for the provider clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};

use crate::error::ProviderError;

const USER_AGENT: &str = "lastday/0.1 (tour-recommender)";

/// Builds a `reqwest::Client` with the request timeout every provider shares.
///
/// # Errors
///
/// Returns [`ProviderError::Http`] if the client cannot be constructed.
pub(crate) fn build_client(timeout_secs: u64) -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .user_agent(USER_AGENT)
        .build()
        .map_err(ProviderError::Http)
}

/// Parses `base` and appends `path` as its final segment(s).
///
/// Trailing slashes on `base` are ignored so `https://host/api` and
/// `https://host/api/` resolve identically.
pub(crate) fn endpoint_url(base: &str, path: &str) -> Result<Url, ProviderError> {
    let joined = if path.is_empty() {
        base.trim_end_matches('/').to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    };
    Url::parse(&joined).map_err(|e| ProviderError::InvalidBaseUrl {
        url: base.to_string(),
        reason: e.to_string(),
    })
}

/// Sends `request`, rejects non-2xx statuses, and returns the body text.
///
/// # Errors
///
/// - [`ProviderError::Http`] on network failure (URL stripped).
/// - [`ProviderError::UnexpectedStatus`] on a non-2xx response.
pub(crate) async fn send_for_text(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<String, ProviderError> {
    let response = request.send().await.map_err(|e| e.without_url())?;
    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::UnexpectedStatus {
            provider,
            status: status.as_u16(),
        });
    }
    let body = response.text().await.map_err(|e| e.without_url())?;
    Ok(body)
}

/// [`send_for_text`] followed by JSON parsing.
///
/// # Errors
///
/// As [`send_for_text`], plus [`ProviderError::Deserialize`] when the body
/// is not valid JSON.
pub(crate) async fn send_for_json(
    provider: &'static str,
    request: RequestBuilder,
) -> Result<serde_json::Value, ProviderError> {
    let body = send_for_text(provider, request).await?;
    serde_json::from_str(&body).map_err(|e| ProviderError::Deserialize {
        context: provider.to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_joins_with_single_slash() {
        let url = endpoint_url("http://example.com/rest/KorService/", "locationBasedList")
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://example.com/rest/KorService/locationBasedList"
        );
    }

    #[test]
    fn endpoint_url_with_empty_path_keeps_base() {
        let url = endpoint_url("https://m.map.naver.com/apis/rp/pubtrans/summary", "")
            .expect("url");
        assert_eq!(
            url.as_str(),
            "https://m.map.naver.com/apis/rp/pubtrans/summary"
        );
    }

    #[test]
    fn endpoint_url_rejects_garbage() {
        let err = endpoint_url("not a url", "x").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidBaseUrl { .. }));
    }
}
