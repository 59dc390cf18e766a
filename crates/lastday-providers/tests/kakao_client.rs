//! Integration tests for `KakaoClient` using wiremock HTTP mocks.

use lastday_providers::{KakaoClient, ProviderError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> KakaoClient {
    KakaoClient::with_base_url("kakao-key", 5, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn keyword_search_sends_key_and_parses_places() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/keyword.json"))
        .and(header("authorization", "KakaoAK kakao-key"))
        .and(query_param("query", "광화문"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "documents": [
                {"place_name": "광화문", "address_name": "서울 종로구 세종로 1-68",
                 "x": "126.976829", "y": "37.575990"},
                {"place_name": "광화문광장", "address_name": "서울 종로구 세종로 1-1",
                 "x": "126.976896", "y": "37.572618"}
            ],
            "meta": {"total_count": 2, "is_end": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let places = test_client(&server.uri())
        .search_keyword("광화문", 10)
        .await
        .expect("search");
    assert_eq!(places.len(), 2);
    assert_eq!(places[1].place_name, "광화문광장");
}

#[tokio::test]
async fn rejected_key_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "errorType": "AccessDeniedError", "message": "cannot find appkey"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .with_retry(3, 0)
        .search_keyword("서울역", 5)
        .await
        .unwrap_err();
    assert!(
        matches!(err, ProviderError::UnexpectedStatus { status: 401, .. }),
        "got {err:?}"
    );
}
