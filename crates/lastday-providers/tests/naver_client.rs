//! Integration tests for `NaverTransitClient` using wiremock HTTP mocks.

use lastday_core::{Coordinate, TravelTime, TravelTimeEstimator};
use lastday_providers::{NaverTransitClient, ProviderError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> NaverTransitClient {
    NaverTransitClient::new(
        &format!("{base_url}/apis/rp/pubtrans/summary"),
        &format!("{base_url}/v5/api/dir/findwalk"),
        5,
    )
    .expect("client construction should not fail")
}

const FROM: Coordinate = Coordinate::new(126.9383, 37.5655);
const TO: Coordinate = Coordinate::new(126.9769, 37.5759);

#[tokio::test]
async fn transit_route_minutes_are_returned() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apis/rp/pubtrans/summary"))
        .and(query_param("start", "126.9383,37.5655,출발지"))
        .and(query_param("destination", "126.9769,37.5759,도착지"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "result": {"path": [{"info": {"totalTime": 24, "payment": 1250}}]}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v5/api/dir/findwalk"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let minutes = test_client(&server.uri())
        .travel_time(FROM, TO)
        .await
        .expect("lookup");
    assert_eq!(minutes, TravelTime::Minutes(24));
}

#[tokio::test]
async fn no_transit_route_falls_back_to_walking() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apis/rp/pubtrans/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": {"code": -99, "displayCode": "-99", "message": "no route"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v5/api/dir/findwalk"))
        .and(query_param("l", "126.9383,37.5655,출발지,1;126.9769,37.5759,도착지"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "routes": [{"summary": {"distance": 900, "duration": 725}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let minutes = test_client(&server.uri())
        .minutes_between(FROM, TO)
        .await
        .expect("lookup");
    assert_eq!(minutes, TravelTime::Minutes(12));
}

#[tokio::test]
async fn no_walking_route_is_unreachable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/apis/rp/pubtrans/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": {"code": -99}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v5/api/dir/findwalk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "error": {"code": 3, "message": "route not found"}
        })))
        .mount(&server)
        .await;

    let minutes = test_client(&server.uri())
        .minutes_between(FROM, TO)
        .await
        .expect("unreachable is not an error");
    assert_eq!(minutes, TravelTime::Unreachable);
}

#[tokio::test]
async fn non_json_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>busy</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .minutes_between(FROM, TO)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Deserialize { .. }), "got {err:?}");
}
