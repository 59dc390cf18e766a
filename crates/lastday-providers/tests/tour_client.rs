//! Integration tests for `TourClient` using wiremock HTTP mocks.

use lastday_core::{Coordinate, SpotCatalog};
use lastday_providers::{ProviderError, TourClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> TourClient {
    TourClient::with_base_url("tour-key", 5, base_url)
        .expect("client construction should not fail")
        .with_page_size(20)
}

const TWO_ITEMS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<response>
  <header><resultCode>0000</resultCode><resultMsg>OK</resultMsg></header>
  <body>
    <items>
      <item>
        <addr1>서울특별시 중구 세종대로 99</addr1>
        <contentid>126511</contentid>
        <contenttypeid>12</contenttypeid>
        <dist>420</dist>
        <mapx>126.9751596637</mapx>
        <mapy>37.5658049363</mapy>
        <title>덕수궁</title>
      </item>
      <item>
        <contentid>264337</contentid>
        <contenttypeid>12</contenttypeid>
        <dist>1310</dist>
        <mapx>126.9780</mapx>
        <mapy>37.5714</mapy>
        <title>청계천</title>
      </item>
    </items>
    <numOfRows>20</numOfRows><pageNo>1</pageNo><totalCount>2</totalCount>
  </body>
</response>"#;

#[tokio::test]
async fn location_based_list_returns_spots_nearest_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locationBasedList"))
        .and(query_param("ServiceKey", "tour-key"))
        .and(query_param("numOfRows", "20"))
        .and(query_param("radius", "5000"))
        .and(query_param("contentTypeId", "12"))
        .and(query_param("arrange", "E"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_ITEMS))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let spots = client
        .search(Coordinate::new(126.977, 37.566), 5_000, 12)
        .await
        .expect("should parse spots");
    let field = |i: usize, k: &str| spots[i].get(k).map(String::as_str);

    assert_eq!(spots.len(), 2);
    assert_eq!(field(0, "title"), Some("덕수궁"));
    assert_eq!(field(0, "dist"), Some("420"));
    assert_eq!(field(1, "title"), Some("청계천"));
    assert_eq!(field(1, "mapy"), Some("37.5714"));
}

#[tokio::test]
async fn empty_body_section_yields_no_spots() {
    let server = MockServer::start().await;
    let xml = "<response><header><resultCode>0000</resultCode><resultMsg>OK</resultMsg></header>\
               <body><items/><numOfRows>20</numOfRows><pageNo>1</pageNo><totalCount>0</totalCount></body></response>";

    Mock::given(method("GET"))
        .and(path("/locationBasedList"))
        .respond_with(ResponseTemplate::new(200).set_body_string(xml))
        .mount(&server)
        .await;

    let spots = test_client(&server.uri())
        .location_based_list(Coordinate::new(127.0, 37.5), 10_000, 39)
        .await
        .expect("empty list is not an error");
    assert!(spots.is_empty());
}

#[tokio::test]
async fn server_error_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .location_based_list(Coordinate::new(127.0, 37.5), 10_000, 12)
        .await
        .unwrap_err();
    assert!(
        matches!(err, ProviderError::UnexpectedStatus { status: 503, .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn transient_failure_is_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(TWO_ITEMS))
        .mount(&server)
        .await;

    let client = test_client(&server.uri()).with_retry(2, 0);
    let spots = client
        .location_based_list(Coordinate::new(127.0, 37.5), 10_000, 12)
        .await
        .expect("second attempt should succeed");
    assert_eq!(spots.len(), 2);
}

#[tokio::test]
async fn unregistered_key_envelope_is_api_error() {
    let server = MockServer::start().await;
    let xml = "<OpenAPI_ServiceResponse><cmmMsgHeader><errMsg>SERVICE ERROR</errMsg>\
               <returnAuthMsg>SERVICE_KEY_IS_NOT_REGISTERED_ERROR</returnAuthMsg>\
               <returnReasonCode>30</returnReasonCode></cmmMsgHeader></OpenAPI_ServiceResponse>";

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(xml))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .with_retry(3, 0)
        .location_based_list(Coordinate::new(127.0, 37.5), 10_000, 12)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::Api { .. }), "got {err:?}");
}
