//! Integration tests for the Tianditu clients (wiremock-based)

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domain::{NO_ROUTE_FOUND, ReferencedPoint, RouteMode, SpatialReference};
use integration_tianditu::{
    GeocodingClient, GeocodingError, PoiSearchOptions, RouteClient, TiandituConfig,
    TiandituError, TiandituGeocodingClient, TiandituRouteClient,
};

fn config_for_mock(base_url: &str) -> TiandituConfig {
    TiandituConfig::for_testing().with_base_url(base_url)
}

const fn sample_drive_json() -> &'static str {
    r#"{
        "status": 0,
        "results": [{
            "distance": 4210,
            "duration": 630,
            "steps": [
                {
                    "instructions": "Head east on Luoyu Road",
                    "distance": 1800,
                    "duration": 240,
                    "roadName": "Luoyu Road",
                    "startLocation": "114.3612,30.5251",
                    "endLocation": "114.3801,30.5249"
                },
                {
                    "instructions": "Turn left onto Guanshan Avenue",
                    "distance": 2410,
                    "duration": 390,
                    "roadName": "Guanshan Avenue"
                }
            ]
        }]
    }"#
}

const fn sample_bus_json() -> &'static str {
    r#"{
        "status": 0,
        "results": [{
            "routes": [{
                "distance": 6500,
                "duration": 1710,
                "steps": [
                    { "action": "walk", "instructions": "Walk to Optics Valley Square", "distance": 300, "duration": 240 },
                    { "action": "bus", "instructions": "Take metro line 2", "distance": 6200, "duration": 1470 }
                ]
            }]
        }]
    }"#
}

fn points() -> (ReferencedPoint, ReferencedPoint) {
    (
        ReferencedPoint::wgs84(114.3612, 30.5251),
        ReferencedPoint::wgs84(114.4012, 30.5049),
    )
}

fn post_str_of(request: &wiremock::Request) -> serde_json::Value {
    let raw = request
        .url
        .query_pairs()
        .find(|(k, _)| k == "postStr")
        .map(|(_, v)| v.into_owned())
        .unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn test_drive_route_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive"))
        .and(query_param("type", "search"))
        .and(query_param("tk", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_drive_json()))
        .mount(&server)
        .await;

    let client = TiandituRouteClient::new(&config_for_mock(&server.uri())).unwrap();
    let (from, to) = points();

    let result = client
        .search_route(RouteMode::Drive, from, to, &[])
        .await
        .unwrap();

    let routes = result.routes();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].duration_minutes, 11);
    assert_eq!(routes[0].steps.len(), 2);
    assert_eq!(routes[0].steps[0].duration_minutes, 4);
    assert_eq!(routes[0].steps[1].road_name.as_deref(), Some("Guanshan Avenue"));
    assert!(routes[0].steps[1].start_location.is_none());
}

#[tokio::test]
async fn test_bus_route_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transit"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_bus_json()))
        .mount(&server)
        .await;

    let client = TiandituRouteClient::new(&config_for_mock(&server.uri())).unwrap();
    let (from, to) = points();

    let result = client
        .search_route(RouteMode::Bus, from, to, &[])
        .await
        .unwrap();

    assert!(result.is_ok());
    let steps = &result.routes()[0].steps;
    assert_eq!(steps[0].action.as_deref(), Some("walk"));
    assert_eq!(steps[1].duration_minutes, 25);
}

#[tokio::test]
async fn test_mercator_origin_is_sent_as_lonlat() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/walking"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_drive_json()))
        .mount(&server)
        .await;

    let client = TiandituRouteClient::new(&config_for_mock(&server.uri())).unwrap();
    let origin = ReferencedPoint::wgs84(114.3612, 30.5251)
        .to(SpatialReference::WebMercator)
        .unwrap();
    let (_, to) = points();

    client
        .search_route(RouteMode::Walk, origin, to, &[])
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let post = post_str_of(&requests[0]);
    let orig: domain::Point = post["orig"].as_str().unwrap().parse().unwrap();
    assert!((orig.x - 114.3612).abs() < 1e-6);
    assert!((orig.y - 30.5251).abs() < 1e-6);
    assert_eq!(post["dest"], "114.4012,30.5049");
}

#[tokio::test]
async fn test_drive_waypoints_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_drive_json()))
        .mount(&server)
        .await;

    let client = TiandituRouteClient::new(&config_for_mock(&server.uri())).unwrap();
    let (from, to) = points();
    let via = [ReferencedPoint::wgs84(114.38, 30.52)];

    client
        .search_route(RouteMode::Drive, from, to, &via)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let post = post_str_of(&requests[0]);
    assert_eq!(post["mid"], serde_json::json!(["114.38,30.52"]));
}

#[tokio::test]
async fn test_upstream_failure_is_not_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"status": 1, "message": "key denied"}"#),
        )
        .mount(&server)
        .await;

    let client = TiandituRouteClient::new(&config_for_mock(&server.uri())).unwrap();
    let (from, to) = points();

    let result = client
        .search_route(RouteMode::Drive, from, to, &[])
        .await
        .unwrap();

    assert_eq!(result.reason(), Some("key denied"));
}

#[tokio::test]
async fn test_empty_results_is_no_route_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/walking"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": 0, "results": []}"#))
        .mount(&server)
        .await;

    let client = TiandituRouteClient::new(&config_for_mock(&server.uri())).unwrap();
    let (from, to) = points();

    let result = client
        .search_route(RouteMode::Walk, from, to, &[])
        .await
        .unwrap();

    assert_eq!(result.reason(), Some(NO_ROUTE_FOUND));
}

#[tokio::test]
async fn test_route_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/transit"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = TiandituRouteClient::new(&config_for_mock(&server.uri())).unwrap();
    let (from, to) = points();

    let err = client
        .search_route(RouteMode::Bus, from, to, &[])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TiandituError::RateLimitExceeded {
            retry_after_secs: Some(30)
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_route_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = TiandituRouteClient::new(&config_for_mock(&server.uri())).unwrap();
    let (from, to) = points();

    let result = client.search_route(RouteMode::Drive, from, to, &[]).await;
    assert!(matches!(result, Err(TiandituError::RequestFailed(_))));
}

#[tokio::test]
async fn test_route_non_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/drive"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = TiandituRouteClient::new(&config_for_mock(&server.uri())).unwrap();
    let (from, to) = points();

    let result = client.search_route(RouteMode::Drive, from, to, &[]).await;
    assert!(matches!(result, Err(TiandituError::ParseError(_))));
}

#[tokio::test]
async fn test_route_invalid_origin() {
    let client = TiandituRouteClient::new(&TiandituConfig::for_testing()).unwrap();
    let (_, to) = points();

    let result = client
        .search_route(RouteMode::Drive, ReferencedPoint::wgs84(f64::NAN, 0.0), to, &[])
        .await;

    assert!(matches!(result, Err(TiandituError::InvalidLocation(_))));
}

#[tokio::test]
async fn test_search_poi() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/search"))
        .and(query_param("type", "query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "status": {"infocode": 1000, "cndesc": "ok"},
                "suggests": [
                    {"name": "Wuhan University", "address": "299 Bayi Road", "gbCode": "156420106"}
                ]
            }"#,
        ))
        .mount(&server)
        .await;

    let client = TiandituGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let places = client
        .search_poi("Wuhan University", &PoiSearchOptions::default())
        .await
        .unwrap();

    assert_eq!(places.len(), 1);
    assert_eq!(places[0].address.as_deref(), Some("299 Bayi Road"));

    let requests = server.received_requests().await.unwrap();
    let post = post_str_of(&requests[0]);
    assert_eq!(post["keyWord"], "Wuhan University");
    assert_eq!(post["queryType"], 4);
    assert_eq!(post["count"], 100);
}

#[tokio::test]
async fn test_search_poi_empty_keyword() {
    let client = TiandituGeocodingClient::new(&TiandituConfig::for_testing()).unwrap();
    let result = client.search_poi("  ", &PoiSearchOptions::default()).await;
    assert!(matches!(result, Err(GeocodingError::AddressNotFound(_))));
}

#[tokio::test]
async fn test_geocode_is_cached() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoder"))
        .and(query_param("type", "geocode"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"msg": "ok", "result": [{"lonlat": {"lon": 114.305, "lat": 30.593}}]}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let config = TiandituConfig {
        geocode_cache_ttl_minutes: 10,
        ..config_for_mock(&server.uri())
    };
    let client = TiandituGeocodingClient::new(&config).unwrap();

    let first = client.geocode("Hankou Station").await.unwrap();
    let second = client.geocode("hankou station").await.unwrap();

    assert_eq!(first, ReferencedPoint::wgs84(114.305, 30.593));
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_geocode_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoder"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"msg": "ok", "result": []}"#),
        )
        .mount(&server)
        .await;

    let client = TiandituGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let result = client.geocode("Atlantis").await;

    assert!(matches!(result, Err(GeocodingError::AddressNotFound(_))));
}

#[tokio::test]
async fn test_reverse_geocode_from_mercator() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoder"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "msg": "ok",
                "result": {
                    "formatted_address": "Hubei Province, Wuhan, Hongshan District",
                    "addressComponent": {"city": "Wuhan", "county": "Hongshan District"}
                }
            }"#,
        ))
        .mount(&server)
        .await;

    let client = TiandituGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let point = ReferencedPoint::web_mercator(12_758_612.973_162_018, 3_562_849.021_661_167_5);

    let reverse = client.reverse_geocode(point).await.unwrap();
    assert_eq!(reverse.location.reference, SpatialReference::Wgs84);
    assert!(reverse.formatted_address.starts_with("Hubei"));

    let requests = server.received_requests().await.unwrap();
    let post = post_str_of(&requests[0]);
    assert!((post["lon"].as_f64().unwrap() - 114.612_570_38).abs() < 1e-6);
    assert!((post["lat"].as_f64().unwrap() - 30.460_250_61).abs() < 1e-6);
    assert_eq!(post["ver"], 1);
}

#[tokio::test]
async fn test_geocode_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoder"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = TiandituGeocodingClient::new(&config_for_mock(&server.uri())).unwrap();
    let result = client.geocode("Wuhan").await;

    assert!(matches!(
        result,
        Err(GeocodingError::Transport(TiandituError::RequestFailed(_)))
    ));
}
