// Integration tests for `DeviceClient` using wiremock.

use std::time::Duration;

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use radgate_api::{ClientOptions, DeviceClient, Error, RawBody};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, DeviceClient) {
    let server = MockServer::start().await;
    let base = Url::parse(&server.uri()).expect("mock server URI");
    let client = DeviceClient::new(ClientOptions::new(base)).expect("client");
    (server, client)
}

// ── Happy-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn get_info_json_object() {
    let (server, client) = setup().await;

    let body = json!({ "ip_config": "dhcp", "ip": "10.0.0.5" });

    Mock::given(method("GET"))
        .and(path("/ethernet/info"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let raw = client.get_info("ethernet").await.expect("info");
    assert_eq!(raw, RawBody::Json(body));
}

#[tokio::test]
async fn get_info_plain_text_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wifi/info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("ssid=HomeNet\npass=\"s3cr3t12\"\n"),
        )
        .mount(&server)
        .await;

    let raw = client.get_info("wifi").await.expect("info");
    match raw {
        RawBody::Text(text) => assert!(text.contains("ssid=HomeNet")),
        RawBody::Json(_) => panic!("expected text body"),
    }
}

#[tokio::test]
async fn get_info_mislabeled_json_falls_back_to_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/modem/info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("mode=FSK2")
                .insert_header("content-type", "application/json"),
        )
        .mount(&server)
        .await;

    let raw = client.get_info("modem").await.expect("info");
    assert_eq!(raw, RawBody::Text("mode=FSK2".to_string()));
}

#[tokio::test]
async fn apply_sends_form_encoded_fields() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/wifi/apply"))
        .and(header(
            "content-type",
            "application/x-www-form-urlencoded",
        ))
        .and(body_string_contains("ssid=HomeNet"))
        .and(body_string_contains("ip_config=dhcp"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let fields = [
        ("ssid", "HomeNet".to_string()),
        ("ip_config", "dhcp".to_string()),
    ];
    let body = client.apply("wifi", &fields).await.expect("apply");
    assert_eq!(body, Some(json!({ "ok": true })));
}

#[tokio::test]
async fn apply_without_json_body_returns_none() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/modem/apply"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let body = client.apply("modem", &[]).await.expect("apply");
    assert_eq!(body, None);
}

// ── Error-path tests ────────────────────────────────────────────────

#[tokio::test]
async fn failure_detail_from_json_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/wifi/apply"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "message": "radio is busy" })),
        )
        .mount(&server)
        .await;

    let err = client.apply("wifi", &[]).await.expect_err("must fail");
    match err {
        Error::Http { status, detail, .. } => {
            assert_eq!(status, 500);
            assert_eq!(detail, "radio is busy");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn failure_detail_from_html_title() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/daemon/info"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string("<html><head><title>Not Found</title></head></html>")
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    let err = client.get_info("daemon").await.expect_err("must fail");
    match err {
        Error::Http { status, detail, .. } => {
            assert_eq!(status, 404);
            assert_eq!(detail, "Not Found");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn offline_short_circuits_without_io() {
    let (server, client) = setup().await;

    // No mocks mounted: any real request would 404. Offline mode must
    // fail before the request is issued.
    client.set_offline(true);

    let err = client.get_info("wifi").await.expect_err("offline");
    assert!(err.is_offline());

    let err = client.apply("wifi", &[]).await.expect_err("offline");
    assert!(err.is_offline());

    assert!(server.received_requests().await.expect("requests").is_empty());
}

#[tokio::test]
async fn timeout_maps_to_timeout_variant() {
    let (server, _) = setup().await;

    Mock::given(method("GET"))
        .and(path("/wifi/info"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let base = Url::parse(&server.uri()).expect("mock server URI");
    let mut options = ClientOptions::new(base);
    options.timeout = Duration::from_millis(50);
    let client = DeviceClient::new(options).expect("client");

    let err = client.get_info("wifi").await.expect_err("must time out");
    assert!(matches!(err, Error::Timeout { .. }));
}
