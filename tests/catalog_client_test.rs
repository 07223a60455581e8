use cortex_links::core::client::{HttpSettings, DEFAULT_USER_AGENT};
use cortex_links::core::url::normalize;
use cortex_links::core::{ApiBase, BaseUrl, CatalogApi, CatalogEntity, TeamRef};
use cortex_links::CatalogClient;
use httpmock::prelude::*;
use std::time::Duration;

fn client() -> CatalogClient {
    CatalogClient::new(&HttpSettings::default()).unwrap()
}

fn bases(server: &MockServer) -> (BaseUrl, ApiBase) {
    let base = normalize(server.base_url().as_str()).unwrap();
    (base.clone(), ApiBase::explicit(base))
}

#[tokio::test]
async fn test_health_check_success() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/version")
            .header("authorization", "Bearer tok")
            .header("user-agent", DEFAULT_USER_AGENT);
        then.status(200).json_body(serde_json::json!({"version": "1.2.3"}));
    });

    let (base, _) = bases(&server);
    let report = client().check_health(&base, Some("tok")).await;

    mock.assert();
    assert!(report.ok);
    assert_eq!(report.message, "Connection successful");
    assert_eq!(report.http_code, Some(200));
}

#[tokio::test]
async fn test_health_check_maps_status_codes() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/version");
        then.status(401);
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/catalog/definitions");
        then.status(503);
    });

    let (base, api_base) = bases(&server);
    let ui = client().check_health(&base, Some("tok")).await;
    assert!(!ui.ok);
    assert_eq!(ui.http_code, Some(401));
    assert!(ui.message.contains("Unauthorized"));

    let api = client().check_api_health(&api_base, Some("tok")).await;
    assert!(!api.ok);
    assert_eq!(api.http_code, Some(503));
    assert_eq!(api.message, "HTTP 503");
}

#[tokio::test]
async fn test_health_check_not_found_names_endpoint() {
    let server = MockServer::start();
    let (_, api_base) = bases(&server);

    let report = client().check_api_health(&api_base, None).await;
    assert!(!report.ok);
    assert_eq!(report.http_code, Some(404));
    assert!(report.message.contains("/api/v1/catalog/definitions"));
}

#[tokio::test]
async fn test_token_is_omitted_when_absent() {
    let server = MockServer::start();
    let authed = server.mock(|when, then| {
        when.method(GET)
            .path("/api/version")
            .header_exists("authorization");
        then.status(200);
    });

    let (base, _) = bases(&server);
    let report = client().check_health(&base, Some("   ")).await;

    // blank token => no Authorization header => the mock above does not match
    assert_eq!(authed.hits(), 0);
    assert!(!report.ok);
}

#[tokio::test]
async fn test_transport_failure_never_leaks_token() {
    let base = normalize("http://127.0.0.1:1").unwrap();
    let report = client().check_health(&base, Some("very-secret-token")).await;

    assert!(!report.ok);
    assert_eq!(report.http_code, None);
    assert!(!report.message.contains("very-secret-token"));
}

#[tokio::test]
async fn test_fetch_entity_by_tag() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/catalog/payments")
            .header("authorization", "Bearer tok");
        then.status(200).json_body(serde_json::json!({
            "id": "en123",
            "type": "service",
            "tag": "payments",
            "description": null,
            "metadata": [{"key": "tier", "value": 1}]
        }));
    });

    let (_, api_base) = bases(&server);
    let entity = client()
        .fetch_entity_by_tag(&api_base, Some("tok"), "payments")
        .await;

    mock.assert();
    assert_eq!(
        entity,
        Some(CatalogEntity {
            id: "en123".to_string(),
            entity_type: "service".to_string(),
        })
    );
}

#[tokio::test]
async fn test_fetch_entity_missing_field_is_none() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/catalog/no-type");
        then.status(200).json_body(serde_json::json!({"id": "en1"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/catalog/not-json");
        then.status(200).body("<html>maintenance</html>");
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/catalog/forbidden");
        then.status(403);
    });

    let (_, api_base) = bases(&server);
    let client = client();
    for tag in ["no-type", "not-json", "forbidden", "unknown"] {
        assert_eq!(client.fetch_entity_by_tag(&api_base, None, tag).await, None);
    }
}

#[tokio::test]
async fn test_fetch_team() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/teams/platform");
        then.status(200)
            .json_body(serde_json::json!({"id": "team-7", "name": "Platform"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/teams/blank");
        then.status(200).json_body(serde_json::json!({"id": "  "}));
    });

    let (_, api_base) = bases(&server);
    let client = client();
    assert_eq!(
        client.fetch_team(&api_base, Some("tok"), "platform").await,
        Some(TeamRef {
            id: "team-7".to_string()
        })
    );
    assert_eq!(client.fetch_team(&api_base, Some("tok"), "blank").await, None);
}

#[tokio::test]
async fn test_fetch_service_name() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/services/svc-42");
        then.status(200)
            .json_body(serde_json::json!({"id": "svc-42", "name": "Payments"}));
    });

    let (_, api_base) = bases(&server);
    let name = client().fetch_service_name(&api_base, None, "svc-42").await;
    assert_eq!(name.as_deref(), Some("Payments"));
}

#[tokio::test]
async fn test_request_timeout_is_a_miss() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/services/slow");
        then.status(200)
            .delay(Duration::from_millis(1500))
            .json_body(serde_json::json!({"name": "Slow"}));
    });

    let settings = HttpSettings {
        request_timeout: Duration::from_millis(200),
        ..HttpSettings::default()
    };
    let client = CatalogClient::new(&settings).unwrap();
    let (_, api_base) = bases(&server);

    assert_eq!(client.fetch_service_name(&api_base, None, "slow").await, None);
}
