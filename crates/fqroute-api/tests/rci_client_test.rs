#![allow(clippy::unwrap_used)]
// Integration tests for `RciClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fqroute_api::{CommandStatus, Error, RciClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RciClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/", server.uri())).unwrap();
    let client = RciClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn password() -> SecretString {
    "test-password".to_string().into()
}

async fn mount_version(server: &MockServer, release: &str) {
    Mock::given(method("GET"))
        .and(path("/rci/show/version"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "release": release,
            "model": "Router 5000",
            "arch": "mips"
        })))
        .mount(server)
        .await;
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_challenge_flow() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/auth"))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header("X-Device-Realm", "Router")
                .insert_header("X-Device-Challenge", "nonce-1"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    mount_version(&server, "5.1.2").await;

    client.login("admin", &password()).await.unwrap();
    assert_eq!(client.cached_firmware(), Some("5.1.2"));
}

#[tokio::test]
async fn test_login_existing_session() {
    let (server, client) = setup().await;

    // 200 on the probe means the session cookie is still valid.
    Mock::given(method("GET"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    mount_version(&server, "5.0.1").await;

    client.login("admin", &password()).await.unwrap();
    assert_eq!(client.cached_firmware(), Some("5.0.1"));
}

#[tokio::test]
async fn test_login_rejected() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/auth"))
        .respond_with(
            ResponseTemplate::new(401)
                .insert_header("X-Device-Realm", "Router")
                .insert_header("X-Device-Challenge", "nonce-1"),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.login("admin", &password()).await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert_eq!(client.cached_firmware(), None);
}

#[tokio::test]
async fn test_login_missing_challenge_header() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/auth"))
        .respond_with(ResponseTemplate::new(401).insert_header("X-Device-Realm", "Router"))
        .mount(&server)
        .await;

    let result = client.login("admin", &password()).await;
    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(
                message.contains("X-Device-Challenge"),
                "expected missing header name in message, got: {message}"
            );
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

// ── Device read tests ───────────────────────────────────────────────

#[tokio::test]
async fn test_show_object_groups() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rci/show/object-group/fqdn"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "name": "social", "include": ["facebook.com", "instagram.com"] },
            { "name": "empty-group" }
        ])))
        .mount(&server)
        .await;

    let groups = client.show_object_groups().await.unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].name, "social");
    assert_eq!(groups[0].include, vec!["facebook.com", "instagram.com"]);
    assert!(groups[1].include.is_empty());
}

#[tokio::test]
async fn test_show_dns_proxy_routes() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rci/show/dns-proxy/route"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "object-group": "social", "interface": "Wireguard0" }
        ])))
        .mount(&server)
        .await;

    let routes = client.show_dns_proxy_routes().await.unwrap();

    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].object_group, "social");
    assert_eq!(routes[0].interface, "Wireguard0");
}

// ── Batch execution tests ───────────────────────────────────────────

#[tokio::test]
async fn test_execute_batch_envelope() {
    let (server, client) = setup().await;

    let commands = vec![
        "object-group fqdn social".to_string(),
        "object-group fqdn social include facebook.com".to_string(),
        "system configuration save".to_string(),
    ];

    Mock::given(method("POST"))
        .and(path("/rci/parse"))
        .and(body_json(json!({ "commands": commands })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "status": "ok", "message": "" },
            { "status": "ok", "message": "" },
            { "status": "ok", "message": "saved" }
        ])))
        .mount(&server)
        .await;

    let outcomes = client.execute(&commands).await.unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(fqroute_api::CommandOutcome::is_ok));
    assert_eq!(outcomes[2].message, "saved");
}

#[tokio::test]
async fn test_execute_reports_per_command_errors() {
    let (server, client) = setup().await;

    let commands = vec![
        "object-group fqdn g include a.com".to_string(),
        "dns-proxy route object-group g Missing0 auto".to_string(),
    ];

    Mock::given(method("POST"))
        .and(path("/rci/parse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "status": "ok", "message": "" },
            { "status": "error", "message": "no such interface: Missing0" }
        ])))
        .mount(&server)
        .await;

    let outcomes = client.execute(&commands).await.unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].status, CommandStatus::Ok);
    assert_eq!(outcomes[1].status, CommandStatus::Error);
    assert!(outcomes[1].message.contains("Missing0"));
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_session_expired() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client.show_object_groups().await;
    assert!(
        matches!(result, Err(Error::SessionExpired)),
        "expected SessionExpired, got: {result:?}"
    );
}

#[tokio::test]
async fn test_device_error_passthrough() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rci/show/object-group/fqdn"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
        .mount(&server)
        .await;

    let result = client.show_object_groups().await;
    match result {
        Err(Error::Device { status, ref message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("internal error"));
        }
        other => panic!("expected Device error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_multibyte_error_body_truncates_on_char_boundary() {
    let (server, client) = setup().await;

    // 199 ASCII bytes followed by two-byte characters: a byte-indexed
    // preview cut at 200 would land mid-character.
    let body = format!("{}{}", "x".repeat(199), "é".repeat(8));
    Mock::given(method("GET"))
        .and(path("/rci/show/version"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let result = client.show_version().await;
    match result {
        Err(Error::Deserialization { ref message, .. }) => {
            assert!(message.contains("é"), "preview keeps whole characters: {message}");
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_deserialization_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/rci/show/version"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client.show_version().await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "expected Deserialization error, got: {result:?}"
    );
}
