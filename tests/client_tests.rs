//! Integration tests for the Test Intelligence client.
//!
//! These tests run the full client against a wiremock stub server and
//! verify endpoint construction, header signing, validation short-circuits,
//! and response decoding.

use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ti_client::types::{SelectTestsReq, SelectionType};
use ti_client::{Error, TiClient, TiConfig, UploadPayload};

/// Creates a fully-populated config pointing at the stub server.
fn test_config(endpoint: &str) -> TiConfig {
    TiConfig::builder()
        .endpoint(endpoint)
        .token("test-token")
        .account_id("acct")
        .org_id("org")
        .project_id("proj")
        .pipeline_id("pipe")
        .build_id("42")
        .stage_id("unit")
        .repo("github.com/org/repo")
        .sha("abc123")
        .commit_link("https://github.com/org/repo/commit/abc123")
        .build()
}

fn ctx() -> CancellationToken {
    CancellationToken::new()
}

// ============================================================================
// Construction
// ============================================================================

#[tokio::test]
async fn test_trailing_slash_is_stripped_from_endpoint() {
    let client = TiClient::new(test_config("https://svc.example.com/"));
    assert_eq!(client.config().endpoint(), "https://svc.example.com");
}

// ============================================================================
// Healthz
// ============================================================================

#[tokio::test]
async fn test_healthz_succeeds_on_200() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .and(header("x-harness-token", "test-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = TiClient::new(test_config(&format!("{}/", server.uri())));
    tokio_test::assert_ok!(client.healthz(&ctx()).await);
}

#[tokio::test]
async fn test_healthz_fails_on_503() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = TiClient::new(test_config(&server.uri()));
    let err = tokio_test::assert_err!(client.healthz(&ctx()).await);
    assert_eq!(err.status(), Some(503));
}

// ============================================================================
// Validation short-circuits before the network
// ============================================================================

#[tokio::test]
async fn test_validation_failure_makes_no_network_call() {
    let server = MockServer::start().await;

    let config = TiConfig::builder()
        .endpoint(server.uri())
        .token("test-token")
        // account id intentionally missing
        .org_id("org")
        .project_id("proj")
        .pipeline_id("pipe")
        .build_id("42")
        .stage_id("unit")
        .build();
    let client = TiClient::new(config);

    let err = client.write(&ctx(), "step1", "junit", &[]).await.unwrap_err();
    assert_eq!(err.to_string(), "accountID is not set");
    assert!(matches!(err, Error::Validation(_)));

    assert!(server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Operations end to end
// ============================================================================

#[tokio::test]
async fn test_select_tests_decodes_selection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tests/select"))
        .and(query_param("accountId", "acct"))
        .and(query_param("source", "feature"))
        .and(query_param("target", "main"))
        .and(header("x-harness-token", "test-token"))
        .and(header("x-request-id", "abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_tests": 10,
            "selected_tests": 1,
            "tests": [
                {"pkg": "io.harness", "class": "FooTest", "method": "testFoo",
                 "selection": "source_code"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = TiClient::new(test_config(&server.uri()));
    let resp = client
        .select_tests(&ctx(), "step1", "feature", "main", &SelectTestsReq::default(), false)
        .await
        .unwrap();

    assert_eq!(resp.total_tests, 10);
    assert_eq!(resp.selected_tests, 1);
    assert_eq!(resp.tests.len(), 1);
    assert_eq!(resp.tests[0].class, "FooTest");
    assert_eq!(resp.tests[0].selection, SelectionType::SourceCode);
}

#[tokio::test]
async fn test_write_accepts_no_content_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/reports/write"))
        .and(query_param("report", "junit"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = TiClient::new(test_config(&server.uri()));
    client.write(&ctx(), "step1", "junit", &[]).await.unwrap();
}

#[tokio::test]
async fn test_upload_cg_v2_sends_raw_json_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/uploadcg"))
        .and(body_string(r#"{"tests":[],"chains":[]}"#))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = TiClient::new(test_config(&server.uri()));
    let payload = UploadPayload::RawJsonText(r#"{"tests":[],"chains":[]}"#.to_string());
    client.upload_cg_v2(&ctx(), &payload).await.unwrap();
}

#[tokio::test]
async fn test_client_error_carries_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vcs/commitinfo"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "branch not found"})),
        )
        .mount(&server)
        .await;

    let client = TiClient::new(test_config(&server.uri()));
    let err = client.commit_info(&ctx(), "step1", "main").await.unwrap_err();
    match err {
        Error::Domain(e) => {
            assert_eq!(e.code, 404);
            assert_eq!(e.message, "branch not found");
        }
        other => panic!("expected domain error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_download_agent_returns_live_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifacts/agent.jar"))
        .and(header("x-harness-token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jar-bytes".to_vec()))
        .mount(&server)
        .await;

    let client = TiClient::new(test_config(&server.uri()));
    let response = client
        .download_agent(&ctx(), &format!("{}/artifacts/agent.jar", server.uri()))
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"jar-bytes");
}

#[tokio::test]
async fn test_download_agent_passes_non_2xx_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/artifacts/missing.jar"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = TiClient::new(test_config(&server.uri()));
    let response = client
        .download_agent(&ctx(), &format!("{}/artifacts/missing.jar", server.uri()))
        .await
        .unwrap();

    // The caller owns status handling for the raw stream.
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_calls_share_one_client() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200))
        .expect(4)
        .mount(&server)
        .await;

    let client = std::sync::Arc::new(TiClient::new(test_config(&server.uri())));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let client = std::sync::Arc::clone(&client);
            tokio::spawn(async move { client.healthz(&CancellationToken::new()).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
}
