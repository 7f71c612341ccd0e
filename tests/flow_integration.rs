//! Integration tests for the flow REST surface.
//!
//! Each test spins up an Axum server on a random port and exercises the
//! real HTTP contract with reqwest.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::time::timeout;
use uuid::Uuid;

use enroll::collaborators::{AccountCreator, LoggingCodeDispatcher};
use enroll::config::FlowConfig;
use enroll::error::AccountError;
use enroll::flow::{FlowRouteState, StepController, flow_routes};
use enroll::form::FormState;

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Creator that always refuses, for exercising the banner path.
struct RefusingCreator;

#[async_trait]
impl AccountCreator for RefusingCreator {
    async fn create_account(&self, _flow_id: Uuid, _form: &FormState) -> Result<(), AccountError> {
        Err(AccountError::Unavailable {
            reason: "account service is down".to_string(),
        })
    }
}

/// Creator that always succeeds.
struct OkCreator;

#[async_trait]
impl AccountCreator for OkCreator {
    async fn create_account(&self, _flow_id: Uuid, _form: &FormState) -> Result<(), AccountError> {
        Ok(())
    }
}

/// Start an Axum server on a random port, return its port.
async fn start_server(cooldown_secs: u64, creator: Arc<dyn AccountCreator>) -> u16 {
    let config = FlowConfig {
        cooldown_secs,
        verify_delay_ms: 0,
        ..FlowConfig::default()
    };
    let controller = StepController::new(&config, creator, Arc::new(LoggingCodeDispatcher));
    let app = flow_routes(FlowRouteState { controller });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    port
}

async fn get_status(client: &reqwest::Client, port: u16) -> Value {
    client
        .get(format!("http://127.0.0.1:{port}/api/flow/status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post_field(client: &reqwest::Client, port: u16, field: &str, value: &str) {
    let resp = client
        .post(format!("http://127.0.0.1:{port}/api/flow/field"))
        .json(&json!({ "field": field, "value": value }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
}

/// Drive the flow through the role and account steps up to verification.
async fn reach_verification(client: &reqwest::Client, port: u16) {
    post_field(client, port, "role", "investor").await;
    let resp = client
        .post(format!("http://127.0.0.1:{port}/api/flow/advance"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    for (field, value) in [
        ("first_name", "Grace"),
        ("last_name", "Hopper"),
        ("email", "grace@example.com"),
        ("password", "Harvard1!"),
        ("confirm_password", "Harvard1!"),
        ("phone", "555-0100"),
        ("company_name", "Eckert-Mauchly"),
    ] {
        post_field(client, port, field, value).await;
    }

    let resp = client
        .post(format!("http://127.0.0.1:{port}/api/flow/advance"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn health_endpoint_responds() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(60, Arc::new(OkCreator)).await;

        let resp = reqwest::get(format!("http://127.0.0.1:{port}/health"))
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json["status"], "ok");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn status_starts_at_the_role_step() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(60, Arc::new(OkCreator)).await;
        let client = reqwest::Client::new();

        let status = get_status(&client, port).await;
        assert_eq!(status["step"], "role");
        assert_eq!(status["verification"]["phase"], "idle");
        assert_eq!(status["strength"]["label"], "Weak");
        assert!(status["errors"].as_object().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn advance_without_role_returns_field_errors() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(60, Arc::new(OkCreator)).await;
        let client = reqwest::Client::new();

        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/flow/advance"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 422);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["step"], "role");
        assert!(body["errors"]["role"].is_string());

        // Editing the field clears its error.
        post_field(&client, port, "role", "investor").await;
        let status = get_status(&client, port).await;
        assert!(status["errors"].as_object().unwrap().is_empty());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn full_flow_completes_via_rest() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(60, Arc::new(OkCreator)).await;
        let client = reqwest::Client::new();

        reach_verification(&client, port).await;

        let status = get_status(&client, port).await;
        assert_eq!(status["step"], "verification");
        assert_eq!(status["verification"]["phase"], "sent");
        assert_eq!(status["verification"]["sent"], true);
        assert_eq!(status["verification"]["cooldown_remaining"], 60);

        // Short code is rejected inline.
        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/flow/verify"))
            .json(&json!({ "code": "123" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 422);
        let body: Value = resp.json().await.unwrap();
        assert!(body["verification"]["error"].is_string());
        assert_eq!(body["step"], "verification");

        // The bypass token completes the flow.
        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/flow/verify"))
            .json(&json!({ "code": "skip" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["step"], "complete");
        assert!(body["completed_at"].is_string());
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn code_input_is_digit_filtered_and_capped() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(60, Arc::new(OkCreator)).await;
        let client = reqwest::Client::new();

        reach_verification(&client, port).await;

        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/flow/code"))
            .json(&json!({ "code": "12ab34567" }))
            .send()
            .await
            .unwrap();
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["verification"]["code_input"], "123456");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn resend_conflicts_while_cooling_down() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(60, Arc::new(OkCreator)).await;
        let client = reqwest::Client::new();

        reach_verification(&client, port).await;

        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/flow/resend"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 409);
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn resend_succeeds_after_the_cooldown_elapses() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(1, Arc::new(OkCreator)).await;
        let client = reqwest::Client::new();

        reach_verification(&client, port).await;

        // One second of cooldown plus scheduling slack.
        tokio::time::sleep(Duration::from_millis(2500)).await;
        let status = get_status(&client, port).await;
        assert_eq!(status["verification"]["cooldown_remaining"], 0);

        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/flow/resend"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["verification"]["code_input"], "");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn account_failure_returns_bad_gateway_with_banner() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(60, Arc::new(RefusingCreator)).await;
        let client = reqwest::Client::new();

        reach_verification(&client, port).await;

        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/flow/verify"))
            .json(&json!({ "code": "123456" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 502);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["step"], "verification");
        assert!(body["general_error"].is_string());
        assert_eq!(body["verification"]["phase"], "sent");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn password_edits_recompute_strength() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(60, Arc::new(OkCreator)).await;
        let client = reqwest::Client::new();

        post_field(&client, port, "password", "abc").await;
        let status = get_status(&client, port).await;
        assert_eq!(status["strength"]["label"], "Weak");

        post_field(&client, port, "password", "Correct1Horse!").await;
        let status = get_status(&client, port).await;
        assert_eq!(status["strength"]["score"], 5);
        assert_eq!(status["strength"]["label"], "Strong");
        assert_eq!(status["strength"]["color_class"], "strength-strong");
    })
    .await
    .expect("test timed out");
}

#[tokio::test]
async fn abandon_tears_the_flow_down() {
    timeout(TEST_TIMEOUT, async {
        let port = start_server(60, Arc::new(OkCreator)).await;
        let client = reqwest::Client::new();

        reach_verification(&client, port).await;

        let resp = client
            .post(format!("http://127.0.0.1:{port}/api/flow/abandon"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["status"], "abandoned");
    })
    .await
    .expect("test timed out");
}
