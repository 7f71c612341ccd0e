//! REST endpoints driving the onboarding flow.
//!
//! Observers read snapshots and invoke actions; they never mutate state
//! directly.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::form::model::Field;

use super::controller::{StepController, VerifyOutcome};

/// Shared state for flow routes.
#[derive(Clone)]
pub struct FlowRouteState {
    pub controller: Arc<StepController>,
}

#[derive(Debug, Deserialize)]
struct FieldRequest {
    field: Field,
    value: String,
}

#[derive(Debug, Deserialize)]
struct CodeRequest {
    code: String,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/flow/status
///
/// Returns the full workflow snapshot: step, form, errors, password
/// strength, and verification state.
async fn get_status(State(state): State<FlowRouteState>) -> impl IntoResponse {
    Json(state.controller.snapshot().await)
}

/// POST /api/flow/field — apply a single field edit.
async fn update_field(
    State(state): State<FlowRouteState>,
    Json(body): Json<FieldRequest>,
) -> impl IntoResponse {
    state.controller.update_field(body.field, &body.value).await;
    Json(state.controller.snapshot().await)
}

/// POST /api/flow/advance — attempt to leave the current step.
///
/// 422 with the snapshot (errors included) when validation blocks.
async fn advance(State(state): State<FlowRouteState>) -> impl IntoResponse {
    let result = state.controller.advance().await;
    let snapshot = state.controller.snapshot().await;
    match result {
        Ok(_) => (StatusCode::OK, Json(snapshot)),
        Err(_) => (StatusCode::UNPROCESSABLE_ENTITY, Json(snapshot)),
    }
}

/// POST /api/flow/code — record code-input edits.
async fn set_code(
    State(state): State<FlowRouteState>,
    Json(body): Json<CodeRequest>,
) -> impl IntoResponse {
    state.controller.set_code_input(&body.code).await;
    Json(state.controller.snapshot().await)
}

/// POST /api/flow/resend — request a fresh code once the cooldown elapsed.
///
/// 409 while the cooldown is still running.
async fn resend(State(state): State<FlowRouteState>) -> impl IntoResponse {
    let sent = state.controller.resend().await;
    let snapshot = state.controller.snapshot().await;
    let status = if sent {
        StatusCode::OK
    } else {
        StatusCode::CONFLICT
    };
    (status, Json(snapshot))
}

/// POST /api/flow/verify — submit a verification code.
///
/// 409 when the action is not invokable, 422 on rejection, 502 when the
/// account collaborator failed.
async fn verify(
    State(state): State<FlowRouteState>,
    Json(body): Json<CodeRequest>,
) -> impl IntoResponse {
    let outcome = state.controller.verify(&body.code).await;
    let snapshot = state.controller.snapshot().await;
    let status = match outcome {
        Some(VerifyOutcome::Completed) => StatusCode::OK,
        Some(VerifyOutcome::Rejected) => StatusCode::UNPROCESSABLE_ENTITY,
        Some(VerifyOutcome::AccountFailed) => StatusCode::BAD_GATEWAY,
        None => StatusCode::CONFLICT,
    };
    (status, Json(snapshot))
}

/// POST /api/flow/abandon — tear the workflow down, cancelling the timer.
async fn abandon(State(state): State<FlowRouteState>) -> impl IntoResponse {
    state.controller.abandon().await;
    Json(serde_json::json!({ "status": "abandoned" }))
}

/// Build the Axum router for the onboarding flow.
pub fn flow_routes(state: FlowRouteState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/flow/status", get(get_status))
        .route("/api/flow/field", post(update_field))
        .route("/api/flow/advance", post(advance))
        .route("/api/flow/code", post(set_code))
        .route("/api/flow/resend", post(resend))
        .route("/api/flow/verify", post(verify))
        .route("/api/flow/abandon", post(abandon))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
