// SPDX-License-Identifier: MIT

//! HTTP ingress for the review workflow
//!
//! One substantive route: submitting a completed case review starts a
//! workflow run and returns its terminal state. Everything else about the
//! surrounding product (authentication, uploads, case listings) lives in
//! other services.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::FlowError;
use crate::workflow::engine::ReviewWorkflow;
use crate::workflow::state::ReviewRequest;

#[derive(Clone)]
struct AppState {
    workflow: Arc<ReviewWorkflow>,
}

pub async fn serve(
    port: u16,
    workflow: Arc<ReviewWorkflow>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = router(workflow);

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    log::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(workflow: Arc<ReviewWorkflow>) -> Router {
    Router::new()
        .route("/api/health", get(health_check))
        .route("/api/cases/{case_id}/review", put(review_case))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { workflow })
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Deserialize)]
struct ReviewBody {
    decision: String,
    findings: String,
    doctor_role: String,
}

async fn review_case(
    State(state): State<AppState>,
    Path(case_id): Path<String>,
    Json(body): Json<ReviewBody>,
) -> (StatusCode, Json<Value>) {
    let request = ReviewRequest {
        case_id,
        decision: body.decision,
        findings: body.findings,
        doctor_role: body.doctor_role,
    };

    match state.workflow.run(&request).await {
        Ok(final_state) => (StatusCode::OK, Json(json!({ "final_state": final_state }))),
        Err(err) => {
            let status = match &err {
                FlowError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                FlowError::Collaborator { .. } => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(json!({
                    "error_kind": err.kind(),
                    "message": err.to_string(),
                })),
            )
        }
    }
}
