//! Liveness and readiness probe.

use axum::Json;
use axum::extract::State;

use crate::dto::{HealthDependencyStatus, HealthResponse};
use crate::state::AppState;

pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let postgres = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => HealthDependencyStatus {
            status: "ok",
            detail: None,
        },
        Err(error) => HealthDependencyStatus {
            status: "error",
            detail: Some(error.to_string()),
        },
    };

    let ready = postgres.status == "ok";

    Json(HealthResponse {
        status: if ready { "ok" } else { "degraded" },
        ready,
        postgres,
    })
}
