pub mod config;
pub mod dto;
pub mod error;
pub mod validate;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::Mutex;
use tracing::info;

use jit_core::timebase;
use jit_core::{solve_jit, SolverSession};

use crate::dto::{JitRequest, JitResponse, ScheduleData, SolveMeta};
use crate::error::ApiError;

/// Shared service state: the one solver session, behind the mutex that
/// serializes every solve. A second request waits its turn here instead of
/// getting a fresh engine.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<SolverSession>>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/problems/jit", post(run_jit))
        .with_state(state)
}

async fn run_jit(
    State(state): State<AppState>,
    payload: Result<Json<JitRequest>, JsonRejection>,
) -> Result<Json<JitResponse>, ApiError> {
    let Json(request) = payload?;

    // Semantic validation happens before the gate: a rejected request never
    // touches the shared engine.
    let problem = validate::validate(&request).map_err(ApiError::SemanticViolation)?;

    // Critical section: reset through extraction. Everything after the
    // guard drops needs no engine state.
    let solution = {
        let mut session = state.session.lock().await;
        solve_jit(&mut session, &problem)?
    };

    info!(
        batches = request.n_batches,
        total_fee = solution.total_fee,
        "jit schedule computed"
    );

    let start_datetime = solution
        .start_datetimes
        .iter()
        .map(timebase::format_datetime)
        .collect();
    Ok(Json(JitResponse {
        data: ScheduleData {
            total_fee: solution.total_fee,
            start_datetime,
            delta_time: solution.delta_minutes,
        },
        meta: SolveMeta {
            iterations: solution.iterations,
            computation_duration: solution.elapsed.as_secs_f64(),
        },
    }))
}
