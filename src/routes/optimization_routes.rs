use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::optimization_controller::OptimizationController;
use crate::dto::optimization_dto::{JobStatusResponse, SubmitJobResponse};
use crate::models::OptimizationSnapshot;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_optimization_router() -> Router<AppState> {
    Router::new()
        .route("/", post(optimize))
        .route("/jobs", post(submit_job))
        .route("/jobs/:id", get(get_job_status))
        .route("/jobs/:id/dispatch", post(dispatch_job))
}

async fn optimize(
    State(state): State<AppState>,
    Json(snapshot): Json<OptimizationSnapshot>,
) -> Result<Json<JobStatusResponse>, AppError> {
    let controller = OptimizationController::new(state.orchestrator.clone());
    let response = controller.optimize(snapshot).await?;
    Ok(Json(response))
}

async fn submit_job(
    State(state): State<AppState>,
    Json(snapshot): Json<OptimizationSnapshot>,
) -> Result<(StatusCode, Json<SubmitJobResponse>), AppError> {
    let controller = OptimizationController::new(state.orchestrator.clone());
    let response = controller.submit_job(snapshot).await?;
    Ok((StatusCode::ACCEPTED, Json(response)))
}

async fn get_job_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobStatusResponse>, AppError> {
    let controller = OptimizationController::new(state.orchestrator.clone());
    let response = controller.job_status(id).await?;
    Ok(Json(response))
}

async fn dispatch_job(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobStatusResponse>, AppError> {
    let controller = OptimizationController::new(state.orchestrator.clone());
    let response = controller.dispatch_job(id).await?;
    Ok(Json(response))
}
