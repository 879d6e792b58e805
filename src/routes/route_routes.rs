use axum::{routing::post, Json, Router};

use crate::controllers::route_controller::RouteController;
use crate::dto::route_validation_dto::{
    AssembleRoutesRequest, AssembleRoutesResponse, ValidateRouteRequest, ValidatedRoute,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/assemble", post(assemble_routes))
        .route("/validate", post(validate_route))
}

async fn assemble_routes(
    Json(request): Json<AssembleRoutesRequest>,
) -> Result<Json<AssembleRoutesResponse>, AppError> {
    let response = RouteController::new().assemble(request)?;
    Ok(Json(response))
}

async fn validate_route(Json(request): Json<ValidateRouteRequest>) -> Json<ValidatedRoute> {
    Json(RouteController::new().validate(request))
}
