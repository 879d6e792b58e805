use crate::dto::route_validation_dto::{
    AssembleRoutesRequest, AssembleRoutesResponse, ValidateRouteRequest, ValidatedRoute,
};
use crate::services::constraint_validator::validate_route;
use crate::services::route_assembly::assemble_routes;
use crate::utils::errors::AppError;

pub struct RouteController;

impl RouteController {
    pub fn new() -> Self {
        Self
    }

    pub fn assemble(&self, request: AssembleRoutesRequest) -> Result<AssembleRoutesResponse, AppError> {
        let routes = assemble_routes(&request.routes, &request.snapshot)?;
        tracing::info!("🧩 {} rutas ensambladas", routes.len());

        Ok(AssembleRoutesResponse {
            count: routes.len(),
            routes,
        })
    }

    /// Las violaciones viajan en la respuesta; validar nunca falla
    pub fn validate(&self, request: ValidateRouteRequest) -> ValidatedRoute {
        let validated = validate_route(
            &request.route,
            &request.vehicle,
            &request.depot,
            &request.customers,
        );
        tracing::debug!(
            is_valid = validated.is_valid,
            violations = validated.violations.len(),
            "Ruta validada"
        );
        validated
    }
}

impl Default for RouteController {
    fn default() -> Self {
        Self::new()
    }
}
