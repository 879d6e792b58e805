//! DTOs para validación y ensamblado de rutas
//!
//! Forma de las rutas candidatas (del solver o editadas a mano) y de los
//! borradores que se convierten en registros Route + RouteStop.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{ConstraintViolation, Customer, Depot, OptimizationSnapshot, Route, Vehicle};

/// Parada de una ruta candidata. Los tiempos van en minutos desde medianoche.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStop {
    pub customer_id: Uuid,
    #[serde(default)]
    pub arrival_time: Option<f64>,
    #[serde(default)]
    pub service_time: Option<f64>,
}

/// Ruta candidata a validar
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateRoute {
    pub stops: Vec<CandidateStop>,
    /// Duración total de la ruta en minutos
    #[serde(default)]
    pub total_duration: Option<f64>,
}

/// Request de `POST /api/routes/validate`
#[derive(Debug, Deserialize)]
pub struct ValidateRouteRequest {
    pub route: CandidateRoute,
    pub vehicle: Vehicle,
    pub depot: Depot,
    pub customers: Vec<Customer>,
}

/// Resultado de validar una ruta completa
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedRoute {
    pub is_valid: bool,
    pub violations: Vec<ConstraintViolation>,
    pub stops: Vec<CandidateStop>,
    pub vehicle: Vehicle,
    pub depot: Depot,
}

/// Parada en bruto antes del ensamblado; los numéricos ausentes valen cero
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StopDraft {
    pub customer_id: Uuid,
    #[serde(default)]
    pub stop_order: Option<u32>,
    #[serde(default)]
    pub distance_from_prev: Option<f64>,
    #[serde(default)]
    pub duration_from_prev: Option<f64>,
    #[serde(default)]
    pub cumulative_distance: Option<f64>,
    #[serde(default)]
    pub cumulative_load: Option<u32>,
    /// Minutos desde medianoche
    #[serde(default)]
    pub arrival_time: Option<f64>,
}

/// Ruta en bruto antes del ensamblado
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteDraft {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub vehicle_id: Uuid,
    pub depot_id: Uuid,
    #[serde(default)]
    pub route_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_distance: Option<f64>,
    #[serde(default)]
    pub total_duration: Option<f64>,
    #[serde(default)]
    pub total_pallets: Option<u32>,
    #[serde(default)]
    pub total_cost: Option<f64>,
    #[serde(default)]
    pub fuel_cost: Option<f64>,
    #[serde(default)]
    pub distance_cost: Option<f64>,
    #[serde(default)]
    pub fixed_cost: Option<f64>,
    pub stops: Vec<StopDraft>,
}

/// Request de `POST /api/routes/assemble`
#[derive(Debug, Deserialize)]
pub struct AssembleRoutesRequest {
    pub snapshot: OptimizationSnapshot,
    pub routes: Vec<RouteDraft>,
}

/// Response de `POST /api/routes/assemble`
#[derive(Debug, Serialize)]
pub struct AssembleRoutesResponse {
    pub count: usize,
    pub routes: Vec<Route>,
}
