//! Adaptador del motor de ruteo externo
//!
//! Traduce el snapshot de dominio al esquema de cable del solver, lo invoca
//! con un timeout duro y clasifica cualquier fallo como `SolverUnavailable`.
//! No reintenta y no valida restricciones: eso pertenece al orquestador.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use crate::dto::optimization_dto::*;
use crate::models::{Customer, Depot, OptimizationSnapshot, Vehicle};
use crate::utils::errors::AppError;

/// Timeout fijo de una resolución
pub const SOLVER_TIMEOUT: Duration = Duration::from_secs(60);

/// Precio de combustible por litro usado por el modelo de costes del solver
pub const DEFAULT_FUEL_PRICE: f64 = 47.5;

pub const DEFAULT_SOLVER_DEMAND_PALLETS: u32 = 1;
pub const DEFAULT_BUSINESS_TYPE: &str = "restaurant";
pub const DEFAULT_SOLVER_SERVICE_MINUTES: f64 = 30.0;
pub const DEFAULT_SOLVER_CAPACITY_PALLETS: u32 = 12;
pub const DEFAULT_FUEL_CONSUMPTION: f64 = 25.0;
/// Clase de vehículo del solver (camión de 14 palets)
pub const DEFAULT_SOLVER_VEHICLE_TYPE: u8 = 2;

/// Fallos del adaptador; todos se clasifican como solver no disponible
#[derive(Error, Debug)]
pub enum SolverError {
    #[error("solver endpoint is not configured")]
    NotConfigured,

    #[error("solver timed out after {0:?}")]
    Timeout(Duration),

    #[error("solver transport error: {0}")]
    Transport(String),

    #[error("solver returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("solver response could not be decoded: {0}")]
    Decode(String),
}

impl From<SolverError> for AppError {
    fn from(error: SolverError) -> Self {
        AppError::SolverUnavailable(error.to_string())
    }
}

fn map_depot(depot: &Depot) -> SolverDepot {
    SolverDepot {
        id: depot.id,
        name: depot.name.clone(),
        location: SolverLocation {
            lat: depot.lat,
            lng: depot.lng,
        },
    }
}

fn map_customer(customer: &Customer) -> SolverCustomer {
    SolverCustomer {
        id: customer.id,
        name: customer.name.clone(),
        location: SolverLocation {
            lat: customer.lat,
            lng: customer.lng,
        },
        demand_pallets: customer
            .demand_pallets
            .unwrap_or(DEFAULT_SOLVER_DEMAND_PALLETS),
        business_type: customer
            .business_type
            .clone()
            .unwrap_or_else(|| DEFAULT_BUSINESS_TYPE.to_string()),
        service_duration: customer
            .service_duration
            .unwrap_or(DEFAULT_SOLVER_SERVICE_MINUTES),
        has_time_constraint: customer.has_time_window(),
        constraint_start_time: customer.time_window_start.clone(),
        constraint_end_time: customer.time_window_end.clone(),
        required_vehicle_types: (!customer.required_vehicle_types.is_empty())
            .then(|| customer.required_vehicle_types.clone()),
    }
}

fn map_vehicle(vehicle: &Vehicle) -> SolverVehicle {
    SolverVehicle {
        id: vehicle.id,
        vehicle_type: DEFAULT_SOLVER_VEHICLE_TYPE,
        capacity_pallets: vehicle
            .capacity_pallets
            .unwrap_or(DEFAULT_SOLVER_CAPACITY_PALLETS),
        fuel_consumption: vehicle.fuel_consumption.unwrap_or(DEFAULT_FUEL_CONSUMPTION),
        plate: if vehicle.plate.trim().is_empty() {
            vehicle.id.to_string()
        } else {
            vehicle.plate.clone()
        },
    }
}

/// Construir el request del solver a partir del snapshot
pub fn build_solver_request(snapshot: &OptimizationSnapshot, fuel_price: f64) -> SolverRequest {
    SolverRequest {
        depots: snapshot.depots.iter().map(map_depot).collect(),
        customers: snapshot.customers.iter().map(map_customer).collect(),
        vehicles: snapshot.vehicles.iter().map(map_vehicle).collect(),
        fuel_price,
    }
}

/// Motor de ruteo invocable por el orquestador
#[async_trait]
pub trait RoutingSolver: Send + Sync {
    async fn solve(&self, request: &SolverRequest) -> Result<SolverResponse, SolverError>;

    /// Nombre del proveedor que se adjunta al resultado
    fn provider(&self) -> &str {
        "external"
    }
}

/// Cliente HTTP del motor de ruteo externo
pub struct HttpSolverClient {
    base_url: Option<String>,
    timeout: Duration,
    client: Client,
}

impl HttpSolverClient {
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, SolverError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SolverError::Transport(e.to_string()))?;

        Ok(Self {
            base_url,
            timeout,
            client,
        })
    }

    fn endpoint(&self) -> Result<String, SolverError> {
        let base = self.base_url.as_deref().ok_or(SolverError::NotConfigured)?;
        Ok(format!("{}/optimize", base.trim_end_matches('/')))
    }
}

#[async_trait]
impl RoutingSolver for HttpSolverClient {
    async fn solve(&self, request: &SolverRequest) -> Result<SolverResponse, SolverError> {
        let url = self.endpoint()?;

        log::info!(
            "📤 Enviando problema al solver: {} depósitos, {} vehículos, {} clientes",
            request.depots.len(),
            request.vehicles.len(),
            request.customers.len()
        );

        let response = self
            .client
            .post(&url)
            .header("User-Agent", "FleetRouting/1.0")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SolverError::Timeout(self.timeout)
                } else {
                    SolverError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        log::info!("📡 Solver response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SolverError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                SolverError::Timeout(self.timeout)
            } else {
                SolverError::Transport(e.to_string())
            }
        })?;
        log::debug!("📄 Solver response body: {}", body);

        let solution: SolverResponse =
            serde_json::from_str(&body).map_err(|e| SolverError::Decode(e.to_string()))?;

        log::info!("🎯 Solución obtenida con {} rutas", solution.routes.len());
        Ok(solution)
    }

    fn provider(&self) -> &str {
        "ortools-http"
    }
}
