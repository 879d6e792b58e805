//! DTOs para la optimización
//!
//! Este módulo define el esquema de cable del motor de ruteo externo y los
//! payloads de envío y consulta de jobs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::optimization_job::{JobErrorKind, JobResult, JobStatus, OptimizationJob};

/// Ubicación en el esquema del solver
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SolverLocation {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDepot {
    pub id: Uuid,
    pub name: String,
    pub location: SolverLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverCustomer {
    pub id: Uuid,
    pub name: String,
    pub location: SolverLocation,
    pub demand_pallets: u32,
    pub business_type: String,
    pub service_duration: f64,
    pub has_time_constraint: bool,
    pub constraint_start_time: Option<String>,
    pub constraint_end_time: Option<String>,
    pub required_vehicle_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverVehicle {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub vehicle_type: u8,
    pub capacity_pallets: u32,
    pub fuel_consumption: f64,
    pub plate: String,
}

/// Request enviado a `POST {SOLVER_API_URL}/optimize`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverRequest {
    pub depots: Vec<SolverDepot>,
    pub customers: Vec<SolverCustomer>,
    pub vehicles: Vec<SolverVehicle>,
    pub fuel_price: f64,
}

/// Response del solver; se consume de forma opaca
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SolverResponse {
    #[serde(default)]
    pub routes: Vec<Value>,
    #[serde(default)]
    pub summary: Value,
}

/// Parada tal como la devuelve el solver
#[derive(Debug, Clone, Deserialize)]
pub struct SolverStop {
    pub customer_id: Uuid,
    #[serde(default)]
    pub demand: Option<u32>,
    #[serde(default)]
    pub service_time: Option<f64>,
    #[serde(default)]
    pub arrival_time: Option<f64>,
    #[serde(default)]
    pub distance_from_prev_km: Option<f64>,
    #[serde(default)]
    pub duration_from_prev_min: Option<f64>,
}

/// Lectura tipada de una ruta del solver, usada para ensamblar y validar
#[derive(Debug, Clone, Deserialize)]
pub struct SolverRoute {
    pub vehicle_id: Uuid,
    #[serde(default)]
    pub depot_id: Option<Uuid>,
    #[serde(default)]
    pub stops: Vec<SolverStop>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default, alias = "duration_min")]
    pub total_duration_min: Option<f64>,
    #[serde(default)]
    pub total_pallets: Option<u32>,
    #[serde(default)]
    pub fuel_cost: Option<f64>,
    #[serde(default)]
    pub total_cost: Option<f64>,
}

/// Response de envío de job
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
}

impl From<&OptimizationJob> for SubmitJobResponse {
    fn from(job: &OptimizationJob) -> Self {
        Self {
            job_id: job.id,
            status: job.status,
            created_at: job.created_at,
        }
    }
}

/// Response de consulta de estado de job
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub result: Option<JobResult>,
    pub error: Option<String>,
    pub error_kind: Option<JobErrorKind>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub processing_time_seconds: Option<f64>,
}

impl From<OptimizationJob> for JobStatusResponse {
    fn from(job: OptimizationJob) -> Self {
        let (error, error_kind) = match job.error {
            Some(e) => (Some(e.message), Some(e.kind)),
            None => (None, None),
        };

        Self {
            job_id: job.id,
            status: job.status,
            result: job.result,
            error,
            error_kind,
            created_at: job.created_at,
            started_at: job.started_at,
            completed_at: job.completed_at,
            processing_time_seconds: job.processing_time_seconds,
        }
    }
}

/// Response de `GET /api/fuel-price`
#[derive(Debug, Serialize)]
pub struct FuelPriceResponse {
    pub price: f64,
}
