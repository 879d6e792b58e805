//! Modelo de OptimizationJob
//!
//! Ciclo de vida: `pending -> running -> {completed | failed}`.
//! El resultado existe si y solo si el estado es `completed`; el error si y
//! solo si es `failed`. La transición terminal se aplica una sola vez.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::Type;
use uuid::Uuid;

use super::route::Route;
use super::snapshot::OptimizationSnapshot;
use super::violation::ConstraintViolation;
use crate::utils::errors::{AppError, AppResult};

/// Estado del job - mapea al ENUM job_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clasificación del fallo de un job
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobErrorKind {
    SolverUnavailable,
    Internal,
}

impl JobErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            JobErrorKind::SolverUnavailable => "solver_unavailable",
            JobErrorKind::Internal => "internal",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "solver_unavailable" => JobErrorKind::SolverUnavailable,
            _ => JobErrorKind::Internal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobError {
    pub kind: JobErrorKind,
    pub message: String,
}

impl JobError {
    pub fn solver_unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: JobErrorKind::SolverUnavailable,
            message: message.into(),
        }
    }
}

/// Informe de validación de una ruta devuelta por el solver
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteValidationReport {
    pub route_index: usize,
    pub route_id: Uuid,
    pub vehicle_id: Uuid,
    pub is_valid: bool,
    pub violations: Vec<ConstraintViolation>,
}

/// Ruta del solver que no pudo convertirse en registro Route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRoute {
    pub route_index: usize,
    pub reason: String,
}

/// Resultado adjunto a un job completado
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    pub success: bool,
    pub algorithm: String,
    pub provider: String,
    /// Rutas del solver, sin modificar
    pub routes: Vec<Value>,
    /// Resumen del solver, sin modificar
    pub summary: Value,
    pub planned_routes: Vec<Route>,
    pub validation: Vec<RouteValidationReport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected_routes: Vec<RejectedRoute>,
}

impl JobResult {
    pub fn violation_count(&self) -> usize {
        self.validation.iter().map(|r| r.violations.len()).sum()
    }
}

/// Desenlace terminal de un dispatch
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Completed(JobResult),
    Failed(JobError),
}

impl JobOutcome {
    pub fn status(&self) -> JobStatus {
        match self {
            JobOutcome::Completed(_) => JobStatus::Completed,
            JobOutcome::Failed(_) => JobStatus::Failed,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptimizationJob {
    pub id: Uuid,
    pub request: OptimizationSnapshot,
    pub status: JobStatus,
    pub result: Option<JobResult>,
    pub error: Option<JobError>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub processing_time_seconds: Option<f64>,
}

impl OptimizationJob {
    pub fn new(request: OptimizationSnapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            status: JobStatus::Pending,
            result: None,
            error: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            processing_time_seconds: None,
        }
    }

    /// `pending -> running`
    pub fn start(&mut self, at: DateTime<Utc>) -> AppResult<()> {
        if self.status != JobStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "job '{}' is {} and cannot be dispatched",
                self.id, self.status
            )));
        }
        self.status = JobStatus::Running;
        self.started_at = Some(at);
        Ok(())
    }

    /// `running -> completed | failed`, escribiendo estado, resultado/error y
    /// marcas de tiempo en un único paso.
    pub fn finish(&mut self, outcome: JobOutcome, at: DateTime<Utc>) -> AppResult<()> {
        if self.status != JobStatus::Running {
            return Err(AppError::InvalidState(format!(
                "job '{}' is {} and cannot be finished",
                self.id, self.status
            )));
        }

        let processing = self.started_at.map(|started| processing_seconds(started, at));
        let (status, result, error) = match outcome {
            JobOutcome::Completed(result) => (JobStatus::Completed, Some(result), None),
            JobOutcome::Failed(error) => (JobStatus::Failed, None, Some(error)),
        };

        self.status = status;
        self.result = result;
        self.error = error;
        self.completed_at = Some(at);
        self.processing_time_seconds = processing;
        Ok(())
    }
}

/// Segundos transcurridos entre dos instantes, con precisión de milisegundos
pub fn processing_seconds(started: DateTime<Utc>, completed: DateTime<Utc>) -> f64 {
    (completed - started).num_milliseconds() as f64 / 1000.0
}
