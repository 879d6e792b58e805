//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.
//! Las violaciones de restricciones no son errores: viajan como datos.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Solver unavailable: {0}")]
    SolverUnavailable(String),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Código estable expuesto en las respuestas
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) => "INVALID_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::SolverUnavailable(_) => "SOLVER_UNAVAILABLE",
            AppError::InvalidRoute(_) => "INVALID_ROUTE",
            AppError::Database(_) => "DB_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, error, message, details) = match self {
            AppError::InvalidRequest(msg) => {
                tracing::warn!("Invalid request: {}", msg);
                (StatusCode::BAD_REQUEST, "Invalid Request", msg, None)
            }

            AppError::NotFound(msg) => {
                tracing::warn!("Resource not found: {}", msg);
                (StatusCode::NOT_FOUND, "Not Found", msg, None)
            }

            AppError::InvalidState(msg) => {
                tracing::warn!("Invalid state: {}", msg);
                (StatusCode::CONFLICT, "Invalid State", msg, None)
            }

            AppError::SolverUnavailable(msg) => {
                tracing::error!("Solver unavailable: {}", msg);
                (StatusCode::SERVICE_UNAVAILABLE, "Solver Unavailable", msg, None)
            }

            AppError::InvalidRoute(msg) => {
                tracing::warn!("Invalid route: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, "Invalid Route", msg, None)
            }

            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database Error",
                    "An error occurred while accessing the database".to_string(),
                    Some(json!({ "sql_error": e.to_string() })),
                )
            }

            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "An unexpected error occurred".to_string(),
                    Some(json!({ "internal_error": msg })),
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
            details,
            code,
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de ruta inconsistente
pub fn invalid_route_error(message: impl Into<String>) -> AppError {
    AppError::InvalidRoute(message.into())
}
