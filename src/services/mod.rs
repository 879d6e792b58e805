//! Services module
//!
//! Este módulo contiene la lógica de negocio: validación de restricciones,
//! adaptador del solver, ensamblado de rutas y orquestación de jobs.

pub mod constraint_validator;
pub mod job_orchestrator;
pub mod route_assembly;
pub mod solver_service;

pub use job_orchestrator::JobOrchestrator;
pub use solver_service::{HttpSolverClient, RoutingSolver, SolverError};
