//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::JobOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub orchestrator: Arc<JobOrchestrator>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, orchestrator: Arc<JobOrchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }
}
