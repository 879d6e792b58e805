//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Todas las variables
//! tienen un valor por defecto salvo las URLs externas, que son opcionales.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::services::solver_service::{DEFAULT_FUEL_PRICE, SOLVER_TIMEOUT};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub log_level: tracing::Level,
    pub cors_origins: Vec<String>,
    pub solver_api_url: Option<String>,
    pub solver_timeout: Duration,
    pub fuel_price_per_liter: f64,
    pub database_url: Option<String>,
    pub stale_job_grace: Duration,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: tracing::Level::INFO,
            cors_origins: Vec::new(),
            solver_api_url: None,
            solver_timeout: SOLVER_TIMEOUT,
            fuel_price_per_liter: DEFAULT_FUEL_PRICE,
            database_url: None,
            stale_job_grace: Duration::from_secs(30),
        }
    }
}

/// Leer una variable opcional y parsearla, con valor por defecto
fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a valid value, got '{}'", key, value)),
        _ => Ok(default),
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let log_level = match optional_var("LOG_LEVEL") {
            Some(level) => tracing::Level::from_str(&level)
                .map_err(|_| anyhow::anyhow!("LOG_LEVEL must be a tracing level, got '{}'", level))?,
            None => defaults.log_level,
        };

        Ok(Self {
            environment: optional_var("ENVIRONMENT").unwrap_or(defaults.environment),
            host: optional_var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            log_level,
            cors_origins: optional_var("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            solver_api_url: optional_var("SOLVER_API_URL"),
            solver_timeout: Duration::from_secs(parse_var(
                "SOLVER_TIMEOUT_SECS",
                defaults.solver_timeout.as_secs(),
            )?),
            fuel_price_per_liter: parse_var("FUEL_PRICE_PER_LITER", defaults.fuel_price_per_liter)?,
            database_url: optional_var("DATABASE_URL"),
            stale_job_grace: Duration::from_secs(parse_var(
                "STALE_JOB_GRACE_SECS",
                defaults.stale_job_grace.as_secs(),
            )?),
        })
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
