//! Modelo de Customer
//!
//! Demanda multidimensional, ventana horaria opcional y tipos de vehículo exigidos.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::validation::parse_time_of_day;

/// Demanda en palets asumida cuando el cliente no la define
pub const DEFAULT_PALLET_DEMAND: u32 = 1;

/// Duración de servicio (minutos) cuando el cliente no la define
pub const DEFAULT_SERVICE_MINUTES: f64 = 15.0;

/// Estado del cliente
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    #[default]
    Pending,
    Assigned,
    Completed,
}

/// Customer principal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub depot_id: Option<Uuid>,
    #[serde(default)]
    pub demand_pallets: Option<u32>,
    #[serde(default)]
    pub demand_kg: Option<f64>,
    #[serde(default)]
    pub demand_m3: Option<f64>,
    /// Inicio de la ventana horaria, "HH:MM"
    #[serde(default)]
    pub time_window_start: Option<String>,
    /// Fin de la ventana horaria, "HH:MM"
    #[serde(default)]
    pub time_window_end: Option<String>,
    /// Minutos de servicio en destino
    #[serde(default)]
    pub service_duration: Option<f64>,
    #[serde(default)]
    pub required_vehicle_types: Vec<String>,
    #[serde(default)]
    pub business_type: Option<String>,
    #[serde(default)]
    pub status: CustomerStatus,
}

impl Customer {
    pub fn pallet_demand(&self) -> u32 {
        self.demand_pallets.unwrap_or(DEFAULT_PALLET_DEMAND)
    }

    pub fn service_minutes(&self) -> f64 {
        self.service_duration.unwrap_or(DEFAULT_SERVICE_MINUTES)
    }

    /// Ventana horaria en minutos del día, solo si ambos extremos existen y son válidos
    pub fn time_window_minutes(&self) -> Option<(u32, u32)> {
        let start = parse_time_of_day(self.time_window_start.as_deref()?)?;
        let end = parse_time_of_day(self.time_window_end.as_deref()?)?;
        Some((start, end))
    }

    pub fn has_time_window(&self) -> bool {
        self.time_window_start.is_some() && self.time_window_end.is_some()
    }
}
