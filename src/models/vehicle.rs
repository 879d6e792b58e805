//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle tal como llega en el snapshot de dominio.
//! Las capacidades ausentes significan "sin límite en esa dimensión".

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Horas máximas de trabajo del conductor cuando el vehículo no las define
pub const DEFAULT_DRIVER_MAX_WORK_HOURS: f64 = 11.0;

/// Capacidad en palets asumida cuando el vehículo no la define
pub const DEFAULT_PALLET_CAPACITY: u32 = 12;

/// Estado del vehículo
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    #[default]
    Available,
    InRoute,
    Maintenance,
}

/// Vehicle principal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: String,
    pub depot_id: Uuid,
    #[serde(default)]
    pub capacity_pallets: Option<u32>,
    #[serde(default)]
    pub capacity_kg: Option<f64>,
    #[serde(default)]
    pub capacity_m3: Option<f64>,
    /// Consumo en litros cada 100 km
    #[serde(default)]
    pub fuel_consumption: Option<f64>,
    pub vehicle_type: String,
    #[serde(default)]
    pub driver_max_work_hours: Option<f64>,
    #[serde(default)]
    pub status: VehicleStatus,
}

impl Vehicle {
    /// Capacidad efectiva en palets (12 si no está definida)
    pub fn pallet_capacity(&self) -> u32 {
        self.capacity_pallets.unwrap_or(DEFAULT_PALLET_CAPACITY)
    }

    /// Límite de jornada del conductor expresado en minutos
    pub fn max_work_minutes(&self) -> f64 {
        self.driver_max_work_hours
            .unwrap_or(DEFAULT_DRIVER_MAX_WORK_HOURS)
            * 60.0
    }
}
