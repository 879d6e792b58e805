//! Modelo de Route
//!
//! Rutas planificadas y sus paradas, tal como se entregan a la capa de persistencia.
//! Las paradas van ordenadas por `stop_order` (0-based, estrictamente creciente).

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Estado de la ruta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RouteStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
}

/// Estado de la parada
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StopStatus {
    #[default]
    Pending,
    Arrived,
    Completed,
    Skipped,
}

/// Route principal con totales agregados
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Route {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub depot_id: Uuid,
    pub route_date: NaiveDate,
    pub status: RouteStatus,
    pub total_distance_km: f64,
    pub total_duration_min: f64,
    pub total_pallets: u32,
    pub total_cost: Decimal,
    pub fuel_cost: Decimal,
    pub distance_cost: Decimal,
    pub fixed_cost: Decimal,
    pub stops: Vec<RouteStop>,
}

/// Parada individual dentro de una ruta
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteStop {
    pub route_id: Uuid,
    pub customer_id: Uuid,
    pub stop_order: u32,
    pub distance_from_prev_km: f64,
    pub duration_from_prev_min: f64,
    pub cumulative_distance_km: f64,
    pub cumulative_load_pallets: u32,
    pub arrival_time: Option<NaiveTime>,
    pub status: StopStatus,
}
