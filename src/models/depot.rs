//! Modelo de Depot
//!
//! Un depósito es la instalación fija desde la que salen vehículos y pedidos.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Estado del depósito
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DepotStatus {
    #[default]
    Active,
    Inactive,
}

/// Coordenada geográfica (lat, lng)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Depot principal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Depot {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub city: Option<String>,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub status: DepotStatus,
}

impl Depot {
    pub fn location(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lng: self.lng,
        }
    }
}
