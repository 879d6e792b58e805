//! Snapshot de dominio
//!
//! Depósitos, vehículos, clientes y pedidos enviados con cada solicitud de
//! optimización. El depósito seleccionado viaja como parámetro explícito en
//! `SnapshotOptions`, nunca como estado global.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::customer::Customer;
use super::depot::Depot;
use super::order::Order;
use super::vehicle::Vehicle;

/// Opciones de ajuste de la optimización
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SnapshotOptions {
    /// Precio del combustible por litro; si falta se usa el de configuración
    #[serde(default, alias = "fuelPricePerLiter")]
    pub fuel_price_per_liter: Option<f64>,
    /// Restringe el snapshot a un único depósito
    #[serde(default, alias = "depotId")]
    pub depot_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct OptimizationSnapshot {
    #[validate(length(min = 1, message = "at least one depot is required"))]
    pub depots: Vec<Depot>,
    #[validate(length(min = 1, message = "at least one vehicle is required"))]
    pub vehicles: Vec<Vehicle>,
    #[validate(length(min = 1, message = "at least one customer is required"))]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub options: SnapshotOptions,
}

impl OptimizationSnapshot {
    pub fn depot(&self, id: Uuid) -> Option<&Depot> {
        self.depots.iter().find(|d| d.id == id)
    }

    pub fn vehicle(&self, id: Uuid) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn customer(&self, id: Uuid) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    /// Aplica `options.depot_id`: conserva solo el depósito elegido, sus
    /// vehículos, sus clientes y los pedidos de esos clientes.
    pub fn scoped_to_depot(self) -> Self {
        let Some(depot_id) = self.options.depot_id else {
            return self;
        };

        let customers: Vec<Customer> = self
            .customers
            .into_iter()
            .filter(|c| c.depot_id == Some(depot_id))
            .collect();
        let orders = self
            .orders
            .into_iter()
            .filter(|o| customers.iter().any(|c| c.id == o.customer_id))
            .collect();

        Self {
            depots: self.depots.into_iter().filter(|d| d.id == depot_id).collect(),
            vehicles: self
                .vehicles
                .into_iter()
                .filter(|v| v.depot_id == depot_id)
                .collect(),
            customers,
            orders,
            options: self.options,
        }
    }
}
