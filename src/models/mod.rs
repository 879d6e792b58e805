//! Modelos del sistema
//!
//! Tipos de valor del dominio de reparto: depósitos, vehículos, clientes,
//! pedidos, rutas, jobs de optimización y violaciones de restricciones.

pub mod customer;
pub mod depot;
pub mod optimization_job;
pub mod order;
pub mod route;
pub mod snapshot;
pub mod vehicle;
pub mod violation;

pub use customer::Customer;
pub use depot::Depot;
pub use optimization_job::{JobOutcome, JobStatus, OptimizationJob};
pub use order::Order;
pub use route::{Route, RouteStop};
pub use snapshot::{OptimizationSnapshot, SnapshotOptions};
pub use vehicle::Vehicle;
pub use violation::{ConstraintViolation, Severity, ViolationType};
