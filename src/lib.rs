//! Fleet routing backend
//!
//! Validación de restricciones de rutas, ensamblado de registros Route y
//! orquestación de jobs de optimización contra un solver externo.

pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_app_router;
pub use state::AppState;
