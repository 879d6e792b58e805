//! Data Transfer Objects
//!
//! Formas de entrada y salida de la API y del protocolo del solver.

pub mod optimization_dto;
pub mod route_validation_dto;
