pub mod optimization_controller;
pub mod route_controller;
