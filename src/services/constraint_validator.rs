//! Validador de restricciones de ruta
//!
//! Funciones puras que evalúan una ruta candidata contra el vehículo asignado,
//! su depósito y el conjunto de clientes. Sin I/O y sin estado compartido.
//! El único estado que se arrastra es el reloj de ventanas horarias, porque
//! cada llegada depende del fin del servicio anterior.
//!
//! Una parada que referencia un cliente desconocido se omite; nunca aborta
//! la validación del resto de la ruta.

use std::collections::HashMap;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::dto::route_validation_dto::{CandidateRoute, CandidateStop, ValidatedRoute};
use crate::models::customer::DEFAULT_SERVICE_MINUTES;
use crate::models::{ConstraintViolation, Customer, Depot, Vehicle, ViolationType};
use crate::utils::validation::format_minutes;

fn index_customers(customers: &[Customer]) -> HashMap<Uuid, &Customer> {
    customers.iter().map(|c| (c.id, c)).collect()
}

/// Recorre las paradas en orden con un reloj que empieza en 0.
/// Llegada antes de la ventana: warning. Llegada después: error.
pub fn validate_time_windows(
    stops: &[CandidateStop],
    customers: &[Customer],
) -> Vec<ConstraintViolation> {
    let customers = index_customers(customers);
    let mut violations = Vec::new();
    let mut clock = 0.0_f64;

    for (index, stop) in stops.iter().enumerate() {
        let Some(customer) = customers.get(&stop.customer_id) else {
            debug!("Parada {} sin cliente conocido ({}), se omite", index, stop.customer_id);
            continue;
        };

        let window = customer.time_window_minutes();
        if window.is_none() && customer.has_time_window() {
            warn!(
                "⚠️ Ventana horaria ilegible para {}: {:?}-{:?}",
                customer.name, customer.time_window_start, customer.time_window_end
            );
        }

        match window {
            Some((start, end)) => {
                let (start, end) = (f64::from(start), f64::from(end));
                let arrival = stop.arrival_time.unwrap_or(clock);
                let window_label = format!(
                    "{}-{}",
                    customer.time_window_start.as_deref().unwrap_or_default(),
                    customer.time_window_end.as_deref().unwrap_or_default()
                );

                if arrival < start {
                    violations.push(
                        ConstraintViolation::warning(
                            ViolationType::TimeWindow,
                            format!(
                                "Early arrival at {} ({}). Window: {}",
                                customer.name,
                                format_minutes(arrival),
                                window_label
                            ),
                        )
                        .at_stop(index),
                    );
                } else if arrival > end {
                    violations.push(
                        ConstraintViolation::error(
                            ViolationType::TimeWindow,
                            format!(
                                "Late arrival at {} ({}). Window: {}",
                                customer.name,
                                format_minutes(arrival),
                                window_label
                            ),
                        )
                        .at_stop(index),
                    );
                }

                clock = arrival.max(start) + customer.service_minutes();
            }
            None => {
                clock += stop.service_time.unwrap_or(DEFAULT_SERVICE_MINUTES);
            }
        }
    }

    violations
}

/// Suma la demanda de la ruta en peso, volumen y palets y la compara con la
/// capacidad del vehículo. `demanda == capacidad` no es violación.
pub fn validate_capacity(
    stops: &[CandidateStop],
    vehicle: &Vehicle,
    customers: &[Customer],
) -> Vec<ConstraintViolation> {
    let customers = index_customers(customers);
    let mut violations = Vec::new();

    let mut total_weight = 0.0_f64;
    let mut total_volume = 0.0_f64;
    let mut total_pallets = 0_u64;

    for customer in stops.iter().filter_map(|s| customers.get(&s.customer_id)) {
        total_weight += customer.demand_kg.unwrap_or(0.0);
        total_volume += customer.demand_m3.unwrap_or(0.0);
        total_pallets += u64::from(customer.pallet_demand());
    }

    if let Some(capacity) = vehicle.capacity_kg {
        if total_weight > capacity {
            violations.push(ConstraintViolation::error(
                ViolationType::CapacityWeight,
                format!("Weight capacity exceeded: {}kg / {}kg", total_weight, capacity),
            ));
        }
    }

    if let Some(capacity) = vehicle.capacity_m3 {
        if total_volume > capacity {
            violations.push(ConstraintViolation::error(
                ViolationType::CapacityVolume,
                format!("Volume capacity exceeded: {}m³ / {}m³", total_volume, capacity),
            ));
        }
    }

    let pallet_capacity = vehicle.pallet_capacity();
    if total_pallets > u64::from(pallet_capacity) {
        violations.push(ConstraintViolation::error(
            ViolationType::CapacityPallet,
            format!("Pallet capacity exceeded: {} / {}", total_pallets, pallet_capacity),
        ));
    }

    violations
}

/// Duración total (minutos) contra la jornada máxima del conductor
pub fn validate_work_hours(total_duration: f64, vehicle: &Vehicle) -> Vec<ConstraintViolation> {
    let max_minutes = vehicle.max_work_minutes();
    if total_duration <= max_minutes {
        return Vec::new();
    }

    vec![ConstraintViolation::error(
        ViolationType::WorkHours,
        format!(
            "Driver work hours exceeded: {}h / {}h",
            (total_duration / 60.0).round(),
            max_minutes / 60.0
        ),
    )]
}

/// Cada cliente con tipos de vehículo exigidos debe recibir uno de ellos
pub fn validate_vehicle_type(
    stops: &[CandidateStop],
    vehicle: &Vehicle,
    customers: &[Customer],
) -> Vec<ConstraintViolation> {
    let customers = index_customers(customers);

    stops
        .iter()
        .enumerate()
        .filter_map(|(index, stop)| {
            let customer = customers.get(&stop.customer_id)?;
            let required = &customer.required_vehicle_types;
            if required.is_empty() || required.contains(&vehicle.vehicle_type) {
                return None;
            }
            Some(
                ConstraintViolation::error(
                    ViolationType::VehicleType,
                    format!(
                        "Vehicle type not eligible for {}. Required: {}, Current: {}",
                        customer.name,
                        required.join(", "),
                        vehicle.vehicle_type
                    ),
                )
                .at_stop(index),
            )
        })
        .collect()
}

/// Ejecuta las cuatro comprobaciones. La ruta es válida si ninguna violación
/// tiene severidad `error`; los warnings no la invalidan.
pub fn validate_route(
    route: &CandidateRoute,
    vehicle: &Vehicle,
    depot: &Depot,
    customers: &[Customer],
) -> ValidatedRoute {
    let mut violations = validate_time_windows(&route.stops, customers);
    violations.extend(validate_capacity(&route.stops, vehicle, customers));
    violations.extend(validate_work_hours(
        route.total_duration.unwrap_or(0.0),
        vehicle,
    ));
    violations.extend(validate_vehicle_type(&route.stops, vehicle, customers));

    let is_valid = !violations.iter().any(ConstraintViolation::is_error);

    ValidatedRoute {
        is_valid,
        violations,
        stops: route.stops.clone(),
        vehicle: vehicle.clone(),
        depot: depot.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::depot::DepotStatus;
    use crate::models::vehicle::VehicleStatus;
    use crate::models::Severity;

    fn depot() -> Depot {
        Depot {
            id: Uuid::new_v4(),
            name: "Istanbul Depot".to_string(),
            city: Some("Istanbul".to_string()),
            lat: 41.0,
            lng: 29.0,
            status: DepotStatus::Active,
        }
    }

    fn vehicle(vehicle_type: &str) -> Vehicle {
        Vehicle {
            id: Uuid::new_v4(),
            plate: "34 TR 001".to_string(),
            depot_id: Uuid::new_v4(),
            capacity_pallets: Some(12),
            capacity_kg: None,
            capacity_m3: None,
            fuel_consumption: Some(25.0),
            vehicle_type: vehicle_type.to_string(),
            driver_max_work_hours: None,
            status: VehicleStatus::Available,
        }
    }

    fn customer(name: &str) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            name: name.to_string(),
            lat: 41.01,
            lng: 29.01,
            depot_id: None,
            demand_pallets: Some(1),
            demand_kg: None,
            demand_m3: None,
            time_window_start: None,
            time_window_end: None,
            service_duration: None,
            required_vehicle_types: vec![],
            business_type: None,
            status: Default::default(),
        }
    }

    fn windowed(name: &str, start: &str, end: &str) -> Customer {
        Customer {
            time_window_start: Some(start.to_string()),
            time_window_end: Some(end.to_string()),
            ..customer(name)
        }
    }

    fn stop(customer: &Customer, arrival: Option<f64>) -> CandidateStop {
        CandidateStop {
            customer_id: customer.id,
            arrival_time: arrival,
            service_time: None,
        }
    }

    #[test]
    fn test_late_arrival_is_error_with_stop_index() {
        let c = windowed("Cafe", "09:00", "10:00");
        let violations = validate_time_windows(&[stop(&c, Some(630.0))], &[c.clone()]);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::TimeWindow);
        assert_eq!(violations[0].severity, Severity::Error);
        assert_eq!(violations[0].stop_index, Some(0));
        assert!(violations[0].message.contains("10:30"));
    }

    #[test]
    fn test_early_arrival_is_warning() {
        let c = windowed("Cafe", "09:00", "10:00");
        let violations = validate_time_windows(&[stop(&c, Some(510.0))], &[c.clone()]);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert!(violations[0].message.contains("8:30"));
    }

    #[test]
    fn test_arrival_inside_window_is_clean() {
        let c = windowed("Cafe", "09:00", "10:00");
        assert!(validate_time_windows(&[stop(&c, Some(600.0))], &[c]).is_empty());
    }

    #[test]
    fn test_clock_advances_through_service() {
        // Primera parada sin ventana: el reloj avanza 15 minutos por defecto.
        // Segunda parada sin llegada explícita: llega a las 0:15, antes de 00:30.
        let first = customer("First");
        let second = windowed("Second", "00:30", "01:00");
        let violations = validate_time_windows(
            &[stop(&first, None), stop(&second, None)],
            &[first.clone(), second.clone()],
        );

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(violations[0].stop_index, Some(1));
    }

    #[test]
    fn test_clock_waits_for_window_start_before_service() {
        // Llega a 00:10, espera hasta 00:30, sirve 20 min -> 00:50.
        // La siguiente ventana cierra 00:45 -> llegada tardía.
        let first = Customer {
            service_duration: Some(20.0),
            ..windowed("First", "00:30", "02:00")
        };
        let second = windowed("Second", "00:00", "00:45");
        let violations = validate_time_windows(
            &[stop(&first, Some(10.0)), stop(&second, None)],
            &[first.clone(), second.clone()],
        );

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].severity, Severity::Warning);
        assert_eq!(violations[1].severity, Severity::Error);
        assert_eq!(violations[1].stop_index, Some(1));
    }

    #[test]
    fn test_unknown_customer_is_skipped() {
        let known = windowed("Known", "09:00", "10:00");
        let ghost = customer("Ghost");
        let violations = validate_time_windows(
            &[stop(&ghost, Some(0.0)), stop(&known, Some(700.0))],
            &[known.clone()],
        );

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].stop_index, Some(1));
    }

    #[test]
    fn test_pallet_overflow_cites_totals() {
        let c = Customer {
            demand_pallets: Some(13),
            ..customer("Big")
        };
        let violations = validate_capacity(&[stop(&c, None)], &vehicle("dry"), &[c.clone()]);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::CapacityPallet);
        assert!(violations[0].message.contains("13 / 12"));
    }

    #[test]
    fn test_huge_pallet_demands_do_not_overflow() {
        let customers: Vec<Customer> = (0..2)
            .map(|i| Customer {
                demand_pallets: Some(u32::MAX),
                ..customer(&format!("Huge{i}"))
            })
            .collect();
        let stops: Vec<_> = customers.iter().map(|c| stop(c, None)).collect();
        let violations = validate_capacity(&stops, &vehicle("dry"), &customers);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::CapacityPallet);
        assert_eq!(
            violations[0].message,
            format!("Pallet capacity exceeded: {} / 12", 2 * u64::from(u32::MAX))
        );
    }

    #[test]
    fn test_capacity_at_limit_passes() {
        let customers: Vec<Customer> = (0..4)
            .map(|i| Customer {
                demand_pallets: Some(3),
                demand_kg: Some(250.0),
                ..customer(&format!("C{i}"))
            })
            .collect();
        let stops: Vec<_> = customers.iter().map(|c| stop(c, None)).collect();
        let truck = Vehicle {
            capacity_kg: Some(1000.0),
            ..vehicle("dry")
        };

        assert!(validate_capacity(&stops, &truck, &customers).is_empty());
    }

    #[test]
    fn test_pallet_demand_defaults_to_one_and_capacity_to_twelve() {
        let customers: Vec<Customer> = (0..13)
            .map(|i| Customer {
                demand_pallets: None,
                ..customer(&format!("C{i}"))
            })
            .collect();
        let stops: Vec<_> = customers.iter().map(|c| stop(c, None)).collect();
        let truck = Vehicle {
            capacity_pallets: None,
            ..vehicle("dry")
        };

        let violations = validate_capacity(&stops, &truck, &customers);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("13 / 12"));
    }

    #[test]
    fn test_each_constrained_dimension_reports_once() {
        let c = Customer {
            demand_kg: Some(1500.0),
            demand_m3: Some(20.0),
            demand_pallets: Some(2),
            ..customer("Heavy")
        };
        let truck = Vehicle {
            capacity_kg: Some(1000.0),
            capacity_m3: Some(10.0),
            ..vehicle("dry")
        };

        let violations = validate_capacity(&[stop(&c, None)], &truck, &[c.clone()]);
        let kinds: Vec<_> = violations.iter().map(|v| v.violation_type).collect();
        assert_eq!(
            kinds,
            vec![ViolationType::CapacityWeight, ViolationType::CapacityVolume]
        );
    }

    #[test]
    fn test_unconstrained_dimensions_are_not_checked() {
        let c = Customer {
            demand_kg: Some(1_000_000.0),
            demand_m3: Some(5_000.0),
            ..customer("Huge")
        };
        assert!(validate_capacity(&[stop(&c, None)], &vehicle("dry"), &[c.clone()]).is_empty());
    }

    #[test]
    fn test_work_hours() {
        let truck = vehicle("dry");
        let violations = validate_work_hours(700.0, &truck);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::WorkHours);
        assert!(validate_work_hours(660.0, &truck).is_empty());

        let long_shift = Vehicle {
            driver_max_work_hours: Some(12.0),
            ..vehicle("dry")
        };
        assert!(validate_work_hours(700.0, &long_shift).is_empty());
    }

    #[test]
    fn test_vehicle_type_eligibility() {
        let c = Customer {
            required_vehicle_types: vec!["refrigerated".to_string()],
            ..customer("Frozen Foods")
        };
        let stops = [stop(&c, None)];

        let violations = validate_vehicle_type(&stops, &vehicle("dry"), &[c.clone()]);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].stop_index, Some(0));

        assert!(validate_vehicle_type(&stops, &vehicle("refrigerated"), &[c.clone()]).is_empty());
    }

    #[test]
    fn test_validate_route_warnings_do_not_invalidate() {
        let c = windowed("Cafe", "09:00", "10:00");
        let route = CandidateRoute {
            stops: vec![stop(&c, Some(480.0))],
            total_duration: Some(120.0),
        };

        let validated = validate_route(&route, &vehicle("dry"), &depot(), &[c.clone()]);
        assert!(validated.is_valid);
        assert_eq!(validated.violations.len(), 1);
        assert_eq!(validated.stops, route.stops);
    }

    #[test]
    fn test_validate_route_aggregates_all_checks() {
        let c = Customer {
            demand_pallets: Some(13),
            required_vehicle_types: vec!["refrigerated".to_string()],
            ..windowed("Cafe", "09:00", "10:00")
        };
        let route = CandidateRoute {
            stops: vec![stop(&c, Some(630.0))],
            total_duration: Some(700.0),
        };

        let validated = validate_route(&route, &vehicle("dry"), &depot(), &[c.clone()]);
        assert!(!validated.is_valid);
        let kinds: Vec<_> = validated.violations.iter().map(|v| v.violation_type).collect();
        assert_eq!(
            kinds,
            vec![
                ViolationType::TimeWindow,
                ViolationType::CapacityPallet,
                ViolationType::WorkHours,
                ViolationType::VehicleType,
            ]
        );
    }
}
