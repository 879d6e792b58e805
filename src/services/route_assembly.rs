//! Ensamblado de rutas
//!
//! Convierte paradas del solver o editadas a mano en registros Route +
//! RouteStop listos para persistir. `stop_order` pasa a ser la posición
//! 0-based; los numéricos ausentes valen cero y las paradas quedan `pending`.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::dto::route_validation_dto::RouteDraft;
use crate::models::route::{RouteStatus, StopStatus};
use crate::models::{OptimizationSnapshot, Route, RouteStop};
use crate::utils::errors::{invalid_route_error, AppResult};
use crate::utils::validation::{minutes_to_time, to_decimal};

/// Ensamblar una ruta; la fecha por defecto es hoy (UTC)
pub fn assemble_route(draft: &RouteDraft, snapshot: &OptimizationSnapshot) -> AppResult<Route> {
    assemble_route_on(draft, snapshot, Utc::now().date_naive())
}

pub fn assemble_route_on(
    draft: &RouteDraft,
    snapshot: &OptimizationSnapshot,
    default_date: NaiveDate,
) -> AppResult<Route> {
    if snapshot.vehicle(draft.vehicle_id).is_none() {
        return Err(invalid_route_error(format!(
            "route references unknown vehicle '{}'",
            draft.vehicle_id
        )));
    }
    if snapshot.depot(draft.depot_id).is_none() {
        return Err(invalid_route_error(format!(
            "route references unknown depot '{}'",
            draft.depot_id
        )));
    }

    let mut previous_order: Option<u32> = None;
    let mut previous_load = 0_u32;
    let route_id = draft.id.unwrap_or_else(Uuid::new_v4);
    let mut stops = Vec::with_capacity(draft.stops.len());

    for (position, stop) in draft.stops.iter().enumerate() {
        if snapshot.customer(stop.customer_id).is_none() {
            return Err(invalid_route_error(format!(
                "stop {} references unknown customer '{}'",
                position, stop.customer_id
            )));
        }

        if let Some(order) = stop.stop_order {
            if previous_order.is_some_and(|previous| order <= previous) {
                return Err(invalid_route_error(format!(
                    "stop_order {} at position {} is not strictly increasing",
                    order, position
                )));
            }
            previous_order = Some(order);
        }

        let cumulative_load = stop.cumulative_load.unwrap_or(0);
        if cumulative_load < previous_load {
            return Err(invalid_route_error(format!(
                "cumulative load decreases at position {} ({} < {})",
                position, cumulative_load, previous_load
            )));
        }
        previous_load = cumulative_load;

        stops.push(RouteStop {
            route_id,
            customer_id: stop.customer_id,
            stop_order: position as u32,
            distance_from_prev_km: stop.distance_from_prev.unwrap_or(0.0),
            duration_from_prev_min: stop.duration_from_prev.unwrap_or(0.0),
            cumulative_distance_km: stop.cumulative_distance.unwrap_or(0.0),
            cumulative_load_pallets: cumulative_load,
            arrival_time: stop.arrival_time.and_then(minutes_to_time),
            status: StopStatus::Pending,
        });
    }

    Ok(Route {
        id: route_id,
        vehicle_id: draft.vehicle_id,
        depot_id: draft.depot_id,
        route_date: draft.route_date.unwrap_or(default_date),
        status: RouteStatus::Planned,
        total_distance_km: draft.total_distance.unwrap_or(0.0),
        total_duration_min: draft.total_duration.unwrap_or(0.0),
        total_pallets: draft.total_pallets.unwrap_or(0),
        total_cost: to_decimal(draft.total_cost.unwrap_or(0.0)),
        fuel_cost: to_decimal(draft.fuel_cost.unwrap_or(0.0)),
        distance_cost: to_decimal(draft.distance_cost.unwrap_or(0.0)),
        fixed_cost: to_decimal(draft.fixed_cost.unwrap_or(0.0)),
        stops,
    })
}

/// Ensamblar un lote; el primer borrador inválido aborta el lote
pub fn assemble_routes(
    drafts: &[RouteDraft],
    snapshot: &OptimizationSnapshot,
) -> AppResult<Vec<Route>> {
    drafts
        .iter()
        .map(|draft| assemble_route(draft, snapshot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::route_validation_dto::StopDraft;
    use crate::models::depot::DepotStatus;
    use crate::models::vehicle::VehicleStatus;
    use crate::models::{Customer, Depot, Vehicle};
    use crate::utils::errors::AppError;
    use chrono::NaiveTime;
    use rust_decimal::Decimal;

    fn snapshot() -> OptimizationSnapshot {
        let depot = Depot {
            id: Uuid::new_v4(),
            name: "Izmir".to_string(),
            city: Some("Izmir".to_string()),
            lat: 38.4,
            lng: 27.1,
            status: DepotStatus::Active,
        };
        let vehicle = Vehicle {
            id: Uuid::new_v4(),
            plate: "35 IZ 35".to_string(),
            depot_id: depot.id,
            capacity_pallets: Some(12),
            capacity_kg: None,
            capacity_m3: None,
            fuel_consumption: None,
            vehicle_type: "dry".to_string(),
            driver_max_work_hours: None,
            status: VehicleStatus::Available,
        };
        let customers = (0..3)
            .map(|i| Customer {
                id: Uuid::new_v4(),
                name: format!("Customer {i}"),
                lat: 38.4,
                lng: 27.1,
                depot_id: Some(depot.id),
                demand_pallets: Some(2),
                demand_kg: None,
                demand_m3: None,
                time_window_start: None,
                time_window_end: None,
                service_duration: None,
                required_vehicle_types: vec![],
                business_type: None,
                status: Default::default(),
            })
            .collect();

        OptimizationSnapshot {
            depots: vec![depot],
            vehicles: vec![vehicle],
            customers,
            orders: vec![],
            options: Default::default(),
        }
    }

    fn draft(snapshot: &OptimizationSnapshot, orders: &[Option<u32>]) -> RouteDraft {
        RouteDraft {
            id: None,
            vehicle_id: snapshot.vehicles[0].id,
            depot_id: snapshot.depots[0].id,
            route_date: None,
            total_distance: Some(42.5),
            total_duration: None,
            total_pallets: Some(6),
            total_cost: Some(310.75),
            fuel_cost: None,
            distance_cost: None,
            fixed_cost: None,
            stops: orders
                .iter()
                .enumerate()
                .map(|(i, order)| StopDraft {
                    customer_id: snapshot.customers[i].id,
                    stop_order: *order,
                    cumulative_load: Some(2 * (i as u32 + 1)),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn test_assigns_positions_and_defaults() {
        let snapshot = snapshot();
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let mut d = draft(&snapshot, &[Some(3), Some(7), Some(9)]);
        d.stops[1].arrival_time = Some(555.0);

        let route = assemble_route_on(&d, &snapshot, date).unwrap();

        let orders: Vec<_> = route.stops.iter().map(|s| s.stop_order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
        assert_eq!(route.route_date, date);
        assert_eq!(route.status, RouteStatus::Planned);
        assert_eq!(route.total_duration_min, 0.0);
        assert_eq!(route.total_cost, Decimal::new(31075, 2));
        assert_eq!(route.fuel_cost, Decimal::ZERO);
        assert!(route.stops.iter().all(|s| s.status == StopStatus::Pending));
        assert!(route.stops.iter().all(|s| s.route_id == route.id));
        assert_eq!(route.stops[0].distance_from_prev_km, 0.0);
        assert_eq!(route.stops[1].arrival_time, NaiveTime::from_hms_opt(9, 15, 0));
        assert_eq!(route.stops.last().unwrap().cumulative_load_pallets, 6);
    }

    #[test]
    fn test_missing_stop_orders_are_positional() {
        let snapshot = snapshot();
        let route = assemble_route(&draft(&snapshot, &[None, None, None]), &snapshot).unwrap();
        assert_eq!(route.stops.len(), 3);
        assert_eq!(route.stops[2].stop_order, 2);
    }

    #[test]
    fn test_duplicate_stop_order_rejected() {
        let snapshot = snapshot();
        let err = assemble_route(&draft(&snapshot, &[Some(0), Some(1), Some(1)]), &snapshot)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRoute(_)));
    }

    #[test]
    fn test_decreasing_stop_order_rejected() {
        let snapshot = snapshot();
        let err = assemble_route(&draft(&snapshot, &[Some(2), Some(1), Some(3)]), &snapshot)
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidRoute(_)));
    }

    #[test]
    fn test_unknown_vehicle_rejected() {
        let snapshot = snapshot();
        let mut d = draft(&snapshot, &[None]);
        d.vehicle_id = Uuid::new_v4();
        assert!(matches!(
            assemble_route(&d, &snapshot),
            Err(AppError::InvalidRoute(_))
        ));
    }

    #[test]
    fn test_unknown_depot_rejected() {
        let snapshot = snapshot();
        let mut d = draft(&snapshot, &[None]);
        d.depot_id = Uuid::new_v4();
        assert!(matches!(
            assemble_route(&d, &snapshot),
            Err(AppError::InvalidRoute(_))
        ));
    }

    #[test]
    fn test_decreasing_cumulative_load_rejected() {
        let snapshot = snapshot();
        let mut d = draft(&snapshot, &[None, None]);
        d.stops[1].cumulative_load = Some(1);
        assert!(matches!(
            assemble_route(&d, &snapshot),
            Err(AppError::InvalidRoute(_))
        ));
    }

    #[test]
    fn test_batch_fails_on_first_invalid_draft() {
        let snapshot = snapshot();
        let good = draft(&snapshot, &[None]);
        let mut bad = draft(&snapshot, &[None]);
        bad.depot_id = Uuid::new_v4();

        assert_eq!(assemble_routes(&[good.clone()], &snapshot).unwrap().len(), 1);
        assert!(assemble_routes(&[good, bad], &snapshot).is_err());
    }
}
