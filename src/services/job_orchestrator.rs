//! Orquestador de jobs de optimización
//!
//! Dueño del ciclo de vida de OptimizationJob: creación en `pending`,
//! despacho al adaptador del solver en `running` y una única transición
//! terminal. Los fallos del solver se convierten aquí en registros `failed`
//! y no se propagan más allá.
//!
//! Los jobs son independientes entre sí; no hay bloqueo entre jobs.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::optimization_dto::{SolverResponse, SolverRoute};
use crate::dto::route_validation_dto::{CandidateRoute, CandidateStop, RouteDraft, StopDraft};
use crate::models::customer::DEFAULT_PALLET_DEMAND;
use crate::models::optimization_job::{
    JobError, JobOutcome, JobResult, RejectedRoute, RouteValidationReport,
};
use crate::models::{OptimizationJob, OptimizationSnapshot};
use crate::repositories::JobRepository;
use crate::services::constraint_validator::validate_route;
use crate::services::route_assembly::assemble_route;
use crate::services::solver_service::{
    build_solver_request, RoutingSolver, DEFAULT_FUEL_PRICE, SOLVER_TIMEOUT,
};
use crate::utils::errors::{not_found_error, AppError, AppResult};
use crate::utils::validation::validate_coordinates;

const ALGORITHM: &str = "ortools";
const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(10);

pub struct JobOrchestrator {
    repository: Arc<dyn JobRepository>,
    solver: Arc<dyn RoutingSolver>,
    solver_timeout: Duration,
    default_fuel_price: f64,
}

impl JobOrchestrator {
    pub fn new(repository: Arc<dyn JobRepository>, solver: Arc<dyn RoutingSolver>) -> Self {
        Self {
            repository,
            solver,
            solver_timeout: SOLVER_TIMEOUT,
            default_fuel_price: DEFAULT_FUEL_PRICE,
        }
    }

    pub fn with_solver_timeout(mut self, timeout: Duration) -> Self {
        self.solver_timeout = timeout;
        self
    }

    pub fn with_fuel_price(mut self, price: f64) -> Self {
        self.default_fuel_price = price;
        self
    }

    pub fn solver_timeout(&self) -> Duration {
        self.solver_timeout
    }

    pub fn default_fuel_price(&self) -> f64 {
        self.default_fuel_price
    }

    /// Validar el snapshot y crear el job en `pending`. No espera al solver.
    pub async fn submit(&self, snapshot: OptimizationSnapshot) -> AppResult<OptimizationJob> {
        let snapshot = prepare_snapshot(snapshot)?;

        let job = OptimizationJob::new(snapshot);
        self.repository.insert(&job).await?;

        info!(
            job_id = %job.id,
            depots = job.request.depots.len(),
            vehicles = job.request.vehicles.len(),
            customers = job.request.customers.len(),
            "📝 Job de optimización creado en pending"
        );
        Ok(job)
    }

    /// Pasar el job a `running`, invocar al solver bajo timeout y aplicar
    /// exactamente una transición terminal.
    pub async fn dispatch(&self, job_id: Uuid) -> AppResult<OptimizationJob> {
        let job = self.repository.mark_running(job_id, Utc::now()).await?;
        info!(job_id = %job_id, "🚀 Job en running, invocando solver");

        let outcome = self.run_solver(&job).await;
        match &outcome {
            JobOutcome::Completed(result) => info!(
                job_id = %job_id,
                routes = result.routes.len(),
                violations = result.violation_count(),
                "✅ Solver completado"
            ),
            JobOutcome::Failed(failure) => warn!(
                job_id = %job_id,
                kind = failure.kind.as_str(),
                "❌ Job fallido: {}",
                failure.message
            ),
        }

        let finished = self.repository.finish(job_id, outcome, Utc::now()).await?;
        info!(
            job_id = %job_id,
            status = %finished.status,
            processing_time_seconds = finished.processing_time_seconds.unwrap_or_default(),
            "🏁 Job finalizado"
        );
        Ok(finished)
    }

    /// Despachar en una tarea de tokio; el llamante consulta con `get_status`
    pub fn spawn_dispatch(self: &Arc<Self>, job_id: Uuid) -> JoinHandle<()> {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = orchestrator.dispatch(job_id).await {
                error!(job_id = %job_id, "❌ Error despachando job: {}", e);
            }
        })
    }

    /// Despachar en una tarea propia y esperar su resultado. Si el llamante
    /// se cancela, la tarea sigue hasta la transición terminal.
    pub async fn dispatch_detached(self: &Arc<Self>, job_id: Uuid) -> AppResult<OptimizationJob> {
        let orchestrator = Arc::clone(self);
        tokio::spawn(async move { orchestrator.dispatch(job_id).await })
            .await
            .map_err(|e| {
                AppError::Internal(format!("dispatch task for job '{}' aborted: {}", job_id, e))
            })?
    }

    /// Reconciliar jobs abandonados cada `grace`; el primer tick es inmediato.
    /// Un job atascado se cierra como mucho `solver_timeout + 2 * grace`
    /// después de arrancar.
    pub fn spawn_stale_job_sweeper(self: &Arc<Self>, grace: Duration) -> JoinHandle<()> {
        let orchestrator = Arc::clone(self);
        let period = grace.max(MIN_SWEEP_PERIOD);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                match orchestrator.fail_stale_jobs(grace).await {
                    Ok(0) => {}
                    Ok(closed) => warn!(closed, "🧹 Jobs abandonados marcados como failed"),
                    Err(e) => error!("❌ Error reconciliando jobs abandonados: {}", e),
                }
            }
        })
    }

    pub async fn get_status(&self, job_id: Uuid) -> AppResult<OptimizationJob> {
        self.repository
            .find_by_id(job_id)
            .await?
            .ok_or_else(|| not_found_error("Job", &job_id.to_string()))
    }

    /// Marcar como `failed` los jobs que siguen en `running` pasado el
    /// timeout del solver más `grace`. Devuelve cuántos se cerraron.
    pub async fn fail_stale_jobs(&self, grace: Duration) -> AppResult<usize> {
        let window = chrono::Duration::from_std(self.solver_timeout + grace)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let stale = self
            .repository
            .find_stale_running(Utc::now() - window)
            .await?;

        let mut closed = 0;
        for job_id in stale {
            let outcome = JobOutcome::Failed(JobError::solver_unavailable(
                "job exceeded the solver timeout without completing",
            ));
            match self.repository.finish(job_id, outcome, Utc::now()).await {
                Ok(_) => {
                    warn!(job_id = %job_id, "🧹 Job abandonado marcado como failed");
                    closed += 1;
                }
                Err(AppError::InvalidState(_)) => {
                    debug!(job_id = %job_id, "Job terminó antes de la reconciliación");
                }
                Err(e) => {
                    error!(job_id = %job_id, "❌ No se pudo cerrar el job abandonado: {}", e);
                }
            }
        }

        Ok(closed)
    }

    async fn run_solver(&self, job: &OptimizationJob) -> JobOutcome {
        let fuel_price = job
            .request
            .options
            .fuel_price_per_liter
            .unwrap_or(self.default_fuel_price);
        let request = build_solver_request(&job.request, fuel_price);

        match tokio::time::timeout(self.solver_timeout, self.solver.solve(&request)).await {
            Err(_) => JobOutcome::Failed(JobError::solver_unavailable(format!(
                "solver timed out after {:?}",
                self.solver_timeout
            ))),
            Ok(Err(e)) => JobOutcome::Failed(JobError::solver_unavailable(e.to_string())),
            Ok(Ok(response)) => JobOutcome::Completed(self.build_result(&job.request, response)),
        }
    }

    /// Adjuntar rutas y resumen tal cual, más los registros Route ensamblados
    /// y el informe de validación de cada ruta.
    fn build_result(&self, snapshot: &OptimizationSnapshot, response: SolverResponse) -> JobResult {
        let mut planned_routes = Vec::new();
        let mut validation = Vec::new();
        let mut rejected_routes = Vec::new();

        for (route_index, raw) in response.routes.iter().enumerate() {
            let solver_route: SolverRoute = match serde_json::from_value(raw.clone()) {
                Ok(route) => route,
                Err(e) => {
                    warn!("⚠️ Ruta {} del solver ilegible: {}", route_index, e);
                    rejected_routes.push(RejectedRoute {
                        route_index,
                        reason: format!("unreadable solver route: {}", e),
                    });
                    continue;
                }
            };

            let draft = match route_draft(snapshot, &solver_route) {
                Ok(draft) => draft,
                Err(reason) => {
                    warn!("⚠️ Ruta {} del solver rechazada: {}", route_index, reason);
                    rejected_routes.push(RejectedRoute {
                        route_index,
                        reason,
                    });
                    continue;
                }
            };

            let route = match assemble_route(&draft, snapshot) {
                Ok(route) => route,
                Err(e) => {
                    warn!("⚠️ Ruta {} rechazada en el ensamblado: {}", route_index, e);
                    rejected_routes.push(RejectedRoute {
                        route_index,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            // El ensamblado ya garantizó que vehículo y depósito existen
            if let (Some(vehicle), Some(depot)) =
                (snapshot.vehicle(route.vehicle_id), snapshot.depot(route.depot_id))
            {
                let candidate = CandidateRoute {
                    stops: solver_route
                        .stops
                        .iter()
                        .map(|stop| CandidateStop {
                            customer_id: stop.customer_id,
                            arrival_time: stop.arrival_time,
                            service_time: stop.service_time,
                        })
                        .collect(),
                    total_duration: solver_route.total_duration_min,
                };
                let validated = validate_route(&candidate, vehicle, depot, &snapshot.customers);
                validation.push(RouteValidationReport {
                    route_index,
                    route_id: route.id,
                    vehicle_id: route.vehicle_id,
                    is_valid: validated.is_valid,
                    violations: validated.violations,
                });
            }

            planned_routes.push(route);
        }

        JobResult {
            success: true,
            algorithm: ALGORITHM.to_string(),
            provider: self.solver.provider().to_string(),
            routes: response.routes,
            summary: response.summary,
            planned_routes,
            validation,
            rejected_routes,
        }
    }
}

/// Validación de entrada: depósito elegido existente, colecciones no vacías
/// tras acotar al depósito y coordenadas dentro de rango.
fn prepare_snapshot(snapshot: OptimizationSnapshot) -> AppResult<OptimizationSnapshot> {
    snapshot
        .validate()
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    if let Some(depot_id) = snapshot.options.depot_id {
        if snapshot.depot(depot_id).is_none() {
            return Err(AppError::InvalidRequest(format!(
                "selected depot '{}' is not part of the snapshot",
                depot_id
            )));
        }
    }

    let snapshot = snapshot.scoped_to_depot();
    snapshot
        .validate()
        .map_err(|e| AppError::InvalidRequest(format!("after depot scoping: {}", e)))?;

    let points = snapshot
        .depots
        .iter()
        .map(|d| (d.name.as_str(), d.lat, d.lng))
        .chain(snapshot.customers.iter().map(|c| (c.name.as_str(), c.lat, c.lng)));
    for (name, lat, lng) in points {
        validate_coordinates(lat, lng).map_err(|_| {
            AppError::InvalidRequest(format!("'{}' has invalid coordinates ({}, {})", name, lat, lng))
        })?;
    }

    Ok(snapshot)
}

/// Convertir una ruta del solver en borrador, acumulando distancia y carga
fn route_draft(snapshot: &OptimizationSnapshot, route: &SolverRoute) -> Result<RouteDraft, String> {
    let depot_id = route
        .depot_id
        .or_else(|| snapshot.vehicle(route.vehicle_id).map(|v| v.depot_id))
        .or_else(|| snapshot.depots.first().map(|d| d.id))
        .ok_or_else(|| format!("no depot resolvable for vehicle '{}'", route.vehicle_id))?;

    let mut cumulative_distance = 0.0;
    let mut cumulative_load: u32 = 0;
    let mut stops = Vec::with_capacity(route.stops.len());
    for (position, stop) in route.stops.iter().enumerate() {
        let demand = stop.demand.unwrap_or_else(|| {
            snapshot
                .customer(stop.customer_id)
                .map(|c| c.pallet_demand())
                .unwrap_or(DEFAULT_PALLET_DEMAND)
        });
        cumulative_distance += stop.distance_from_prev_km.unwrap_or(0.0);
        cumulative_load = cumulative_load
            .checked_add(demand)
            .ok_or_else(|| format!("cumulative load overflows at position {}", position))?;

        stops.push(StopDraft {
            customer_id: stop.customer_id,
            stop_order: None,
            distance_from_prev: stop.distance_from_prev_km,
            duration_from_prev: stop.duration_from_prev_min,
            cumulative_distance: Some(cumulative_distance),
            cumulative_load: Some(cumulative_load),
            arrival_time: stop.arrival_time,
        });
    }

    Ok(RouteDraft {
        id: None,
        vehicle_id: route.vehicle_id,
        depot_id,
        route_date: None,
        total_distance: route.distance_km,
        total_duration: route.total_duration_min,
        total_pallets: route.total_pallets.or(Some(cumulative_load)),
        total_cost: route.total_cost.or(route.fuel_cost),
        fuel_cost: route.fuel_cost,
        distance_cost: None,
        fixed_cost: None,
        stops,
    })
}
