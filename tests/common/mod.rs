#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use fleet_routing::dto::optimization_dto::{SolverRequest, SolverResponse};
use fleet_routing::models::{JobOutcome, OptimizationJob, OptimizationSnapshot};
use fleet_routing::repositories::{InMemoryJobRepository, JobRepository};
use fleet_routing::services::{RoutingSolver, SolverError};
use fleet_routing::utils::errors::{AppError, AppResult};

pub struct Fleet {
    pub depot_id: Uuid,
    pub vehicle_id: Uuid,
    pub customer_id: Uuid,
    pub big_customer_id: Uuid,
}

impl Fleet {
    pub fn new() -> Self {
        Self {
            depot_id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            big_customer_id: Uuid::new_v4(),
        }
    }

    /// Un depósito, un camión de 12 palets, un cliente de 2 palets y otro de 13
    pub fn snapshot_json(&self) -> Value {
        json!({
            "depots": [{
                "id": self.depot_id,
                "name": "Istanbul Depot",
                "city": "Istanbul",
                "lat": 41.0,
                "lng": 29.0
            }],
            "vehicles": [{
                "id": self.vehicle_id,
                "plate": "34 ABC 123",
                "depot_id": self.depot_id,
                "capacity_pallets": 12,
                "vehicle_type": "truck"
            }],
            "customers": [
                {
                    "id": self.customer_id,
                    "name": "Kadikoy Market",
                    "lat": 40.99,
                    "lng": 29.03,
                    "depot_id": self.depot_id,
                    "demand_pallets": 2
                },
                {
                    "id": self.big_customer_id,
                    "name": "Besiktas Wholesale",
                    "lat": 41.04,
                    "lng": 29.0,
                    "depot_id": self.depot_id,
                    "demand_pallets": 13
                }
            ]
        })
    }

    pub fn snapshot(&self) -> OptimizationSnapshot {
        serde_json::from_value(self.snapshot_json()).unwrap()
    }

    /// Una ruta del solver que visita solo al cliente pequeño
    pub fn small_route(&self) -> Value {
        json!({
            "vehicle_id": self.vehicle_id,
            "depot_id": self.depot_id,
            "stops": [{
                "customer_id": self.customer_id,
                "demand": 2,
                "arrival_time": 540.0,
                "distance_from_prev_km": 4.5,
                "duration_from_prev_min": 12.0
            }],
            "distance_km": 9.0,
            "total_duration_min": 60.0,
            "fuel_cost": 106.88
        })
    }

    /// Una ruta del solver que carga 13 palets en un camión de 12
    pub fn overloaded_route(&self) -> Value {
        json!({
            "vehicle_id": self.vehicle_id,
            "stops": [{
                "customer_id": self.big_customer_id,
                "distance_from_prev_km": 6.0
            }],
            "distance_km": 12.0,
            "total_duration_min": 90.0
        })
    }
}

/// Solver que responde siempre lo mismo y guarda cada petición recibida
pub struct ScriptedSolver {
    response: SolverResponse,
    pub requests: Mutex<Vec<SolverRequest>>,
}

impl ScriptedSolver {
    pub fn new(routes: Vec<Value>) -> Self {
        Self {
            response: SolverResponse {
                routes,
                summary: json!({ "total_distance_km": 9.0, "total_routes": 1 }),
            },
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl RoutingSolver for ScriptedSolver {
    async fn solve(&self, request: &SolverRequest) -> Result<SolverResponse, SolverError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.response.clone())
    }

    fn provider(&self) -> &str {
        "scripted"
    }
}

/// Solver que tarda más que cualquier timeout de test
pub struct SlowSolver {
    pub delay: Duration,
}

#[async_trait]
impl RoutingSolver for SlowSolver {
    async fn solve(&self, _request: &SolverRequest) -> Result<SolverResponse, SolverError> {
        tokio::time::sleep(self.delay).await;
        Ok(SolverResponse::default())
    }
}

/// Solver que responde con error HTTP
pub struct FailingSolver;

#[async_trait]
impl RoutingSolver for FailingSolver {
    async fn solve(&self, _request: &SolverRequest) -> Result<SolverResponse, SolverError> {
        Err(SolverError::Status {
            status: 500,
            body: "solver crashed".to_string(),
        })
    }
}

/// Repositorio en memoria que anota los jobs creados y puede fallar las
/// primeras `n` escrituras terminales
#[derive(Default)]
pub struct FlakyRepository {
    inner: InMemoryJobRepository,
    inserted: Mutex<Vec<Uuid>>,
    failing_finishes: AtomicUsize,
}

impl FlakyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_finishes(count: usize) -> Self {
        Self {
            failing_finishes: AtomicUsize::new(count),
            ..Self::default()
        }
    }

    pub fn inserted(&self) -> Vec<Uuid> {
        self.inserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobRepository for FlakyRepository {
    async fn insert(&self, job: &OptimizationJob) -> AppResult<()> {
        self.inner.insert(job).await?;
        self.inserted.lock().unwrap().push(job.id);
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<OptimizationJob>> {
        self.inner.find_by_id(id).await
    }

    async fn mark_running(&self, id: Uuid, started_at: DateTime<Utc>) -> AppResult<OptimizationJob> {
        self.inner.mark_running(id, started_at).await
    }

    async fn finish(
        &self,
        id: Uuid,
        outcome: JobOutcome,
        completed_at: DateTime<Utc>,
    ) -> AppResult<OptimizationJob> {
        let fail = self
            .failing_finishes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if fail {
            return Err(AppError::Database(sqlx::Error::PoolTimedOut));
        }
        self.inner.finish(id, outcome, completed_at).await
    }

    async fn find_stale_running(&self, started_before: DateTime<Utc>) -> AppResult<Vec<Uuid>> {
        self.inner.find_stale_running(started_before).await
    }
}
