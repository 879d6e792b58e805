//! Repositorio de OptimizationJob
//!
//! Las transiciones se aplican como compare-and-set sobre el estado actual:
//! `pending -> running` y `running -> terminal`. La transición terminal
//! escribe estado, resultado/error y `completed_at` en una sola operación.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::optimization_job::{
    JobError, JobErrorKind, JobOutcome, JobResult, JobStatus, OptimizationJob,
};
use crate::models::OptimizationSnapshot;
use crate::utils::errors::{not_found_error, AppError, AppResult};

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn insert(&self, job: &OptimizationJob) -> AppResult<()>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<OptimizationJob>>;

    /// `pending -> running`; `InvalidState` si el job no está pendiente
    async fn mark_running(&self, id: Uuid, started_at: DateTime<Utc>)
        -> AppResult<OptimizationJob>;

    /// `running -> completed | failed`; `InvalidState` si el job no está en curso
    async fn finish(
        &self,
        id: Uuid,
        outcome: JobOutcome,
        completed_at: DateTime<Utc>,
    ) -> AppResult<OptimizationJob>;

    /// Jobs en `running` que arrancaron antes de `started_before`
    async fn find_stale_running(&self, started_before: DateTime<Utc>) -> AppResult<Vec<Uuid>>;
}

/// Repositorio en memoria, usado cuando no hay DATABASE_URL
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<Uuid, OptimizationJob>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn insert(&self, job: &OptimizationJob) -> AppResult<()> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(AppError::InvalidState(format!("job '{}' already exists", job.id)));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<OptimizationJob>> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn mark_running(
        &self,
        id: Uuid,
        started_at: DateTime<Utc>,
    ) -> AppResult<OptimizationJob> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Job", &id.to_string()))?;
        job.start(started_at)?;
        Ok(job.clone())
    }

    async fn finish(
        &self,
        id: Uuid,
        outcome: JobOutcome,
        completed_at: DateTime<Utc>,
    ) -> AppResult<OptimizationJob> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Job", &id.to_string()))?;
        job.finish(outcome, completed_at)?;
        Ok(job.clone())
    }

    async fn find_stale_running(&self, started_before: DateTime<Utc>) -> AppResult<Vec<Uuid>> {
        Ok(self
            .jobs
            .read()
            .await
            .values()
            .filter(|job| job.status == JobStatus::Running)
            .filter(|job| job.started_at.is_some_and(|at| at < started_before))
            .map(|job| job.id)
            .collect())
    }
}

/// Fila de la tabla optimization_jobs
#[derive(Debug, sqlx::FromRow)]
struct OptimizationJobRow {
    id: Uuid,
    request_data: Json<OptimizationSnapshot>,
    status: JobStatus,
    result_data: Option<Json<JobResult>>,
    error_message: Option<String>,
    error_kind: Option<String>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    processing_time_seconds: Option<f64>,
}

impl From<OptimizationJobRow> for OptimizationJob {
    fn from(row: OptimizationJobRow) -> Self {
        let error = row.error_message.map(|message| JobError {
            kind: row
                .error_kind
                .as_deref()
                .map(JobErrorKind::parse)
                .unwrap_or(JobErrorKind::Internal),
            message,
        });

        Self {
            id: row.id,
            request: row.request_data.0,
            status: row.status,
            result: row.result_data.map(|r| r.0),
            error,
            created_at: row.created_at,
            started_at: row.started_at,
            completed_at: row.completed_at,
            processing_time_seconds: row.processing_time_seconds,
        }
    }
}

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Distinguir "no existe" de "estado incompatible" tras un UPDATE vacío
    async fn transition_rejected(&self, id: Uuid, action: &str) -> AppError {
        match self.find_by_id(id).await {
            Ok(Some(job)) => AppError::InvalidState(format!(
                "job '{}' is {} and cannot be {}",
                id, job.status, action
            )),
            Ok(None) => not_found_error("Job", &id.to_string()),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    async fn insert(&self, job: &OptimizationJob) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO optimization_jobs (id, request_data, status, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(job.id)
        .bind(Json(&job.request))
        .bind(job.status)
        .bind(job.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<OptimizationJob>> {
        let row = sqlx::query_as::<_, OptimizationJobRow>(
            "SELECT * FROM optimization_jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(OptimizationJob::from))
    }

    async fn mark_running(
        &self,
        id: Uuid,
        started_at: DateTime<Utc>,
    ) -> AppResult<OptimizationJob> {
        let row = sqlx::query_as::<_, OptimizationJobRow>(
            r#"
            UPDATE optimization_jobs
            SET status = 'running', started_at = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(started_at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row.into()),
            None => Err(self.transition_rejected(id, "dispatched").await),
        }
    }

    async fn finish(
        &self,
        id: Uuid,
        outcome: JobOutcome,
        completed_at: DateTime<Utc>,
    ) -> AppResult<OptimizationJob> {
        let status = outcome.status();
        let (result, error) = match outcome {
            JobOutcome::Completed(result) => (Some(Json(result)), None),
            JobOutcome::Failed(error) => (None, Some(error)),
        };

        let row = sqlx::query_as::<_, OptimizationJobRow>(
            r#"
            UPDATE optimization_jobs
            SET status = $2,
                result_data = $3,
                error_message = $4,
                error_kind = $5,
                completed_at = $6,
                processing_time_seconds = EXTRACT(EPOCH FROM ($6 - started_at))::float8
            WHERE id = $1 AND status = 'running'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(result)
        .bind(error.as_ref().map(|e| e.message.clone()))
        .bind(error.as_ref().map(|e| e.kind.as_str()))
        .bind(completed_at)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(row.into()),
            None => Err(self.transition_rejected(id, "finished").await),
        }
    }

    async fn find_stale_running(&self, started_before: DateTime<Utc>) -> AppResult<Vec<Uuid>> {
        let ids: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT id FROM optimization_jobs WHERE status = 'running' AND started_at < $1",
        )
        .bind(started_before)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().map(|(id,)| id).collect())
    }
}
