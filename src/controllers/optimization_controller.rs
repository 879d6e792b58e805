use std::sync::Arc;

use uuid::Uuid;

use crate::dto::optimization_dto::{JobStatusResponse, SubmitJobResponse};
use crate::models::OptimizationSnapshot;
use crate::services::JobOrchestrator;
use crate::utils::errors::AppError;

pub struct OptimizationController {
    orchestrator: Arc<JobOrchestrator>,
}

impl OptimizationController {
    pub fn new(orchestrator: Arc<JobOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Crear el job y esperar al solver en la misma petición. El despacho
    /// corre en su propia tarea: cortar la petición no deja el job en `running`.
    pub async fn optimize(
        &self,
        snapshot: OptimizationSnapshot,
    ) -> Result<JobStatusResponse, AppError> {
        let job = self.orchestrator.submit(snapshot).await?;
        let finished = self.orchestrator.dispatch_detached(job.id).await?;
        Ok(finished.into())
    }

    /// Crear el job y despacharlo en segundo plano
    pub async fn submit_job(
        &self,
        snapshot: OptimizationSnapshot,
    ) -> Result<SubmitJobResponse, AppError> {
        let job = self.orchestrator.submit(snapshot).await?;
        let response = SubmitJobResponse::from(&job);
        self.orchestrator.spawn_dispatch(job.id);
        Ok(response)
    }

    /// Despachar un job que sigue en `pending`
    pub async fn dispatch_job(&self, job_id: Uuid) -> Result<JobStatusResponse, AppError> {
        let finished = self.orchestrator.dispatch_detached(job_id).await?;
        Ok(finished.into())
    }

    pub async fn job_status(&self, job_id: Uuid) -> Result<JobStatusResponse, AppError> {
        let job = self.orchestrator.get_status(job_id).await?;
        Ok(job.into())
    }
}
