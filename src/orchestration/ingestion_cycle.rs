//! # Ingestion Cycle
//!
//! One invocation of the pipeline for one dataset:
//!
//! 1. read the checkpoint and compute the execution window
//! 2. rescope the dataset definition to the window
//! 3. submit the transform job and poll it to a terminal state
//! 4. relocate the job's output
//! 5. commit the window end as the new checkpoint
//!
//! Any failure stops the cycle where it happened and leaves the checkpoint
//! untouched. The commit is the last action of a successful cycle. Everything
//! up to the commit runs under a single timeout; expiry abandons monitoring and
//! never commits. Once relocation has succeeded the commit itself runs outside
//! the timeout, so a write already handed to the parameter store is never
//! reported as a timed out cycle.

use crate::checkpoint::{CheckpointCommitter, CheckpointStore};
use crate::config::PipelineConfig;
use crate::error::{IngestError, Result};
use crate::log_cycle;
use crate::models::{
    DatasetUpdate, ExecutionWindow, JobRun, JobRunRequest, RelocationSummary, WindowCalculator,
};
use crate::orchestration::job_poller::JobPoller;
use crate::orchestration::post_processor::{PostProcessor, RelocationRequest};
use crate::orchestration::types::{CycleFailure, CycleOutcome, CycleProgress, CycleReport};
use crate::services::{Clock, DatasetService, JobService, ObjectStore};
use crate::state_machine::CycleStage;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Work finished before the commit
struct Relocated {
    window: ExecutionWindow,
    job_run: JobRun,
    relocation: RelocationSummary,
}

/// Collaborators a cycle drives
#[derive(Debug, Clone)]
pub struct CycleServices {
    pub checkpoints: Arc<dyn CheckpointStore>,
    pub datasets: Arc<dyn DatasetService>,
    pub jobs: Arc<dyn JobService>,
    pub objects: Arc<dyn ObjectStore>,
    pub clock: Arc<dyn Clock>,
}

#[derive(Debug)]
pub struct IngestionCycle {
    config: PipelineConfig,
    checkpoints: Arc<dyn CheckpointStore>,
    datasets: Arc<dyn DatasetService>,
    clock: Arc<dyn Clock>,
    poller: JobPoller,
    post_processor: PostProcessor,
    committer: CheckpointCommitter,
}

impl IngestionCycle {
    /// Build a cycle; the configuration is validated first
    pub fn new(config: PipelineConfig, services: CycleServices) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            poller: JobPoller::from_config(services.jobs, &config.job),
            post_processor: PostProcessor::from_config(services.objects, &config.output),
            committer: CheckpointCommitter::new(services.checkpoints.clone()),
            checkpoints: services.checkpoints,
            datasets: services.datasets,
            clock: services.clock,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Post-processing input derived from the output configuration
    pub fn relocation_request(&self) -> RelocationRequest {
        let temporary = self.config.output.temporary_prefix.trim_end_matches('/');
        RelocationRequest {
            destination_bucket: self.config.output.bucket.clone(),
            source_prefix: format!("{temporary}/"),
            destination_prefix: self.config.output.destination_prefix.clone(),
        }
    }

    /// Run one cycle and report how it ended
    #[instrument(skip(self), fields(dataset_id = %self.config.dataset.name))]
    pub async fn run(&self) -> CycleOutcome {
        let execution_id = Uuid::new_v4();
        let (result, progress) = self.run_tracked(execution_id).await;

        match result {
            Ok(report) => {
                log_cycle!(info, "cycle_succeeded",
                    execution_id: execution_id,
                    dataset_id: report.dataset_id,
                    run_id: report.job_run.id,
                    moved: report.relocation.moved,
                    checkpoint: report.checkpoint.encode_value()
                );
                CycleOutcome::Succeeded(report)
            }
            Err(err) => {
                let failure = CycleFailure::from_error(
                    execution_id,
                    self.config.dataset.name.as_str(),
                    progress.stage,
                    &err,
                    progress.job_run,
                );
                log_cycle!(error, "cycle_failed",
                    execution_id: execution_id,
                    stage: failure.stage,
                    kind: failure.kind,
                    cause: failure.cause
                );
                CycleOutcome::Failed(failure)
            }
        }
    }

    /// Run one cycle and return the error itself on failure
    pub async fn try_run(&self) -> Result<CycleReport> {
        self.run_tracked(Uuid::new_v4()).await.0
    }

    async fn run_tracked(&self, execution_id: Uuid) -> (Result<CycleReport>, CycleProgress) {
        let progress = Mutex::new(CycleProgress::default());
        let limit = self.config.workflow.timeout();

        let result =
            match tokio::time::timeout(limit, self.execute(execution_id, &progress)).await {
                Ok(Ok(relocated)) => self.commit(execution_id, relocated, &progress).await,
                Ok(Err(err)) => Err(err),
                Err(_) => {
                    let stage = progress.lock().stage;
                    error!(
                        execution_id = %execution_id,
                        stage = %stage,
                        limit_secs = limit.as_secs(),
                        "Cycle timed out, monitoring abandoned"
                    );
                    Err(IngestError::Timeout { limit, stage })
                }
            };

        let progress = progress.into_inner();
        if matches!(result, Err(IngestError::Timeout { .. })) && self.config.job.cancel_on_timeout
        {
            if let Some(run) = &progress.job_run {
                match self.poller.stop(run).await {
                    Ok(()) => info!(run_id = %run.id, "Stop requested for timed out job run"),
                    Err(e) => warn!(
                        run_id = %run.id,
                        error = %e,
                        "Failed to stop timed out job run"
                    ),
                }
            }
        }

        (result, progress)
    }

    async fn execute(
        &self,
        execution_id: Uuid,
        progress: &Mutex<CycleProgress>,
    ) -> Result<Relocated> {
        let dataset_id = self.config.dataset.name.as_str();
        let started_at = self.clock.now();
        log_cycle!(info, "cycle_started",
            execution_id: execution_id,
            dataset_id: dataset_id,
            started_at: started_at.to_rfc3339()
        );

        let previous = self.checkpoints.get(dataset_id).await?;

        progress.lock().stage = CycleStage::ComputingWindow;
        let window = WindowCalculator::compute(
            previous.map(|checkpoint| checkpoint.last_execution_timestamp),
            started_at,
        )?;
        log_cycle!(info, "window_computed",
            execution_id: execution_id,
            start: window.start().to_rfc3339(),
            end: window.end().to_rfc3339(),
            initial: window.is_initial()
        );

        progress.lock().stage = CycleStage::UpdatingDataset;
        let update = DatasetUpdate::new(
            dataset_id,
            self.config.dataset.input_location(),
            self.config.dataset.path_parameters.clone(),
            &window,
        );
        self.datasets
            .update_dataset(&update)
            .await
            .map_err(|e| IngestError::infrastructure("update_dataset", e))?;

        progress.lock().stage = CycleStage::SubmittingJob;
        let request = JobRunRequest {
            job_name: self.config.job.name.clone(),
            window,
        };
        let run = self.poller.submit(&request).await?;
        {
            let mut progress = progress.lock();
            progress.job_run = Some(run.clone());
            progress.stage = CycleStage::AwaitingJob;
        }

        let run = self.poller.await_completion(run).await?;
        {
            let mut progress = progress.lock();
            progress.job_run = Some(run.clone());
            progress.stage = CycleStage::PostProcessing;
        }

        let relocation = self.post_processor.process(&self.relocation_request()).await?;
        progress.lock().stage = CycleStage::Committing;

        Ok(Relocated {
            window,
            job_run: run,
            relocation,
        })
    }

    async fn commit(
        &self,
        execution_id: Uuid,
        relocated: Relocated,
        progress: &Mutex<CycleProgress>,
    ) -> Result<CycleReport> {
        let dataset_id = self.config.dataset.name.as_str();
        let checkpoint = self
            .committer
            .commit(dataset_id, &relocated.window, &relocated.relocation)
            .await?;
        progress.lock().stage = CycleStage::Completed;

        Ok(CycleReport {
            execution_id,
            dataset_id: dataset_id.to_string(),
            window: relocated.window,
            job_run: relocated.job_run,
            relocation: relocated.relocation,
            checkpoint,
        })
    }
}
