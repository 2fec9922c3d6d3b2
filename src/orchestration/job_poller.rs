//! # Job Trigger and Poller
//!
//! Submits a window-scoped run of the transform job and polls it at a fixed
//! interval until the run reaches a terminal state. The first status check
//! happens one interval after submission, and every non-terminal observation
//! re-arms the same wait; there is no backoff.

use crate::config::JobConfig;
use crate::error::{IngestError, Result};
use crate::models::{JobRun, JobRunRequest};
use crate::resilience::RetryPolicy;
use crate::services::{JobService, ServiceResult};
use crate::state_machine::{JobRunStateMachine, PollAction};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct JobPoller {
    jobs: Arc<dyn JobService>,
    poll_interval: Duration,
    retry: RetryPolicy,
}

impl JobPoller {
    pub fn new(jobs: Arc<dyn JobService>, poll_interval: Duration, retry: RetryPolicy) -> Self {
        Self {
            jobs,
            poll_interval,
            retry,
        }
    }

    pub fn from_config(jobs: Arc<dyn JobService>, config: &JobConfig) -> Self {
        Self::new(
            jobs,
            config.poll_interval(),
            RetryPolicy::new(config.describe_max_attempts, config.describe_retry_delay()),
        )
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Start a run. Submission is not idempotent and is never retried.
    pub async fn submit(&self, request: &JobRunRequest) -> Result<JobRun> {
        let run_id = self
            .jobs
            .start_job_run(request)
            .await
            .map_err(|e| IngestError::infrastructure("start_job_run", e))?;

        info!(
            job_name = %request.job_name,
            run_id = %run_id,
            window_start = %request.window.start(),
            window_end = %request.window.end(),
            "Job run submitted"
        );

        Ok(JobRun::submitted(run_id, request))
    }

    /// Poll until the run is terminal.
    ///
    /// Returns the run in `SUCCEEDED`; any other terminal state is a
    /// [`IngestError::JobFailed`]. Transient status-check errors are retried
    /// per the retry policy and then escalate as infrastructure errors.
    #[instrument(skip(self, run), fields(job_name = %run.job_name, run_id = %run.id))]
    pub async fn await_completion(&self, run: JobRun) -> Result<JobRun> {
        let job_name = run.job_name.clone();
        let run_id = run.id.clone();
        let mut machine = JobRunStateMachine::new(run);

        loop {
            tokio::time::sleep(self.poll_interval).await;

            let status = self
                .retry
                .run("describe_job_run", || {
                    self.jobs.describe_job_run(&job_name, &run_id)
                })
                .await
                .map_err(|e| IngestError::infrastructure("describe_job_run", e))?;

            debug!(
                state = %status.state,
                poll = machine.run().polls + 1,
                "Job run status observed"
            );

            match machine.transition(status.state.clone())? {
                PollAction::Wait => continue,
                PollAction::Proceed => {
                    info!(polls = machine.run().polls, "Job run succeeded");
                    return Ok(machine.into_run());
                }
                PollAction::Fail => {
                    warn!(
                        state = %status.state,
                        message = ?status.message,
                        "Job run ended without success"
                    );
                    return Err(IngestError::JobFailed {
                        job_name,
                        run_id,
                        state: status.state,
                        message: status.message,
                    });
                }
            }
        }
    }

    /// Submit a run and wait for it to finish
    pub async fn trigger_and_wait(&self, request: &JobRunRequest) -> Result<JobRun> {
        let run = self.submit(request).await?;
        self.await_completion(run).await
    }

    /// Ask the job service to stop a run
    pub async fn stop(&self, run: &JobRun) -> ServiceResult<()> {
        self.jobs.stop_job_run(&run.job_name, &run.id).await
    }
}
