mod common;

use common::*;
use std::sync::Arc;
use std::time::Duration;
use tasker_ingest::models::{ExecutionWindow, JobRunRequest};
use tasker_ingest::resilience::RetryPolicy;
use tasker_ingest::state_machine::JobState;
use tasker_ingest::{IngestError, JobPoller};
use tokio::time::Instant;

fn request() -> JobRunRequest {
    JobRunRequest {
        job_name: JOB.to_string(),
        window: ExecutionWindow::new(previous_checkpoint(), execution_start()).unwrap(),
    }
}

fn poller(jobs: Arc<ScriptedJobService>) -> JobPoller {
    JobPoller::new(
        jobs,
        Duration::from_secs(30),
        RetryPolicy::new(3, Duration::from_secs(5)),
    )
}

#[tokio::test(start_paused = true)]
async fn test_waits_one_interval_before_each_status_check() {
    let jobs = Arc::new(ScriptedJobService::new(&[
        "STARTING", "WAITING", "RUNNING", "STOPPING", "SUCCEEDED",
    ]));
    let started = Instant::now();

    let run = poller(jobs.clone()).trigger_and_wait(&request()).await.unwrap();

    assert_eq!(run.state, JobState::Succeeded);
    assert_eq!(run.polls, 5);
    assert_eq!(jobs.describe_calls(), 5);
    assert_eq!(started.elapsed(), Duration::from_secs(150));
}

#[tokio::test(start_paused = true)]
async fn test_no_status_check_before_the_first_interval() {
    let jobs = Arc::new(ScriptedJobService::new(&["SUCCEEDED"]));
    let poller = poller(jobs.clone());
    let run = poller.submit(&request()).await.unwrap();

    let waiting = tokio::spawn(async move { poller.await_completion(run).await });
    tokio::time::sleep(Duration::from_secs(29)).await;
    assert_eq!(jobs.describe_calls(), 0);

    let run = waiting.await.unwrap().unwrap();
    assert_eq!(run.state, JobState::Succeeded);
    assert_eq!(jobs.describe_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_each_failure_state_stops_polling() {
    for terminal in ["FAILED", "TIMEOUT", "STOPPED", "EXPIRED"] {
        let jobs = Arc::new(ScriptedJobService::new(&["RUNNING", terminal, "SUCCEEDED"]));

        let error = poller(jobs.clone())
            .trigger_and_wait(&request())
            .await
            .unwrap_err();

        match error {
            IngestError::JobFailed {
                job_name,
                run_id,
                state,
                ..
            } => {
                assert_eq!(job_name, JOB);
                assert_eq!(run_id, RUN_ID);
                assert_eq!(state.as_str(), terminal);
            }
            other => panic!("expected a job failure for {terminal}, got {other}"),
        }
        assert_eq!(jobs.describe_calls(), 2, "polling continued after {terminal}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_submission_records_window() {
    let jobs = Arc::new(ScriptedJobService::new(&["SUCCEEDED"]));

    let run = poller(jobs.clone()).submit(&request()).await.unwrap();

    assert_eq!(run.id, RUN_ID);
    assert_eq!(run.state, JobState::Starting);
    assert_eq!(run.polls, 0);
    assert_eq!(run.dataset_window, request().window);
    assert_eq!(jobs.submissions(), vec![request()]);
}

#[tokio::test(start_paused = true)]
async fn test_stop_forwards_to_job_service() {
    let jobs = Arc::new(ScriptedJobService::new(&[]));
    let poller = poller(jobs.clone());
    let run = poller.submit(&request()).await.unwrap();

    tokio_test::assert_ok!(poller.stop(&run).await);
    assert_eq!(jobs.stop_calls(), vec![RUN_ID.to_string()]);
}
