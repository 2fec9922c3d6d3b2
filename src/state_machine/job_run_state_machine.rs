use super::{
    errors::{StateMachineError, StateMachineResult},
    states::{JobState, PollAction},
};
use crate::models::JobRun;
use serde::Serialize;
use tracing::debug;

/// A recorded change of run state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateTransition {
    pub from: JobState,
    pub to: JobState,
}

/// Tracks one job run from submission to a terminal state.
///
/// The only way to change state is [`JobRunStateMachine::transition`], which
/// records the observation and returns the poller's next action. Once a
/// terminal state is recorded the run is frozen.
#[derive(Debug, Clone)]
pub struct JobRunStateMachine {
    run: JobRun,
    transitions: Vec<StateTransition>,
}

impl JobRunStateMachine {
    pub fn new(run: JobRun) -> Self {
        Self {
            run,
            transitions: Vec::new(),
        }
    }

    pub fn current_state(&self) -> &JobState {
        &self.run.state
    }

    /// Apply an observed state and decide what the poller does next
    pub fn transition(&mut self, observed: JobState) -> StateMachineResult<PollAction> {
        if self.run.state.is_terminal() {
            return Err(StateMachineError::TerminalStateImmutable {
                run_id: self.run.id.clone(),
                terminal: self.run.state.clone(),
                observed,
            });
        }

        self.run.polls += 1;
        let action = observed.poll_action();

        if observed != self.run.state {
            debug!(
                run_id = %self.run.id,
                from = %self.run.state,
                to = %observed,
                ?action,
                "Job run state changed"
            );
            let from = std::mem::replace(&mut self.run.state, observed.clone());
            self.transitions.push(StateTransition { from, to: observed });
        }

        Ok(action)
    }

    pub fn is_terminal(&self) -> bool {
        self.run.state.is_terminal()
    }

    pub fn transitions(&self) -> &[StateTransition] {
        &self.transitions
    }

    pub fn run(&self) -> &JobRun {
        &self.run
    }

    pub fn into_run(self) -> JobRun {
        self.run
    }
}
