use crate::state_machine::states::JobState;
use thiserror::Error;

/// Errors raised by the job run state machine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateMachineError {
    /// A run already reached a terminal state and cannot change
    #[error("run {run_id} is terminal in {terminal}; observed {observed}")]
    TerminalStateImmutable {
        run_id: String,
        terminal: JobState,
        observed: JobState,
    },
}

pub type StateMachineResult<T> = Result<T, StateMachineError>;
