// State machine module for transform job runs
//
// The poller's wait/decide loop is expressed as an explicit finite-state
// machine: a typed state enum, a decision table, and a single transition
// function that is independent of how the waiting is scheduled.

pub mod errors;
pub mod job_run_state_machine;
pub mod states;

// Re-export main types for convenient access
pub use errors::{StateMachineError, StateMachineResult};
pub use job_run_state_machine::{JobRunStateMachine, StateTransition};
pub use states::{CycleStage, JobState, PollAction};
