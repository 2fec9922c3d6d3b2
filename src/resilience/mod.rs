//! # Resilience Module
//!
//! Fault tolerance for calls to external services. Status checks against the
//! job service are idempotent and go through a bounded [`RetryPolicy`] so a
//! single throttled request does not fail the whole cycle. Mutating calls are
//! issued once.

pub mod retry;

pub use retry::RetryPolicy;
