//! # Collaborator Services
//!
//! Traits for the external systems the ingestion cycle depends on, the error
//! type they report, and reference implementations:
//!
//! - [`traits`] - job, dataset, object and parameter service interfaces
//! - [`clock`] - execution start time source
//! - [`listing`] - lazy paginated key listing
//! - [`memory`] - in-memory parameter and object stores
//! - [`file_parameter_store`] - durable JSON-file parameter store

pub mod clock;
pub mod errors;
pub mod file_parameter_store;
pub mod listing;
pub mod memory;
pub mod traits;

pub use clock::{Clock, FixedClock, SystemClock};
pub use errors::{ServiceError, ServiceResult};
pub use file_parameter_store::FileParameterStore;
pub use listing::list_all_keys;
pub use memory::{InMemoryObjectStore, InMemoryParameterStore};
pub use traits::{DatasetService, JobService, ObjectPage, ObjectStore, ParameterStore};
