//! Incremental loading of the review list.

pub mod controller;
pub mod state;

pub use controller::{ControllerConfig, DEFAULT_PAGE_SIZE, PaginationController, PaginationHandle};
pub use state::{LoadDecision, PageRequest, PaginationState};
