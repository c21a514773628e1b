//! Application layer with the pagination controller and its services.

/// Pagination state machine and controller task.
pub mod pagination;
/// Record mapping, rating rendering and scroll policy.
pub mod services;

pub use pagination::{ControllerConfig, PaginationController, PaginationHandle};
pub use services::{RatingRenderer, ReviewMapper, ScrollMetrics, ScrollTrigger};
