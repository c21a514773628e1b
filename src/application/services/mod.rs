pub mod rating_renderer;
pub mod review_mapper;
pub mod scroll_trigger;

pub use rating_renderer::RatingRenderer;
pub use review_mapper::ReviewMapper;
pub use scroll_trigger::{ScrollMetrics, ScrollTrigger};
