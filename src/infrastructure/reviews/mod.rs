//! Reviews data sources.

pub mod dto;
pub mod fixture_source;
pub mod http_source;

pub use dto::{ReviewResponse, ReviewsResponse, decode_page};
pub use fixture_source::FixtureReviewsDataSource;
pub use http_source::HttpReviewsDataSource;
