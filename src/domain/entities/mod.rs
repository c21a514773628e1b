//! Domain entity definitions.

mod image;
mod list_state;
mod review;

pub use image::{AvatarImage, ImageKey};
pub use list_state::{ListRow, ListState, ReviewFooter};
pub use review::{COLLAPSED_LINE_LIMIT, ReviewId, ReviewItem, ReviewPage, ReviewRecord};
