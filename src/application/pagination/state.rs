//! Pagination state machine.
//!
//! Pure and synchronous: the controller task owns one instance and is the
//! only writer, so no locking happens here.

use tracing::{debug, trace};

use crate::domain::entities::{AvatarImage, ListState, ReviewFooter, ReviewId, ReviewItem};

/// A page request issued by [`PaginationState::begin_load`].
///
/// Carries the generation it belongs to so a result arriving after a
/// refresh can be recognised and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Generation the request was issued in.
    pub generation: u64,
    /// Record offset to fetch from.
    pub offset: usize,
    /// Number of records to fetch.
    pub limit: usize,
}

/// Result of asking for the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadDecision {
    /// A request must be issued.
    Start(PageRequest),
    /// A request is already outstanding; nothing to do.
    AlreadyLoading,
    /// No more pages. `footer_added` is true if this call produced the footer.
    Exhausted { footer_added: bool },
}

/// List state plus the bookkeeping needed to page through it.
#[derive(Debug, Clone)]
pub struct PaginationState {
    items: Vec<ReviewItem>,
    offset: usize,
    page_size: usize,
    total_count: Option<usize>,
    has_more: bool,
    in_flight: Option<PageRequest>,
    footer: Option<ReviewFooter>,
    generation: u64,
}

impl PaginationState {
    /// Creates an idle, empty state. A zero page size is treated as one.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            offset: 0,
            page_size: page_size.max(1),
            total_count: None,
            has_more: true,
            in_flight: None,
            footer: None,
            generation: 0,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn footer(&self) -> Option<ReviewFooter> {
        self.footer
    }

    /// Moves to `Loading` if idle and more data is available.
    pub fn begin_load(&mut self) -> LoadDecision {
        if self.in_flight.is_some() {
            trace!(offset = self.offset, "Load already in flight, ignoring");
            return LoadDecision::AlreadyLoading;
        }

        if !self.has_more {
            let footer_added = self.ensure_footer();
            return LoadDecision::Exhausted { footer_added };
        }

        let request = PageRequest {
            generation: self.generation,
            offset: self.offset,
            limit: self.page_size,
        };
        self.in_flight = Some(request);
        LoadDecision::Start(request)
    }

    /// Merges a fetched page. Returns false, leaving state untouched, if
    /// `request` is not the outstanding request of the current generation.
    ///
    /// The offset advances by one page, capped at `total_count`.
    pub fn complete_load(
        &mut self,
        request: PageRequest,
        items: Vec<ReviewItem>,
        total_count: usize,
    ) -> bool {
        if !self.is_current(request) {
            debug!(
                offset = request.offset,
                generation = request.generation,
                current = self.generation,
                "Discarding stale page"
            );
            return false;
        }

        self.in_flight = None;
        self.items.extend(items);
        self.offset = (self.offset + self.page_size).min(total_count);
        self.total_count = Some(total_count);
        self.has_more = self.offset < total_count;
        if !self.has_more {
            self.ensure_footer();
        }
        true
    }

    /// Returns to `Idle` after a failed fetch without touching the data, so the
    /// next `begin_load` retries the same offset.
    pub fn fail_load(&mut self, request: PageRequest) -> bool {
        if !self.is_current(request) {
            debug!(offset = request.offset, "Discarding stale page failure");
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Clears everything and starts a new generation. Any outstanding request
    /// becomes stale.
    pub fn reset(&mut self) {
        self.items.clear();
        self.offset = 0;
        self.total_count = None;
        self.has_more = true;
        self.in_flight = None;
        self.footer = None;
        self.generation += 1;
    }

    /// Stores an avatar on the item with `id`. Returns false if the item is
    /// gone (refreshed away) or already has one.
    pub fn set_avatar(&mut self, id: ReviewId, image: AvatarImage) -> bool {
        self.item_mut(id).is_some_and(|item| item.set_avatar(image))
    }

    /// Expands the text of the item with `id`. Returns false if the item is
    /// unknown or already expanded.
    pub fn expand_text(&mut self, id: ReviewId) -> bool {
        self.item_mut(id).is_some_and(ReviewItem::expand_text)
    }

    /// Produces an immutable snapshot for observers.
    #[must_use]
    pub fn snapshot(&self) -> ListState {
        ListState {
            items: self.items.clone(),
            offset: self.offset,
            page_size: self.page_size,
            total_count: self.total_count,
            has_more: self.has_more,
            is_load_in_flight: self.in_flight.is_some(),
            footer: self.footer,
            generation: self.generation,
        }
    }

    fn is_current(&self, request: PageRequest) -> bool {
        request.generation == self.generation && self.in_flight == Some(request)
    }

    fn ensure_footer(&mut self) -> bool {
        if self.footer.is_some() {
            return false;
        }
        self.footer = Some(ReviewFooter::new(self.items.len()));
        true
    }

    fn item_mut(&mut self, id: ReviewId) -> Option<&mut ReviewItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }
}
