//! Controller task that owns the review list.
//!
//! All state mutation and every snapshot emission happen on the controller
//! task. Page fetches and avatar resolutions run as separate tasks and hand
//! their results back over a channel, so the list is never touched from two
//! places at once.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

use crate::application::services::scroll_trigger::DEFAULT_TRIGGER_SCREENS;
use crate::application::services::{ReviewMapper, ScrollMetrics, ScrollTrigger};
use crate::domain::entities::{AvatarImage, ListState, ReviewId, ReviewPage};
use crate::domain::errors::{ImageFetchError, ReviewsError};
use crate::domain::ports::{ImageFetcherPort, ReviewsDataPort};

use super::state::{LoadDecision, PageRequest, PaginationState};

/// Default number of reviews requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Construction-time options for the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControllerConfig {
    /// Reviews requested per page.
    pub page_size: usize,
    /// Distance from the end, in viewport heights, that triggers the next page.
    pub scroll_trigger_screens: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            scroll_trigger_screens: DEFAULT_TRIGGER_SCREENS,
        }
    }
}

#[derive(Debug)]
enum ControllerCommand {
    LoadNext,
    Refresh,
    ExpandText(ReviewId),
    Snapshot(oneshot::Sender<ListState>),
}

#[derive(Debug)]
enum Completion {
    Page {
        request: PageRequest,
        result: Result<ReviewPage, ReviewsError>,
    },
    Avatar {
        id: ReviewId,
        url: String,
        result: Result<AvatarImage, ImageFetchError>,
    },
}

/// Cloneable handle used by the presentation layer to drive the controller.
///
/// Every call returns immediately; effects show up as [`ListState`]
/// snapshots on the receiver returned by [`PaginationController::spawn`].
#[derive(Debug, Clone)]
pub struct PaginationHandle {
    command_tx: mpsc::UnboundedSender<ControllerCommand>,
    scroll_trigger: ScrollTrigger,
}

impl PaginationHandle {
    /// Requests the next page. Ignored while a page is loading.
    pub fn load_next(&self) {
        self.send(ControllerCommand::LoadNext);
    }

    /// Drops every loaded item and loads the first page again.
    pub fn refresh(&self) {
        self.send(ControllerCommand::Refresh);
    }

    /// Removes the line limit from the review with `id`.
    pub fn expand_text(&self, id: ReviewId) {
        self.send(ControllerCommand::ExpandText(id));
    }

    /// Requests the next page if the scroll position is close enough to the end.
    /// Returns whether a request was sent.
    pub fn on_scroll(&self, metrics: &ScrollMetrics) -> bool {
        if self.scroll_trigger.should_load_next_page(metrics) {
            self.load_next();
            true
        } else {
            false
        }
    }

    /// Returns the current state once every previously sent command has been
    /// handled, or `None` if the controller has stopped.
    pub async fn current_state(&self) -> Option<ListState> {
        let (tx, rx) = oneshot::channel();
        self.send(ControllerCommand::Snapshot(tx));
        rx.await.ok()
    }

    #[must_use]
    pub const fn scroll_trigger(&self) -> ScrollTrigger {
        self.scroll_trigger
    }

    /// Returns true once the controller task has exited.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.command_tx.is_closed()
    }

    fn send(&self, command: ControllerCommand) {
        if let Err(e) = self.command_tx.send(command) {
            error!("Failed to send controller command: {}", e);
        }
    }
}

/// Owns the pagination state and runs on its own task.
pub struct PaginationController {
    state: PaginationState,
    data_source: Arc<dyn ReviewsDataPort>,
    image_fetcher: Arc<dyn ImageFetcherPort>,
    mapper: ReviewMapper,
    state_tx: mpsc::UnboundedSender<ListState>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    page_task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for PaginationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaginationController")
            .field("offset", &self.state.offset())
            .field("generation", &self.state.generation())
            .finish_non_exhaustive()
    }
}

impl PaginationController {
    /// Spawns the controller task.
    ///
    /// Returns the handle and the receiver on which a snapshot is delivered
    /// after every state change. The task stops when every handle is dropped.
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        config: ControllerConfig,
        data_source: Arc<dyn ReviewsDataPort>,
        image_fetcher: Arc<dyn ImageFetcherPort>,
        mapper: ReviewMapper,
    ) -> (PaginationHandle, mpsc::UnboundedReceiver<ListState>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = mpsc::unbounded_channel();

        let controller = Self {
            state: PaginationState::new(config.page_size),
            data_source,
            image_fetcher,
            mapper,
            state_tx,
            completion_tx,
            page_task: None,
        };

        tokio::spawn(controller.run(command_rx, completion_rx));

        let handle = PaginationHandle {
            command_tx,
            scroll_trigger: ScrollTrigger::new(config.scroll_trigger_screens),
        };
        (handle, state_rx)
    }

    async fn run(
        mut self,
        mut command_rx: mpsc::UnboundedReceiver<ControllerCommand>,
        mut completion_rx: mpsc::UnboundedReceiver<Completion>,
    ) {
        debug!(page_size = self.state.page_size(), "Pagination controller started");

        loop {
            tokio::select! {
                command = command_rx.recv() => {
                    match command {
                        Some(command) => self.handle_command(command),
                        None => break,
                    }
                }
                Some(completion) = completion_rx.recv() => {
                    self.handle_completion(completion);
                }
            }
        }

        if let Some(task) = self.page_task.take() {
            task.abort();
        }
        debug!("Pagination controller stopped");
    }

    fn handle_command(&mut self, command: ControllerCommand) {
        match command {
            ControllerCommand::LoadNext => {
                if self.request_next_page() {
                    self.emit();
                }
            }
            ControllerCommand::Refresh => {
                if let Some(task) = self.page_task.take() {
                    task.abort();
                }
                self.state.reset();
                info!(generation = self.state.generation(), "Refreshing reviews");
                self.request_next_page();
                self.emit();
            }
            ControllerCommand::ExpandText(id) => {
                if self.state.expand_text(id) {
                    self.emit();
                } else {
                    trace!(id = %id, "Expand ignored");
                }
            }
            ControllerCommand::Snapshot(reply) => {
                let _ = reply.send(self.state.snapshot());
            }
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Page { request, result } => self.handle_page(request, result),
            Completion::Avatar { id, url, result } => match result {
                Ok(image) => {
                    if self.state.set_avatar(id, image) {
                        self.emit();
                    } else {
                        trace!(id = %id, "Dropping avatar for item no longer listed");
                    }
                }
                Err(e) => {
                    debug!(id = %id, url = %url, error = %e, "Avatar unavailable");
                }
            },
        }
    }

    fn handle_page(&mut self, request: PageRequest, result: Result<ReviewPage, ReviewsError>) {
        match result {
            Ok(page) => {
                let total_count = page.total_count;
                let items = self.mapper.map_all(page.records);
                let avatars: Vec<(ReviewId, String)> = items
                    .iter()
                    .filter_map(|item| item.avatar_url().map(|url| (item.id(), url.to_string())))
                    .collect();
                let received = items.len();

                if !self.state.complete_load(request, items, total_count) {
                    return;
                }
                self.page_task = None;

                debug!(
                    offset = self.state.offset(),
                    received = received,
                    total = total_count,
                    has_more = self.state.has_more(),
                    "Merged reviews page"
                );
                self.emit();

                for (id, url) in avatars {
                    self.spawn_avatar_fetch(id, url);
                }
            }
            Err(e) => {
                if !self.state.fail_load(request) {
                    return;
                }
                self.page_task = None;
                warn!(offset = request.offset, error = %e, "Failed to load reviews page");
                self.emit();
            }
        }
    }

    /// Returns whether the state changed.
    fn request_next_page(&mut self) -> bool {
        match self.state.begin_load() {
            LoadDecision::Start(request) => {
                self.spawn_page_fetch(request);
                true
            }
            LoadDecision::AlreadyLoading => false,
            LoadDecision::Exhausted { footer_added } => footer_added,
        }
    }

    fn spawn_page_fetch(&mut self, request: PageRequest) {
        debug!(
            offset = request.offset,
            limit = request.limit,
            generation = request.generation,
            "Requesting reviews page"
        );

        let data_source = self.data_source.clone();
        let completion_tx = self.completion_tx.clone();
        self.page_task = Some(tokio::spawn(async move {
            let result = data_source.fetch_page(request.offset, request.limit).await;
            let _ = completion_tx.send(Completion::Page { request, result });
        }));
    }

    fn spawn_avatar_fetch(&self, id: ReviewId, url: String) {
        let image_fetcher = self.image_fetcher.clone();
        let completion_tx = self.completion_tx.clone();
        tokio::spawn(async move {
            let result = image_fetcher.resolve(&url).await;
            let _ = completion_tx.send(Completion::Avatar { id, url, result });
        });
    }

    fn emit(&self) {
        if self.state_tx.send(self.state.snapshot()).is_err() {
            trace!("No state observer attached");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tokio::sync::Semaphore;

    use super::*;
    use crate::domain::entities::ReviewRecord;
    use crate::domain::ports::mocks::MockImageFetcherPort;

    struct ScriptedSource {
        responses: Mutex<VecDeque<Result<ReviewPage, ReviewsError>>>,
        offsets: Mutex<Vec<usize>>,
        active: AtomicUsize,
        max_active: AtomicUsize,
        gate: Option<Semaphore>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<ReviewPage, ReviewsError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                offsets: Mutex::new(Vec::new()),
                active: AtomicUsize::new(0),
                max_active: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn gated(responses: Vec<Result<ReviewPage, ReviewsError>>) -> Self {
            Self {
                gate: Some(Semaphore::new(0)),
                ..Self::new(responses)
            }
        }

        fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.add_permits(1);
            }
        }

        fn offsets(&self) -> Vec<usize> {
            self.offsets.lock().clone()
        }
    }

    #[async_trait]
    impl ReviewsDataPort for ScriptedSource {
        async fn fetch_page(&self, offset: usize, _limit: usize) -> Result<ReviewPage, ReviewsError> {
            self.offsets.lock().push(offset);
            let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_active.fetch_max(active, Ordering::SeqCst);

            if let Some(gate) = &self.gate {
                if let Ok(permit) = gate.acquire().await {
                    permit.forget();
                }
            }

            self.active.fetch_sub(1, Ordering::SeqCst);
            self.responses
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err(ReviewsError::transport("no scripted response")))
        }
    }

    fn record(i: usize, avatar_url: Option<&str>) -> ReviewRecord {
        ReviewRecord {
            text: format!("review {i}"),
            created: "2025-03-01".to_string(),
            avatar_url: avatar_url.map(String::from),
            rating: 5,
            first_name: "Olga".to_string(),
            last_name: "Ivanova".to_string(),
        }
    }

    fn page(count: usize, total: usize) -> Result<ReviewPage, ReviewsError> {
        Ok(ReviewPage::new((0..count).map(|i| record(i, None)).collect(), total))
    }

    fn failing_fetcher() -> Arc<MockImageFetcherPort> {
        let mut fetcher = MockImageFetcherPort::new();
        fetcher
            .expect_resolve()
            .returning(|_| Err(ImageFetchError::HttpStatus(404)));
        Arc::new(fetcher)
    }

    fn spawn(
        source: Arc<ScriptedSource>,
        fetcher: Arc<dyn ImageFetcherPort>,
    ) -> (PaginationHandle, mpsc::UnboundedReceiver<ListState>) {
        PaginationController::spawn(
            ControllerConfig::default(),
            source,
            fetcher,
            ReviewMapper::default(),
        )
    }

    async fn next_state(rx: &mut mpsc::UnboundedReceiver<ListState>) -> ListState {
        tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("timed out waiting for state")
            .expect("controller stopped")
    }

    #[tokio::test]
    async fn test_load_next_while_loading_is_dropped() {
        let source = Arc::new(ScriptedSource::gated(vec![page(20, 45)]));
        let (handle, mut rx) = spawn(source.clone(), failing_fetcher());

        handle.load_next();
        handle.load_next();
        handle.load_next();
        let state = handle.current_state().await.expect("controller alive");
        assert!(state.is_load_in_flight);

        let loading = next_state(&mut rx).await;
        assert!(loading.is_load_in_flight);
        assert!(rx.try_recv().is_err());

        source.release();
        let merged = next_state(&mut rx).await;
        assert_eq!(merged.len(), 20);
        assert_eq!(merged.offset, 20);
        assert!(!merged.is_load_in_flight);

        assert_eq!(source.offsets(), vec![0]);
        assert_eq!(source.max_active.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pages_until_exhausted() {
        let source = Arc::new(ScriptedSource::new(vec![page(20, 45), page(20, 45), page(5, 45)]));
        let (handle, mut rx) = spawn(source.clone(), failing_fetcher());

        let expected = [(20, 20, true), (40, 40, true), (45, 45, false)];
        for (count, offset, has_more) in expected {
            handle.load_next();
            assert!(next_state(&mut rx).await.is_load_in_flight);
            let state = next_state(&mut rx).await;
            assert_eq!((state.len(), state.offset, state.has_more), (count, offset, has_more));
        }

        let last = handle.current_state().await.expect("controller alive");
        assert_eq!(last.footer.map(|f| f.summary()), Some("45 reviews".to_string()));
        assert_eq!(source.offsets(), vec![0, 20, 40]);

        handle.load_next();
        let state = handle.current_state().await.expect("controller alive");
        assert_eq!(state.len(), 45);
        assert!(rx.try_recv().is_err());
        assert_eq!(source.offsets().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_page_is_retried_at_same_offset() {
        let source = Arc::new(ScriptedSource::new(vec![
            Err(ReviewsError::transport("connection reset")),
            page(20, 45),
        ]));
        let (handle, mut rx) = spawn(source.clone(), failing_fetcher());

        handle.load_next();
        assert!(next_state(&mut rx).await.is_load_in_flight);
        let failed = next_state(&mut rx).await;
        assert!(failed.is_empty());
        assert_eq!(failed.offset, 0);
        assert!(failed.has_more);
        assert!(!failed.is_load_in_flight);

        handle.load_next();
        assert!(next_state(&mut rx).await.is_load_in_flight);
        let loaded = next_state(&mut rx).await;
        assert_eq!(loaded.len(), 20);
        assert_eq!(source.offsets(), vec![0, 0]);
    }

    #[tokio::test]
    async fn test_refresh_resets_before_loading() {
        let source = Arc::new(ScriptedSource::new(vec![page(20, 45), page(20, 45)]));
        let (handle, mut rx) = spawn(source.clone(), failing_fetcher());

        handle.load_next();
        next_state(&mut rx).await;
        let first = next_state(&mut rx).await;
        assert_eq!(first.len(), 20);

        handle.refresh();
        let reset = next_state(&mut rx).await;
        assert!(reset.is_empty());
        assert_eq!(reset.offset, 0);
        assert!(reset.has_more);
        assert!(reset.is_load_in_flight);
        assert!(reset.footer.is_none());
        assert_eq!(reset.generation, first.generation + 1);

        let reloaded = next_state(&mut rx).await;
        assert_eq!(reloaded.len(), 20);
        assert!(reloaded.items.iter().all(|item| first.item(item.id()).is_none()));
        assert_eq!(source.offsets(), vec![0, 0]);
    }

    #[tokio::test]
    async fn test_refresh_discards_stale_page() {
        let source = Arc::new(ScriptedSource::gated(vec![page(20, 45), page(3, 3)]));
        let (handle, mut rx) = spawn(source.clone(), failing_fetcher());

        handle.load_next();
        next_state(&mut rx).await;
        handle.refresh();
        let reset = next_state(&mut rx).await;
        assert!(reset.is_empty());

        source.release();
        source.release();
        let merged = next_state(&mut rx).await;
        assert!(!merged.is_load_in_flight);
        assert_eq!(merged.generation, 1);

        let state = handle.current_state().await.expect("controller alive");
        assert_eq!(state.generation, 1);
        assert!(state.len() == 20 || state.len() == 3);
        assert_eq!(state.offset, state.len().min(20));
    }

    #[tokio::test]
    async fn test_avatar_arrival_emits_one_snapshot() {
        let source = Arc::new(ScriptedSource::new(vec![Ok(ReviewPage::new(
            vec![
                record(0, Some("https://example.com/a.png")),
                record(1, None),
                record(2, None),
            ],
            3,
        ))]));
        let mut fetcher = MockImageFetcherPort::new();
        fetcher
            .expect_resolve()
            .withf(|url: &str| url == "https://example.com/a.png")
            .times(1)
            .returning(|_| Ok(Arc::new(image::DynamicImage::new_rgb8(8, 8))));
        let (handle, mut rx) = spawn(source, Arc::new(fetcher));

        handle.load_next();
        next_state(&mut rx).await;
        let merged = next_state(&mut rx).await;
        assert!(merged.items.iter().all(|item| item.avatar().is_none()));

        let with_avatar = next_state(&mut rx).await;
        assert_eq!(with_avatar.len(), 3);
        assert_eq!(with_avatar.items[0].avatar().map(|img| img.width()), Some(8));
        for (before, after) in merged.items.iter().zip(&with_avatar.items).skip(1) {
            assert_eq!(before.id(), after.id());
            assert!(after.avatar().is_none());
        }

        handle.current_state().await.expect("controller alive");
        assert!(rx.try_recv().is_err());
    }

    struct GatedFetcher {
        gates: Mutex<Vec<(String, Arc<Semaphore>)>>,
    }

    impl GatedFetcher {
        fn new(urls: &[&str]) -> Self {
            let gates = urls
                .iter()
                .map(|url| ((*url).to_string(), Arc::new(Semaphore::new(0))))
                .collect();
            Self {
                gates: Mutex::new(gates),
            }
        }

        fn release(&self, url: &str) {
            if let Some((_, gate)) = self.gates.lock().iter().find(|(u, _)| u == url) {
                gate.add_permits(1);
            }
        }
    }

    #[async_trait]
    impl ImageFetcherPort for GatedFetcher {
        async fn resolve(&self, url: &str) -> Result<AvatarImage, ImageFetchError> {
            let gate = self
                .gates
                .lock()
                .iter()
                .find(|(u, _)| u == url)
                .map(|(_, gate)| gate.clone());
            if let Some(gate) = gate {
                if let Ok(permit) = gate.acquire().await {
                    permit.forget();
                }
            }
            Ok(Arc::new(image::DynamicImage::new_rgb8(4, 4)))
        }
    }

    #[tokio::test]
    async fn test_avatar_from_before_refresh_is_discarded() {
        let old_url = "https://example.com/old.png";
        let new_url = "https://example.com/new.png";
        let source = Arc::new(ScriptedSource::new(vec![
            Ok(ReviewPage::new(vec![record(0, Some(old_url))], 1)),
            Ok(ReviewPage::new(vec![record(0, Some(new_url))], 1)),
        ]));
        let fetcher = Arc::new(GatedFetcher::new(&[old_url, new_url]));
        let (handle, mut rx) = spawn(source, fetcher.clone());

        handle.load_next();
        next_state(&mut rx).await;
        next_state(&mut rx).await;

        handle.refresh();
        next_state(&mut rx).await;
        let reloaded = next_state(&mut rx).await;
        let new_id = reloaded.items[0].id();

        fetcher.release(old_url);
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.current_state().await.expect("controller alive");
        assert!(rx.try_recv().is_err());

        fetcher.release(new_url);
        let with_avatar = next_state(&mut rx).await;
        assert_eq!(with_avatar.items[0].id(), new_id);
        assert!(with_avatar.items[0].avatar().is_some());
    }

    #[tokio::test]
    async fn test_expand_text_emits_once() {
        let source = Arc::new(ScriptedSource::new(vec![page(2, 2)]));
        let (handle, mut rx) = spawn(source, failing_fetcher());

        handle.load_next();
        next_state(&mut rx).await;
        let merged = next_state(&mut rx).await;
        let id = merged.items[1].id();

        handle.expand_text(id);
        let expanded = next_state(&mut rx).await;
        assert!(expanded.items[1].is_text_expanded());
        assert_eq!(expanded.items[1].line_limit(), None);
        assert!(!expanded.items[0].is_text_expanded());

        handle.expand_text(id);
        handle.expand_text(ReviewId::generate());
        handle.current_state().await.expect("controller alive");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_on_scroll_uses_trigger_distance() {
        let source = Arc::new(ScriptedSource::new(vec![page(20, 45)]));
        let (handle, mut rx) = spawn(source.clone(), failing_fetcher());

        assert!(!handle.on_scroll(&ScrollMetrics::new(100.0, 2000.0, 0.0)));
        assert!(handle.on_scroll(&ScrollMetrics::new(100.0, 2000.0, 1700.0)));

        assert!(next_state(&mut rx).await.is_load_in_flight);
        assert_eq!(next_state(&mut rx).await.len(), 20);
        assert_eq!(source.offsets(), vec![0]);
    }

    #[tokio::test]
    async fn test_controller_stops_when_handles_dropped() {
        let source = Arc::new(ScriptedSource::new(vec![]));
        let (handle, mut rx) = spawn(source, failing_fetcher());
        let observer = handle.clone();
        drop(handle);
        assert!(!observer.is_closed());
        drop(observer);

        let closed = tokio::time::timeout(Duration::from_secs(2), rx.recv()).await;
        assert!(matches!(closed, Ok(None)));
    }
}
