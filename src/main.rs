use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use review_feed::application::{PaginationController, PaginationHandle, ReviewMapper};
use review_feed::application::services::RatingRenderer;
use review_feed::domain::entities::{ListRow, ListState};
use review_feed::domain::ports::ReviewsDataPort;
use review_feed::infrastructure::{
    AppConfig, CliArgs, FixtureReviewsDataSource, HttpClient, HttpReviewsDataSource,
    ImageCrateDecoder, ImageFetcher, MemoryImageCache, StorageManager,
};

const AVATAR_DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config() -> Result<(AppConfig, Option<usize>)> {
    let args = CliArgs::parse();
    let max_pages = args.max_pages;

    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);

    Ok((config, max_pages))
}

async fn create_source(
    config: &AppConfig,
    http: Arc<HttpClient>,
) -> Result<Arc<dyn ReviewsDataPort>> {
    if let Some(url) = &config.source.reviews_url {
        info!(url = %url, "Using remote reviews source");
        return Ok(Arc::new(HttpReviewsDataSource::new(http, url.clone())));
    }
    if let Some(path) = &config.source.fixture_path {
        let source = FixtureReviewsDataSource::from_path(path).await?;
        return Ok(Arc::new(source));
    }
    Err(eyre!(
        "no reviews source configured: pass --reviews-url or --fixture-path"
    ))
}

fn print_state(state: &ListState) {
    for row in state.rows() {
        match row {
            ListRow::Review(item) => {
                let avatar = if item.avatar().is_some() { "[img]" } else { "[   ]" };
                println!(
                    "{avatar} {} {} {}",
                    item.full_name(),
                    item.rating(),
                    item.created_text()
                );
                let limit = item.line_limit().map_or(usize::MAX, |n| n as usize);
                for line in item.display_text().lines().take(limit) {
                    println!("      {line}");
                }
            }
            ListRow::Footer(footer) => println!("-- {footer} --"),
        }
    }
}

/// Requests pages until the list is exhausted or `max_pages` merges happened,
/// then waits for avatar updates to settle.
async fn drive(
    handle: &PaginationHandle,
    states: &mut mpsc::UnboundedReceiver<ListState>,
    max_pages: Option<usize>,
) -> Option<ListState> {
    let mut pages = 0usize;
    let mut last: Option<ListState> = None;

    handle.load_next();
    while let Some(state) = states.recv().await {
        let settled = last.as_ref().filter(|prev| prev.is_load_in_flight && !state.is_load_in_flight);
        let failed = settled.is_some_and(|prev| prev.offset == state.offset && state.has_more);
        if settled.is_some() && !failed {
            pages += 1;
            debug!(pages, items = state.len(), "Page merged");
        }
        let done = !state.has_more || failed || max_pages.is_some_and(|max| pages >= max);
        let idle = !state.is_load_in_flight;
        last = Some(state);

        if failed {
            warn!("Page request failed, stopping");
        }
        if done {
            break;
        }
        if idle {
            handle.load_next();
        }
    }

    loop {
        match tokio::time::timeout(AVATAR_DRAIN_TIMEOUT, states.recv()).await {
            Ok(Some(state)) => last = Some(state),
            Ok(None) => break,
            Err(_) => {
                debug!("No further updates, stopping");
                break;
            }
        }
    }

    last
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let (config, max_pages) = load_config()?;
    init_logging(&config)?;

    info!(version = review_feed::VERSION, "Starting {}", review_feed::NAME);

    let http = Arc::new(HttpClient::with_timeout(config.request_timeout())?);
    let fetcher_config = config.image_fetcher_config();
    let cache = Arc::new(MemoryImageCache::new(fetcher_config.cache_capacity));
    let fetcher = Arc::new(ImageFetcher::new(
        cache.clone(),
        http.clone(),
        Arc::new(ImageCrateDecoder::new()),
        fetcher_config.max_concurrent_downloads,
    ));

    let source = create_source(&config, http).await?;
    let mapper = ReviewMapper::new(RatingRenderer::default(), config.source.created_format.clone());

    let (handle, mut states) =
        PaginationController::spawn(config.controller_config(), source, fetcher, mapper);

    match drive(&handle, &mut states, max_pages).await {
        Some(state) => print_state(&state),
        None => warn!("Controller stopped before producing a snapshot"),
    }

    info!("{}", cache.stats());
    Ok(())
}
