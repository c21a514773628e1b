use super::app_config::LogLevel;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "review-feed",
    version,
    about = "Pages through a reviews feed and resolves author avatars",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Reviews requested per page.
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Viewport heights from the end that trigger the next page.
    #[arg(long)]
    pub scroll_trigger_screens: Option<f64>,

    /// Maximum decoded avatars kept in memory.
    #[arg(long)]
    pub cache_capacity: Option<usize>,

    /// Maximum simultaneous avatar downloads.
    #[arg(long)]
    pub max_concurrent_downloads: Option<usize>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Paged reviews endpoint.
    #[arg(long, env = "REVIEW_FEED_URL", value_name = "URL")]
    pub reviews_url: Option<String>,

    /// Local reviews JSON document.
    #[arg(long, value_name = "PATH")]
    pub fixture_path: Option<PathBuf>,

    /// Stop after this many pages.
    #[arg(long)]
    pub max_pages: Option<usize>,
}
