//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::application::ControllerConfig;
use crate::application::pagination::DEFAULT_PAGE_SIZE;
use crate::application::services::review_mapper::DEFAULT_CREATED_FORMAT;
use crate::application::services::scroll_trigger::DEFAULT_TRIGGER_SCREENS;
use crate::infrastructure::image::ImageFetcherConfig;
use crate::infrastructure::image::memory_cache::DEFAULT_CACHE_SIZE;

use super::args::CliArgs;

pub(super) const APP_NAME: &str = "review-feed";
pub(super) const APP_QUALIFIER: &str = "com";
pub(super) const APP_ORGANIZATION: &str = "linuxmobile";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Converts to tracing level.
    #[must_use]
    pub const fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Application configuration, read from `config.toml` and overridden by CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Configuration file path.
    #[serde(skip)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[serde(default)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Pagination settings.
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Avatar image settings.
    #[serde(default)]
    pub images: ImagesConfig,

    /// Where reviews come from.
    #[serde(default)]
    pub source: SourceConfig,
}

/// Pagination configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Reviews requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Load the next page when the viewport is this many screens from the end.
    #[serde(default = "default_trigger_screens")]
    pub scroll_trigger_screens: f64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            scroll_trigger_screens: default_trigger_screens(),
        }
    }
}

/// Avatar image configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesConfig {
    /// Maximum decoded images kept in memory.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Maximum simultaneous image downloads.
    #[serde(default = "default_max_downloads")]
    pub max_concurrent_downloads: usize,

    /// Request timeout in seconds, shared with page requests.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            max_concurrent_downloads: default_max_downloads(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

/// Reviews source configuration.
///
/// `reviews_url` wins when both it and `fixture_path` are set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Paged reviews endpoint.
    #[serde(default)]
    pub reviews_url: Option<String>,

    /// Local JSON document with reviews.
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,

    /// chrono format for review creation dates.
    #[serde(default = "default_created_format")]
    pub created_format: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            reviews_url: None,
            fixture_path: None,
            created_format: default_created_format(),
        }
    }
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_trigger_screens() -> f64 {
    DEFAULT_TRIGGER_SCREENS
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_SIZE
}

fn default_max_downloads() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_created_format() -> String {
    DEFAULT_CREATED_FORMAT.to_string()
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: CliArgs) {
        if let Some(config_path) = args.config {
            self.config = Some(config_path);
        }
        if let Some(log_path) = args.log_path {
            self.log_path = Some(log_path);
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(page_size) = args.page_size {
            self.pagination.page_size = page_size;
        }
        if let Some(screens) = args.scroll_trigger_screens {
            self.pagination.scroll_trigger_screens = screens;
        }
        if let Some(capacity) = args.cache_capacity {
            self.images.cache_capacity = capacity;
        }
        if let Some(max_downloads) = args.max_concurrent_downloads {
            self.images.max_concurrent_downloads = max_downloads;
        }
        if let Some(timeout) = args.request_timeout_secs {
            self.images.request_timeout_secs = timeout;
        }
        if let Some(url) = args.reviews_url {
            self.source.reviews_url = Some(url);
        }
        if let Some(path) = args.fixture_path {
            self.source.fixture_path = Some(path);
        }
    }

    /// Options for the pagination controller.
    #[must_use]
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            page_size: self.pagination.page_size.max(1),
            scroll_trigger_screens: self.pagination.scroll_trigger_screens,
        }
    }

    /// Options for the image fetcher.
    #[must_use]
    pub fn image_fetcher_config(&self) -> ImageFetcherConfig {
        ImageFetcherConfig {
            cache_capacity: self.images.cache_capacity.max(1),
            max_concurrent_downloads: self.images.max_concurrent_downloads.max(1),
            timeout_secs: self.images.request_timeout_secs,
        }
    }

    /// Timeout applied to every HTTP request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.images.request_timeout_secs)
    }

    /// Returns default config directory.
    #[must_use]
    pub fn default_config_dir() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns default log file path.
    #[must_use]
    pub fn default_log_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.data_dir().join("review-feed.log"))
    }

    /// Returns effective log path.
    #[must_use]
    pub fn effective_log_path(&self) -> Option<PathBuf> {
        self.log_path.clone().or_else(Self::default_log_path)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config: None,
            log_path: None,
            log_level: LogLevel::Info,
            pagination: PaginationConfig::default(),
            images: ImagesConfig::default(),
            source: SourceConfig::default(),
        }
    }
}
