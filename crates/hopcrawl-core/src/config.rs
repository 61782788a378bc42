//! Crawler configuration.
//!
//! Values are layered with figment: built-in defaults, then an optional TOML
//! file, then the two environment overrides `HOPCRAWL_BASE_URL` and
//! `HOPCRAWL_MAX_WORKERS`. Nothing else is read from the environment.

use std::path::Path;
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default neighbor service endpoint.
pub const DEFAULT_BASE_URL: &str = "http://hollywood-graph-crawler.bridgesuncc.org/neighbors/";

/// Default upper bound on concurrent workers per level.
pub const DEFAULT_MAX_WORKERS: usize = 8;

/// Default per-request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Default `User-Agent` header sent with every neighbor query.
pub const DEFAULT_USER_AGENT: &str = "Parallel-GraphCrawler/1.0";

/// Environment variable prefix for the allowed overrides.
pub const ENV_PREFIX: &str = "HOPCRAWL_";

/// Upper bound on `max_workers`; beyond this a level spawns more tasks than
/// any service would reasonably serve concurrently.
const MAX_WORKERS_LIMIT: usize = 1024;

/// Backend used for the shared visited set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisitedSetKind {
    /// One mutex around a hash set.
    #[default]
    Locked,
    /// Lock-sharded concurrent set.
    Sharded,
}

/// Configuration shared by the engines and the HTTP client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Base URL of the neighbor service; the encoded node id is appended.
    pub base_url: String,
    /// Maximum number of concurrent workers per level.
    pub max_workers: usize,
    /// Emit per-level progress at `info` level.
    pub verbose: bool,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Visited set backend.
    pub visited_set: VisitedSetKind,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_workers: DEFAULT_MAX_WORKERS,
            verbose: false,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            visited_set: VisitedSetKind::Locked,
        }
    }
}

impl CrawlerConfig {
    /// Creates a config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the layered figment without extracting it.
    #[must_use]
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).only(&["base_url", "max_workers"]))
    }

    /// Loads and validates configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value fails validation.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        if let Some(path) = config_file {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
        }
        let config: Self = Self::figment(config_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges and the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] or [`Error::InvalidBaseUrl`].
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(Error::Config(
                "max_workers must be at least 1".to_string(),
            ));
        }
        if self.max_workers > MAX_WORKERS_LIMIT {
            return Err(Error::Config(format!(
                "max_workers must be at most {MAX_WORKERS_LIMIT}, got {}",
                self.max_workers
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(Error::Config(
                "request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        self.parsed_base_url().map(|_| ())
    }

    /// Parses `base_url` and checks that node ids can be appended to it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBaseUrl`] if the URL does not parse, is not
    /// http(s), or cannot carry path segments.
    pub fn parsed_base_url(&self) -> Result<reqwest::Url> {
        let invalid = |reason: String| Error::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if url.cannot_be_a_base() {
            return Err(invalid("URL cannot carry path segments".to_string()));
        }
        Ok(url)
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Builder: set base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Builder: set maximum workers per level.
    #[must_use]
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    /// Builder: set verbosity.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Builder: set visited set backend.
    #[must_use]
    pub fn with_visited_set(mut self, kind: VisitedSetKind) -> Self {
        self.visited_set = kind;
        self
    }

    /// Builder: set request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }
}
