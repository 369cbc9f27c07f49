// src/config.rs
// =============================================================================
// One explicit settings record for the whole run.
//
// Settings come from three layers, later layers win:
// 1. Built-in defaults (the Default impls below)
// 2. An optional TOML file passed with --config
// 3. Command-line flags (applied in main.rs)
//
// The record is validated once, right after it is assembled, and then handed
// by reference to the fetcher, crawler, downloader and collage maker.
//
// Example config file:
//
//   [crawl]
//   page_limit = 10
//
//   [collage]
//   width = 1200
//   shuffle = true
// =============================================================================

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crawl::is_well_formed;
use crate::error::ConfigError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawl: CrawlConfig,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub collage: CollageConfig,
}

/// What to crawl and how far.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// First page of the traversal. Usually given on the command line.
    #[serde(default)]
    pub seed_url: Option<String>,

    /// Maximum number of successfully fetched pages
    #[serde(default = "defaults::page_limit")]
    pub page_limit: usize,

    /// Queue each URL at most once per run
    #[serde(default)]
    pub unique_links: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            seed_url: None,
            page_limit: defaults::page_limit(),
            unique_links: false,
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Where images are written and which ones are worth keeping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "defaults::folder")]
    pub folder: PathBuf,

    /// Images whose declared size is at or below this are skipped
    #[serde(default = "defaults::min_image_bytes")]
    pub min_image_bytes: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            folder: defaults::folder(),
            min_image_bytes: defaults::min_image_bytes(),
        }
    }
}

/// Collage geometry and output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollageConfig {
    /// Output file; the format follows the extension
    #[serde(default = "defaults::output")]
    pub output: PathBuf,

    #[serde(default = "defaults::width")]
    pub width: u32,

    /// Starting row height before rows get compacted
    #[serde(default = "defaults::init_height")]
    pub init_height: u32,

    #[serde(default)]
    pub shuffle: bool,

    /// How much the row height shrinks on each compaction pass
    #[serde(default = "defaults::row_height_step")]
    pub row_height_step: u32,

    /// Gap between images, horizontally and vertically
    #[serde(default = "defaults::margin")]
    pub margin: u32,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            output: defaults::output(),
            width: defaults::width(),
            init_height: defaults::init_height(),
            shuffle: false,
            row_height_step: defaults::row_height_step(),
            margin: defaults::margin(),
        }
    }
}

impl Config {
    /// Load settings from a TOML file. Missing sections and fields use defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Check every setting that the run depends on.
    ///
    /// `needs_seed` is false for the collage-only command, which never crawls.
    pub fn validate(&self, needs_seed: bool) -> Result<(), ConfigError> {
        if needs_seed {
            match self.crawl.seed_url.as_deref() {
                None => return Err(ConfigError::invalid("crawl.seed_url", "missing")),
                Some(url) if !is_well_formed(url) => {
                    return Err(ConfigError::invalid(
                        "crawl.seed_url",
                        format!("'{url}' is not an http(s) URL"),
                    ));
                }
                Some(_) => {}
            }
        }
        if self.crawl.page_limit == 0 {
            return Err(ConfigError::invalid("crawl.page_limit", "must be > 0"));
        }
        if self.fetch.user_agent.trim().is_empty() {
            return Err(ConfigError::invalid("fetch.user_agent", "is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::invalid("fetch.timeout_secs", "must be > 0"));
        }
        if self.collage.width == 0 {
            return Err(ConfigError::invalid("collage.width", "must be > 0"));
        }
        if self.collage.init_height == 0 {
            return Err(ConfigError::invalid("collage.init_height", "must be > 0"));
        }
        if self.collage.row_height_step == 0 {
            return Err(ConfigError::invalid("collage.row_height_step", "must be > 0"));
        }
        Ok(())
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn page_limit() -> usize {
        5
    }

    pub fn user_agent() -> String {
        concat!("crawler-collage/", env!("CARGO_PKG_VERSION")).to_string()
    }

    pub fn timeout() -> u64 {
        10
    }

    pub fn folder() -> PathBuf {
        PathBuf::from("./images")
    }

    pub fn min_image_bytes() -> u64 {
        100
    }

    pub fn output() -> PathBuf {
        PathBuf::from("collage.png")
    }

    pub fn width() -> u32 {
        1000
    }

    pub fn init_height() -> u32 {
        25
    }

    pub fn row_height_step() -> u32 {
        10
    }

    pub fn margin() -> u32 {
        2
    }
}
