//! Configuration module for Vibe Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use vibe_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("vibe-crawler.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, CrawlerConfig, DetectorsConfig, OutputConfig, OutputFormat,
    ViewportConfig,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, parse_config, read_config_with_hash,
};

impl Config {
    /// Checks every section, as `load_config` does
    pub fn validate(&self) -> crate::ConfigResult<()> {
        validation::validate(self)
    }
}
