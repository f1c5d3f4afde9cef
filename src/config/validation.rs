use crate::config::types::{BrowserConfig, Config, CrawlerConfig, DetectorsConfig, OutputConfig};
use crate::detectors::DetectorKind;
use crate::url::normalize_url;
use crate::ConfigError;
use std::collections::HashSet;

/// Smallest accepted navigation or link-check timeout (milliseconds)
const MIN_TIMEOUT_MS: u64 = 100;

/// Largest accepted viewport side (pixels)
const MAX_VIEWPORT_SIDE: u32 = 10_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_browser_config(&config.browser)?;
    validate_detectors_config(&config.detectors)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.start_url.trim().is_empty() {
        return Err(ConfigError::Validation(
            "start-url is required (pass a URL or set [crawler] start-url)".to_string(),
        ));
    }

    normalize_url(&config.start_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start-url: {}", e)))?;

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.navigation_timeout_ms < MIN_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "navigation-timeout-ms must be >= {}ms, got {}ms",
            MIN_TIMEOUT_MS, config.navigation_timeout_ms
        )));
    }

    if config.link_check_timeout_ms < MIN_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "link-check-timeout-ms must be >= {}ms, got {}ms",
            MIN_TIMEOUT_MS, config.link_check_timeout_ms
        )));
    }

    if config.max_errors < 1 {
        return Err(ConfigError::Validation(format!(
            "max-errors must be >= 1, got {}",
            config.max_errors
        )));
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    for (side, value) in [
        ("width", config.viewport.width),
        ("height", config.viewport.height),
    ] {
        if value < 1 || value > MAX_VIEWPORT_SIDE {
            return Err(ConfigError::Validation(format!(
                "viewport {} must be between 1 and {}, got {}",
                side, MAX_VIEWPORT_SIDE, value
            )));
        }
    }

    if config.event_buffer_capacity < 1 {
        return Err(ConfigError::Validation(
            "event-buffer-capacity must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates the detector list: known names, no repeats
fn validate_detectors_config(config: &DetectorsConfig) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();

    for name in &config.enabled {
        if DetectorKind::from_name(name).is_none() {
            let known: Vec<&str> = DetectorKind::all().iter().map(|k| k.name()).collect();
            return Err(ConfigError::Validation(format!(
                "unknown detector '{}' (known: {})",
                name,
                known.join(", ")
            )));
        }

        if !seen.insert(name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "detector '{}' is listed more than once",
                name
            )));
        }
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.json_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("json-path cannot be empty".to_string()));
    }

    if config.html_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("html-path cannot be empty".to_string()));
    }

    Ok(())
}
