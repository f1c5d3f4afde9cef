//! Vibe Crawler main entry point
//!
//! This is the command-line interface for the Vibe Crawler QA sweep.

use anyhow::{bail, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use vibe_crawler::config::{read_config_with_hash, Config, OutputFormat};
use vibe_crawler::crawler::crawl;
use vibe_crawler::output::{build_sinks, emit_all, ReportSink, TerminalSink};

/// Vibe Crawler: an automated first-pass QA sweep
///
/// Vibe Crawler visits the same-origin pages of a site in a headless
/// browser, runs a set of detectors on each page and reports what it finds
/// on the terminal and as JSON and HTML files.
#[derive(Parser, Debug)]
#[command(name = "vibe-crawler")]
#[command(version)]
#[command(about = "Automated first-pass QA sweep for websites", long_about = None)]
struct Cli {
    /// Start URL (overrides `start-url` from the config file)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum number of pages to visit
    #[arg(short = 'n', long)]
    max_pages: Option<usize>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Path of the JSON report; the HTML report goes next to it with an .html extension
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Which file reports to write
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Comma-separated list of detectors to run
    #[arg(short, long, value_delimiter = ',')]
    detectors: Option<Vec<String>>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_run_config(&cli)?;

    let stop = Arc::new(AtomicBool::new(false));
    spawn_interrupt_handler(Arc::clone(&stop));

    let result = crawl(&config, stop)
        .await
        .context("Crawl could not start")?;

    let mut sinks: Vec<Box<dyn ReportSink>> = vec![Box::new(TerminalSink)];
    sinks.extend(build_sinks(&config.output));

    let failed = emit_all(&sinks, &result);
    if !failed.is_empty() {
        bail!("Failed to write report(s): {}", failed.join(", "));
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("vibe_crawler=info,warn"),
            1 => EnvFilter::new("vibe_crawler=debug,info"),
            2 => EnvFilter::new("vibe_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads the config file (if any), applies command-line overrides and validates
fn load_run_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = read_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    apply_overrides(&mut config, cli);

    if config.crawler.start_url.is_empty() {
        bail!("No start URL given: pass one on the command line or set start-url in the config");
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Applies command-line values on top of the file configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(url) = &cli.url {
        config.crawler.start_url = url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if cli.headed {
        config.browser.headless = false;
    }
    if let Some(path) = &cli.output {
        config.output.json_path = path.clone();
        config.output.html_path = path.with_extension("html");
    }
    if let Some(format) = cli.format {
        config.output.format = format;
    }
    if let Some(detectors) = &cli.detectors {
        config.detectors.enabled = detectors
            .iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
    }
}

/// Sets `stop` on the first Ctrl-C; the crawl finishes its current page and reports
fn spawn_interrupt_handler(stop: Arc<AtomicBool>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            stop.store(true, Ordering::SeqCst);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overridden(args: &[&str]) -> Config {
        let cli = Cli::parse_from(std::iter::once("vibe-crawler").chain(args.iter().copied()));
        let mut config = Config::default();
        apply_overrides(&mut config, &cli);
        config
    }

    #[test]
    fn test_output_names_json_report_and_html_sibling() {
        let config = overridden(&["https://example.com", "--output", "bugs.json"]);
        assert_eq!(config.output.json_path, PathBuf::from("bugs.json"));
        assert_eq!(config.output.html_path, PathBuf::from("bugs.html"));

        let config = overridden(&["https://example.com", "-o", "out/site-report"]);
        assert_eq!(config.output.json_path, PathBuf::from("out/site-report"));
        assert_eq!(config.output.html_path, PathBuf::from("out/site-report.html"));
    }

    #[test]
    fn test_output_defaults_kept_without_flag() {
        let config = overridden(&["https://example.com"]);
        assert_eq!(config.output, Config::default().output);
    }

    #[test]
    fn test_other_overrides() {
        let config = overridden(&[
            "https://example.com",
            "--max-pages",
            "3",
            "--headed",
            "--format",
            "json",
            "--detectors",
            "meta_seo, overflow",
        ]);
        assert_eq!(config.crawler.start_url, "https://example.com");
        assert_eq!(config.crawler.max_pages, 3);
        assert!(!config.browser.headless);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.detectors.enabled, vec!["meta_seo", "overflow"]);
    }
}
