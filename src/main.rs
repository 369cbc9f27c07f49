// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Build one Config: defaults, then the --config file, then flags
// 3. Dispatch to the handler for the subcommand
// 4. Print a summary and exit with a proper code
//    (0 = success, 1 = no collage could be made, 2 = error)
//
// Pages and images are fetched one at a time, in discovery order. The tokio
// runtime is only there so the HTTP client can await responses.
// =============================================================================

mod cli;
mod report;

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use rand::seq::SliceRandom;

use crawler_collage::config::Config;
use crawler_collage::crawl::{visit_multiple_pages, CrawlState};
use crawler_collage::error::CollageError;
use crawler_collage::fetch::Fetcher;
use crawler_collage::images::{self, Downloader};
use crawler_collage::{collage, logging};

use cli::{Cli, Commands};
use report::{print_report, CrawlSummary, RunReport};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // If an unexpected error occurred, print it and exit with code 2
            eprintln!("Error: {e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Crawl { url, crawl, json } => {
            crawl.apply(&url, &mut config);
            config.validate(true)?;

            let mut report = RunReport::default();
            crawl_and_download(&config, &mut report).await?;
            print_report(&report, json)?;
            Ok(0)
        }
        Commands::Collage {
            folder,
            collage,
            json,
        } => {
            if let Some(folder) = folder {
                config.download.folder = folder;
            }
            collage.apply(&mut config);
            config.validate(false)?;

            let mut report = RunReport::default();
            let code = build_collage(&config, &mut report)?;
            print_report(&report, json)?;
            Ok(code)
        }
        Commands::Run {
            url,
            crawl,
            collage,
            json,
        } => {
            crawl.apply(&url, &mut config);
            collage.apply(&mut config);
            config.validate(true)?;

            let mut report = RunReport::default();
            crawl_and_download(&config, &mut report).await?;
            let code = build_collage(&config, &mut report)?;
            print_report(&report, json)?;
            Ok(code)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let config = Config::load(path)?;
            info!("Loaded settings from {}", path.display());
            Ok(config)
        }
        None => Ok(Config::default()),
    }
}

// Crawl from the seed, then download everything that was found
async fn crawl_and_download(config: &Config, report: &mut RunReport) -> Result<()> {
    let seed_url = config
        .crawl
        .seed_url
        .clone()
        .context("no seed URL to crawl from")?;

    let fetcher = Fetcher::new(&config.fetch)?;

    // Clear the folder before crawling so a bad path fails fast
    let mut downloader = Downloader::new(&fetcher, &config.download);
    downloader
        .prepare()
        .with_context(|| format!("could not prepare {}", config.download.folder.display()))?;

    let state = if config.crawl.unique_links {
        CrawlState::with_unique_links(seed_url.as_str())
    } else {
        CrawlState::new(seed_url.as_str())
    };
    let state = visit_multiple_pages(state, &fetcher, config.crawl.page_limit).await;

    report.crawl = Some(CrawlSummary {
        seed_url,
        pages_visited: state.visited(),
        images_found: state.images().len(),
        still_queued: state.pending().len(),
    });

    let images = state.into_images();
    let download = downloader.download_all(&images).await;
    report.download = Some(download);
    Ok(())
}

// Returns the exit code: 1 when there was nothing to make a collage from
fn build_collage(config: &Config, report: &mut RunReport) -> Result<i32> {
    let folder = &config.download.folder;
    let mut paths = images::list_images(folder)
        .with_context(|| format!("could not read {}", folder.display()))?;

    if config.collage.shuffle {
        paths.shuffle(&mut rand::rng());
    }

    info!("Making collage from {} image(s)...", paths.len());
    match collage::make_collage(&paths, &config.collage.output, &config.collage) {
        Ok(summary) => {
            report.collage = Some(summary);
            Ok(0)
        }
        Err(e @ (CollageError::NoImages | CollageError::ZeroHeight)) => {
            error!("Making collage failed: {e}");
            report.collage_error = Some(e.to_string());
            Ok(1)
        }
        Err(e) => Err(e.into()),
    }
}
