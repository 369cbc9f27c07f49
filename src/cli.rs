// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Three subcommands:
// - crawl:   visit pages from a seed URL and download the images found
// - collage: pack the images of a folder into one picture
// - run:     both, one after the other
//
// Every flag is optional on top of the config file: a flag that is not given
// leaves the config (or default) value alone.
// =============================================================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crawler_collage::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "crawler-collage",
    version,
    about = "Crawl a website for images and turn them into a collage",
    long_about = "crawler-collage visits pages breadth-first from a seed URL, downloads the \
                  images it finds (skipping tiny and duplicate ones) and can pack them into \
                  a single collage picture."
)]
pub struct Cli {
    /// TOML file with default settings
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl from a seed URL and download the images
    ///
    /// Example: crawler-collage crawl https://example.com --pages 10
    Crawl {
        /// Page to start from
        url: String,

        #[command(flatten)]
        crawl: CrawlArgs,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Make a collage from a folder of images
    ///
    /// Example: crawler-collage collage --folder ./images --width 1200 --shuffle
    Collage {
        /// Folder with .jpg, .jpeg and .png files
        #[arg(short, long)]
        folder: Option<PathBuf>,

        #[command(flatten)]
        collage: CollageArgs,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Crawl, download, then make a collage of the downloaded images
    Run {
        /// Page to start from
        url: String,

        #[command(flatten)]
        crawl: CrawlArgs,

        #[command(flatten)]
        collage: CollageArgs,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct CrawlArgs {
    /// Maximum number of pages to visit [default: 5]
    #[arg(short, long)]
    pub pages: Option<usize>,

    /// Folder to download images into (emptied first) [default: ./images]
    #[arg(short, long)]
    pub folder: Option<PathBuf>,

    /// Queue each link at most once
    #[arg(long)]
    pub unique_links: bool,

    /// Skip images whose declared size is at or below this many bytes [default: 100]
    #[arg(long)]
    pub min_bytes: Option<u64>,
}

#[derive(Args, Debug, Default)]
pub struct CollageArgs {
    /// Collage file to write; format follows the extension [default: collage.png]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Collage width in pixels [default: 1000]
    #[arg(short, long)]
    pub width: Option<u32>,

    /// Starting row height in pixels [default: 25]
    #[arg(short = 'i', long)]
    pub init_height: Option<u32>,

    /// Shuffle the images before packing
    #[arg(short, long)]
    pub shuffle: bool,
}

impl CrawlArgs {
    pub fn apply(&self, url: &str, config: &mut Config) {
        config.crawl.seed_url = Some(url.to_string());
        if let Some(pages) = self.pages {
            config.crawl.page_limit = pages;
        }
        if let Some(folder) = &self.folder {
            config.download.folder = folder.clone();
        }
        if self.unique_links {
            config.crawl.unique_links = true;
        }
        if let Some(min_bytes) = self.min_bytes {
            config.download.min_image_bytes = min_bytes;
        }
    }
}

impl CollageArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.collage.output = output.clone();
        }
        if let Some(width) = self.width {
            config.collage.width = width;
        }
        if let Some(init_height) = self.init_height {
            config.collage.init_height = init_height;
        }
        if self.shuffle {
            config.collage.shuffle = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_crawl() {
        let cli = Cli::parse_from([
            "crawler-collage",
            "crawl",
            "https://example.com",
            "--pages",
            "3",
            "--unique-links",
        ]);
        match cli.command {
            Commands::Crawl { url, crawl, json } => {
                assert_eq!(url, "https://example.com");
                assert_eq!(crawl.pages, Some(3));
                assert!(crawl.unique_links);
                assert!(!json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_run_with_global_flags() {
        let cli = Cli::parse_from([
            "crawler-collage",
            "run",
            "https://example.com",
            "--width",
            "800",
            "--shuffle",
            "-v",
            "--config",
            "settings.toml",
        ]);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("settings.toml")));
        assert!(matches!(cli.command, Commands::Run { .. }));
    }

    #[test]
    fn test_flags_override_config() {
        let mut config = Config::default();
        config.collage.width = 640;

        let crawl = CrawlArgs {
            pages: Some(2),
            ..CrawlArgs::default()
        };
        crawl.apply("https://example.com", &mut config);
        CollageArgs::default().apply(&mut config);

        assert_eq!(config.crawl.seed_url.as_deref(), Some("https://example.com"));
        assert_eq!(config.crawl.page_limit, 2);
        // Flags that were not given keep the config value
        assert_eq!(config.collage.width, 640);
        assert_eq!(config.download.min_image_bytes, 100);
    }
}
