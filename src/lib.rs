// src/lib.rs
// =============================================================================
// crawler-collage library: the crawler, image downloader and collage maker
// behind the CLI in main.rs.
// =============================================================================

pub mod collage;
pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod images;
pub mod logging;
