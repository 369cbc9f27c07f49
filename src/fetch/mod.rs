// src/fetch/mod.rs
// =============================================================================
// This module downloads things from the web: HTML pages for the crawler and
// raw image bytes for the downloader.
//
// Every request is awaited on its own. Nothing here runs requests side by
// side, so the caller sees results in exactly the order it asked for them.
// =============================================================================

mod http;

pub use http::{FetchedBytes, Fetcher};
