// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first traversal starting from a seed URL
// - Stops after a fixed number of successfully fetched pages
// - Collects every image reference it sees, first name wins
// - Unreachable pages are skipped and do not count toward the limit
//
// Submodules:
// - resolve: turns relative references into absolute http(s) URLs
// - page: pulls links and images out of one fetched page
// - queue: the traversal state and the loop that drives it
// =============================================================================

mod page;
mod queue;
mod resolve;

pub use page::Page;
pub use queue::{visit_multiple_pages, visit_next, CrawlState, VisitOutcome};
pub use resolve::{is_well_formed, resolve};
