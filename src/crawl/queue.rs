// src/crawl/queue.rs
// =============================================================================
// Breadth-first traversal with an explicit state value.
//
// How it works:
// 1. The seed URL is the only entry in the pending queue
// 2. visit_next pops the front URL, fetches it and parses it into a Page
// 3. The page's links go to the back of the queue, its images are merged
//    into the collection (a name that is already taken is ignored)
// 4. Only pages that were actually fetched count as visited
// 5. visit_multiple_pages repeats until the page limit is reached or the
//    queue runs dry
//
// Links are not deduplicated unless CrawlState::with_unique_links is used,
// so the same URL can be queued and visited more than once.
// =============================================================================

use std::collections::{HashSet, VecDeque};

use log::{debug, info, warn};
use url::Url;

use super::page::Page;
use super::resolve::is_well_formed;
use crate::error::FetchError;
use crate::fetch::Fetcher;
use crate::images::ImageRecord;

/// Everything the crawler has learned so far.
#[derive(Debug, Clone, Default)]
pub struct CrawlState {
    pending: VecDeque<String>,
    visited: usize,
    images: Vec<ImageRecord>,
    image_names: HashSet<String>,
    next_unnamed_ordinal: usize,
    // Present only when links are deduplicated
    seen_links: Option<HashSet<String>>,
}

/// What a single call to `visit_next` did.
#[derive(Debug)]
pub enum VisitOutcome {
    /// The page was fetched and merged
    Visited {
        url: String,
        new_links: usize,
        new_images: usize,
    },
    /// The fetch failed; nothing was merged and the visit does not count
    Unreachable { url: String, error: FetchError },
    /// The URL was not an http(s) URL and was dropped
    Skipped { url: String },
    /// The queue was empty: no page visited
    Exhausted,
}

impl CrawlState {
    /// Start a traversal at `seed_url`.
    ///
    /// The seed is normalised the same way discovered links are, so
    /// `http://host` and a later link to `/` name the same entry.
    pub fn new(seed_url: impl Into<String>) -> Self {
        let mut pending = VecDeque::new();
        pending.push_back(normalize(seed_url.into()));
        Self {
            pending,
            ..Self::default()
        }
    }

    /// Like `new`, but every URL is queued at most once.
    pub fn with_unique_links(seed_url: impl Into<String>) -> Self {
        let mut state = Self::new(seed_url);
        state.seen_links = Some(state.pending.iter().cloned().collect());
        state
    }

    pub fn pending(&self) -> &VecDeque<String> {
        &self.pending
    }

    pub fn visited(&self) -> usize {
        self.visited
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn into_images(self) -> Vec<ImageRecord> {
        self.images
    }

    /// Fold one page's findings into the state.
    ///
    /// Returns how many links were queued and how many images were kept.
    /// Does not touch the visit counter.
    pub fn merge_page(&mut self, page: &Page) -> (usize, usize) {
        let mut new_links = 0;
        for link in page.links() {
            if let Some(seen) = self.seen_links.as_mut() {
                if !seen.insert(link.clone()) {
                    continue;
                }
            }
            self.pending.push_back(link.clone());
            new_links += 1;
        }

        let page_images = page.images(self.next_unnamed_ordinal);
        self.next_unnamed_ordinal += page_images
            .iter()
            .filter(|image| image.unnamed_ordinal.is_some())
            .count();

        let mut new_images = 0;
        for image in page_images {
            // First record with a given file name wins
            if self.image_names.insert(image.file_name.clone()) {
                self.images.push(image);
                new_images += 1;
            } else {
                debug!("Ignoring duplicate image name {} on {}", image.file_name, page.url());
            }
        }

        (new_links, new_images)
    }
}

// Urls that do not parse are kept as typed; visit_next drops them later
fn normalize(url: String) -> String {
    match Url::parse(url.trim()) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => url,
    }
}

/// Visit the page at the front of the queue.
pub async fn visit_next(state: &mut CrawlState, fetcher: &Fetcher) -> VisitOutcome {
    let Some(url) = state.pending.pop_front() else {
        return VisitOutcome::Exhausted;
    };

    if !is_well_formed(&url) {
        debug!("Skipping malformed URL {url}");
        return VisitOutcome::Skipped { url };
    }

    info!("Visiting [{}] {}", state.visited + 1, url);

    let page = Page::fetch(fetcher, &url).await;
    let (new_links, new_images) = state.merge_page(&page);

    if let Some(error) = page.into_failure() {
        warn!("Could not visit {url}: {error}");
        return VisitOutcome::Unreachable { url, error };
    }

    state.visited += 1;
    debug!("{url}: {new_links} link(s) queued, {new_images} image(s) kept");

    VisitOutcome::Visited {
        url,
        new_links,
        new_images,
    }
}

/// Keep visiting until `page_limit` pages were fetched or the queue is empty.
pub async fn visit_multiple_pages(
    mut state: CrawlState,
    fetcher: &Fetcher,
    page_limit: usize,
) -> CrawlState {
    while state.visited < page_limit {
        if let VisitOutcome::Exhausted = visit_next(&mut state, fetcher).await {
            info!("No more pages to visit");
            break;
        }
    }

    info!(
        "Crawl finished: {} page(s) visited, {} image(s) found, {} URL(s) still queued",
        state.visited,
        state.images.len(),
        state.pending.len()
    );
    state
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is the state a struct instead of globals?
//    - Everything the crawl knows lives in one CrawlState value
//    - visit_next borrows it mutably (&mut), visit_multiple_pages takes it
//      by value and hands it back, so ownership shows who may change it
//
// 2. What is let-else?
//    - let Some(url) = queue.pop_front() else { return ... };
//    - Binds the value if the pattern matches, otherwise runs the else
//      block, which must leave the function
//
// 3. Why Option<HashSet<String>> for seen links?
//    - None means "do not deduplicate links", Some(set) means "do"
//    - One field covers both modes without a separate bool
// -----------------------------------------------------------------------------
