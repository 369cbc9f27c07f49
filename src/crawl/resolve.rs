// src/crawl/resolve.rs
// =============================================================================
// Turns the href/src values found in HTML into absolute URLs.
//
// Examples (base = "https://example.com/page"):
//   "/path"                   -> "https://example.com/path"
//   "other.html"              -> "https://example.com/other.html"
//   "//cdn.example.com/x.png" -> "https://cdn.example.com/x.png"
//   "https://other.com/a"     -> "https://other.com/a" (untouched)
//
// Only http and https URLs are useful to us. Callers drop anything else.
// =============================================================================

use url::Url;

/// Resolve `reference` against `base` the way a browser would.
///
/// Returns `None` when the reference cannot be resolved, for example when it
/// is relative and the base itself is not a valid URL.
pub fn resolve(base: &str, reference: &str) -> Option<String> {
    let reference = reference.trim();

    // Already absolute: hand it back exactly as written
    if Url::parse(reference).is_ok() {
        return Some(reference.to_string());
    }

    let base = Url::parse(base).ok()?;
    base.join(reference).ok().map(|url| url.to_string())
}

/// True if `url` is an absolute http or https URL with a host.
pub fn is_well_formed(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}
