// src/crawl/page.rs
// =============================================================================
// Everything the crawler learns from one page: its outbound links and the
// images it references.
//
// Page::fetch always hands back a Page. When the download fails the page is
// empty and remembers why (could_not_visit / into_failure), so the crawler
// branches on the result instead of catching anything.
// =============================================================================

use scraper::{Html, Selector};

use super::resolve::{is_well_formed, resolve};
use crate::error::FetchError;
use crate::fetch::Fetcher;
use crate::images::{is_unnamed, ImageRecord};

#[derive(Debug)]
pub struct Page {
    url: String,
    links: Vec<String>,
    // (absolute image URL, raw alt text) in document order
    image_refs: Vec<(String, String)>,
    failure: Option<FetchError>,
}

impl Page {
    /// Download `url` and parse it. A failed download gives an empty page.
    pub async fn fetch(fetcher: &Fetcher, url: &str) -> Self {
        match fetcher.fetch_page(url).await {
            Ok(html) => Self::parse(url, &html),
            Err(error) => Self::unreachable(url, error),
        }
    }

    /// Extract links and image references from the HTML of `url`.
    pub fn parse(url: &str, html: &str) -> Self {
        let document = Html::parse_document(html);

        // Both selectors are constants, so parsing them cannot fail
        let link_selector = Selector::parse("a[href]").unwrap();
        let image_selector = Selector::parse("img[src]").unwrap();

        let links = document
            .select(&link_selector)
            .filter_map(|element| element.value().attr("href"))
            .filter_map(|href| resolve(url, href))
            .filter(|link| is_well_formed(link))
            .collect();

        let image_refs = document
            .select(&image_selector)
            .filter_map(|element| {
                let src = element.value().attr("src")?;
                let absolute = resolve(url, src).filter(|u| is_well_formed(u))?;
                let alt = element.value().attr("alt").unwrap_or_default();
                Some((absolute, alt.to_string()))
            })
            .collect();

        Self {
            url: url.to_string(),
            links,
            image_refs,
            failure: None,
        }
    }

    /// A page whose fetch failed: no links, no images.
    pub fn unreachable(url: &str, error: FetchError) -> Self {
        Self {
            url: url.to_string(),
            links: Vec::new(),
            image_refs: Vec::new(),
            failure: Some(error),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Every anchor on the page, resolved, in document order.
    ///
    /// Duplicates are kept; the crawler decides whether to drop them.
    pub fn links(&self) -> &[String] {
        &self.links
    }

    /// Build an ImageRecord for every usable image on the page.
    ///
    /// Images without a usable alt text are numbered starting at
    /// `starting_ordinal`, one after another in document order.
    pub fn images(&self, starting_ordinal: usize) -> Vec<ImageRecord> {
        let mut next_ordinal = starting_ordinal;

        self.image_refs
            .iter()
            .map(|(url, alt)| {
                let ordinal = if is_unnamed(alt) {
                    next_ordinal += 1;
                    Some(next_ordinal - 1)
                } else {
                    None
                };
                ImageRecord::new(url.as_str(), alt.as_str(), ordinal)
            })
            .collect()
    }

    pub fn could_not_visit(&self) -> bool {
        self.failure.is_some()
    }

    /// Why the page could not be visited, if it could not.
    pub fn into_failure(self) -> Option<FetchError> {
        self.failure
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTRO_PAGE: &str = r#"
        <html><body>
            <a href="one.html">One</a>
            <a href="two.two.html">Two</a>
            <a href="/three.html">Three</a>
            <a href="https://www.youtube.com/watch?v=WSeNSzJ2-Jw">Video</a>
            <a href="http://www.intro-webdesign.com/">WD4E</a>
            <a href="mailto:someone@example.com">Mail</a>
            <a>No href</a>
            <img src="http://www.intro-webdesign.com/images/newlogo.png" alt="WD4E">
        </body></html>
    "#;

    #[test]
    fn test_links_resolved_in_document_order() {
        let page = Page::parse("http://rknightly.github.io/introHtml.html", INTRO_PAGE);
        assert_eq!(
            page.links(),
            &[
                "http://rknightly.github.io/one.html",
                "http://rknightly.github.io/two.two.html",
                "http://rknightly.github.io/three.html",
                "https://www.youtube.com/watch?v=WSeNSzJ2-Jw",
                "http://www.intro-webdesign.com/",
            ]
        );
        assert!(!page.could_not_visit());
    }

    #[test]
    fn test_single_named_image() {
        let page = Page::parse("http://rknightly.github.io/introHtml.html", INTRO_PAGE);
        let images = page.images(0);
        assert_eq!(
            images,
            vec![ImageRecord::new(
                "http://www.intro-webdesign.com/images/newlogo.png",
                "WD4E",
                None
            )]
        );
        assert_eq!(images[0].file_name, "WD4E.jpeg");
    }

    #[test]
    fn test_duplicate_links_are_kept() {
        let html = r#"<a href="/a">1</a><a href="/a">2</a>"#;
        let page = Page::parse("https://example.com/", html);
        assert_eq!(page.links().len(), 2);
    }

    #[test]
    fn test_unnamed_ordinals_increase_per_page() {
        let html = r#"
            <img src="/a.png">
            <img src="/b.png" alt="Named picture">
            <img src="/c.png" alt="x">
            <img src="data:image/png;base64,AAAA" alt="">
        "#;
        let page = Page::parse("https://example.com/", html);
        let images = page.images(4);

        // The data: URL is dropped, the rest keep document order
        assert_eq!(images.len(), 3);
        assert_eq!(images[0].unnamed_ordinal, Some(4));
        assert_eq!(images[0].file_name, "unnamed_img_4.jpeg");
        assert_eq!(images[1].unnamed_ordinal, None);
        assert_eq!(images[1].file_name, "Named_picture.jpeg");
        assert_eq!(images[2].unnamed_ordinal, Some(5));
        assert_eq!(images[2].file_name, "unnamed_img_5.jpeg");
    }

    #[test]
    fn test_unreachable_page_is_empty() {
        let error = FetchError::Timeout {
            url: "https://example.com/down".to_string(),
        };
        let page = Page::unreachable("https://example.com/down", error);
        assert!(page.could_not_visit());
        assert!(page.links().is_empty());
        assert!(page.images(0).is_empty());
        assert_eq!(page.url(), "https://example.com/down");
        assert!(matches!(page.into_failure(), Some(FetchError::Timeout { .. })));
    }
}
