// src/services/pagination.rs

//! Listing page pagination.
//!
//! The listing shows a fixed number of pages; links are looked up by their
//! exact `href` on the first page rather than followed until exhaustion.

use scraper::Selector;
use url::Url;

use crate::error::Result;
use crate::models::SourceConfig;
use crate::services::page::{Page, PageFetcher};
use crate::utils::{parse_selector, resolve_url};

/// A pagination link found on the listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    /// 1-based page number
    pub page: u32,
    /// Absolute destination
    pub url: Url,
}

/// Counts from one pass over the listing pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkSummary {
    pub visited: usize,
    pub missing: usize,
}

/// Finds and opens the listing pages.
pub struct Paginator {
    anchors: Vec<(u32, Selector)>,
}

impl Paginator {
    /// Compile one anchor selector per page, `1..=page_count`.
    pub fn from_config(source: &SourceConfig) -> Result<Self> {
        let anchors = (1..=source.page_count)
            .map(|page| parse_selector(&source.page_link_selector(page)).map(|sel| (page, sel)))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { anchors })
    }

    pub fn page_count(&self) -> usize {
        self.anchors.len()
    }

    /// Look up the link to every page on `listing`.
    ///
    /// Entry `i` holds the link to page `i + 1`, or `None` when the listing
    /// has no such anchor.
    pub fn list_page_links(&self, listing: &Page) -> Result<Vec<Option<PageLink>>> {
        self.anchors
            .iter()
            .map(|(page, selector)| {
                listing
                    .select_first(selector)
                    .and_then(|anchor| anchor.value().attr("href"))
                    .map(|href| {
                        resolve_url(listing.url(), href).map(|url| PageLink { page: *page, url })
                    })
                    .transpose()
            })
            .collect()
    }

    /// Open each present link in turn and hand the page to `visit`.
    ///
    /// A page is dropped before the next one is fetched. Missing links are
    /// skipped; a failed fetch or a failing `visit` ends the walk.
    pub fn walk<F, V>(
        &self,
        fetcher: &F,
        links: &[Option<PageLink>],
        mut visit: V,
    ) -> Result<WalkSummary>
    where
        F: PageFetcher + ?Sized,
        V: FnMut(&PageLink, &Page) -> Result<()>,
    {
        let mut summary = WalkSummary::default();

        for (position, link) in links.iter().enumerate() {
            let Some(link) = link else {
                log::warn!("Link to page {} not found, skipping", position + 1);
                summary.missing += 1;
                continue;
            };

            log::info!("Reading page {} ({})", link.page, link.url);
            let page = fetcher.fetch(&link.url)?;
            visit(link, &page)?;
            summary.visited += 1;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::page::testing::StaticFetcher;

    const BASE: &str = "https://shares.test/index";

    fn url(page: u32) -> String {
        format!("{BASE}?p={page}")
    }

    fn listing_with_links(pages: &[u32]) -> Page {
        let anchors: String = pages
            .iter()
            .map(|p| format!("<a href=\"?p={p}\">{p}</a>"))
            .collect();
        Page::parse(
            Url::parse(&url(1)).unwrap(),
            &format!("<html><body><nav>{anchors}</nav></body></html>"),
        )
    }

    fn paginator(page_count: u32) -> Paginator {
        let source = SourceConfig {
            page_count,
            ..SourceConfig::default()
        };
        Paginator::from_config(&source).unwrap()
    }

    #[test]
    fn test_all_links_present() {
        let links = paginator(3)
            .list_page_links(&listing_with_links(&[1, 2, 3]))
            .unwrap();

        assert_eq!(links.len(), 3);
        let link = links[1].as_ref().unwrap();
        assert_eq!(link.page, 2);
        assert_eq!(link.url.as_str(), url(2));
    }

    #[test]
    fn test_missing_links_are_none() {
        let links = paginator(10)
            .list_page_links(&listing_with_links(&[1, 2, 3, 4]))
            .unwrap();

        assert_eq!(links.len(), 10);
        assert!(links[..4].iter().all(Option::is_some));
        assert!(links[4..].iter().all(Option::is_none));
    }

    #[test]
    fn test_exact_href_match() {
        // "?p=10" must not satisfy the lookup for page 1
        let links = paginator(1)
            .list_page_links(&listing_with_links(&[10]))
            .unwrap();
        assert_eq!(links, vec![None]);
    }

    #[test]
    fn test_walk_skips_missing() {
        let fetcher = StaticFetcher::new()
            .with_page(&url(1), "<p>one</p>")
            .with_page(&url(2), "<p>two</p>");
        let paginator = paginator(10);
        let links = paginator
            .list_page_links(&listing_with_links(&[1, 2]))
            .unwrap();

        let mut seen = Vec::new();
        let summary = paginator
            .walk(&fetcher, &links, |link, _page| {
                seen.push(link.page);
                Ok(())
            })
            .unwrap();

        assert_eq!(seen, vec![1, 2]);
        assert_eq!(summary, WalkSummary { visited: 2, missing: 8 });
        assert_eq!(fetcher.requests(), vec![url(1), url(2)]);
    }

    #[test]
    fn test_walk_stops_on_fetch_error() {
        let fetcher = StaticFetcher::new().with_page(&url(1), "<p>one</p>");
        let paginator = paginator(3);
        let links = paginator
            .list_page_links(&listing_with_links(&[1, 2, 3]))
            .unwrap();

        let result = paginator.walk(&fetcher, &links, |_, _| Ok(()));

        assert!(matches!(result, Err(AppError::Fetch { .. })));
        assert_eq!(fetcher.requests(), vec![url(1), url(2)]);
    }
}
