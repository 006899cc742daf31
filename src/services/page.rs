// src/services/page.rs

//! Fetched pages and the capability that produces them.

use scraper::html::Select;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::Result;

/// A parsed HTML document and the URL it was fetched from.
///
/// Pages are owned values; dropping one releases its document tree.
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    /// Parse `html` as the document found at `url`.
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// All elements matching `selector`, in document order.
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.document.select(selector)
    }

    /// First element matching `selector`.
    pub fn select_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.document.select(selector).next()
    }
}

/// Retrieves and parses pages.
///
/// Injected into the scraper so tests can serve canned HTML.
pub trait PageFetcher {
    fn fetch(&self, url: &Url) -> Result<Page>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &F {
    fn fetch(&self, url: &Url) -> Result<Page> {
        (**self).fetch(url)
    }
}
