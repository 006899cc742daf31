// src/services/run_id.rs

//! Reads the run identifier off the listing page.

use regex::Regex;
use scraper::Selector;

use crate::error::{AppError, Result};
use crate::models::{RunId, SourceConfig};
use crate::services::page::Page;
use crate::utils::parse_selector;

/// Locates the "last updated" date in the listing page markup.
pub struct RunIdExtractor {
    cell: Selector,
    text_index: usize,
    pattern: Regex,
}

impl RunIdExtractor {
    pub fn from_config(source: &SourceConfig) -> Result<Self> {
        Ok(Self {
            cell: parse_selector(&source.run_id_selector)?,
            text_index: source.run_id_text_index,
            pattern: Regex::new(&source.run_id_pattern)?,
        })
    }

    /// The date text held by the configured text node.
    ///
    /// Text nodes are counted across every cell the selector matches, in
    /// document order, so the date may sit in a later cell than the first.
    pub fn extract(&self, listing: &Page) -> Result<RunId> {
        if listing.select_first(&self.cell).is_none() {
            return Err(AppError::run_id(format!(
                "no date cell on {}",
                listing.url()
            )));
        }

        let text = listing
            .select(&self.cell)
            .flat_map(|cell| cell.children())
            .filter_map(|node| node.value().as_text().map(|text| String::from(&**text)))
            .nth(self.text_index)
            .ok_or_else(|| {
                AppError::run_id(format!(
                    "date cells have no text node at index {}",
                    self.text_index
                ))
            })?;

        let run_id = RunId::parse(&text, &self.pattern)?;
        log::debug!("Run identifier: {}", run_id);
        Ok(run_id)
    }
}
