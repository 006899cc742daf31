// src/services/cells.rs

//! Numeric cell parsing.
//!
//! The components table renders prices as plain text with thousands
//! separators, and percentage deltas inside a styled `span`.

use scraper::{ElementRef, Selector};
use thiserror::Error;

/// Grouping separator removed from prices.
const GROUPING_SEPARATOR: char = ',';

/// How a numeric value is laid out inside its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellFormat {
    /// Text of the cell's first child, with grouping separators
    Grouped,
    /// Text of the first nested span
    Span,
}

/// A cell that does not hold a usable number.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CellError {
    #[error("cell has no content")]
    Empty,

    #[error("cell has no nested span")]
    MissingSpan,

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not a finite number")]
    NotFinite(String),
}

/// Reads numbers out of table cells.
pub struct CellParser {
    span: Selector,
}

impl CellParser {
    /// `span` selects the styled element of [`CellFormat::Span`] cells.
    pub fn new(span: Selector) -> Self {
        Self { span }
    }

    /// Parse the number held by `cell`.
    pub fn parse(&self, cell: ElementRef<'_>, format: CellFormat) -> Result<f64, CellError> {
        let text = match format {
            CellFormat::Grouped => first_child_text(cell)?.replace(GROUPING_SEPARATOR, ""),
            CellFormat::Span => cell
                .select(&self.span)
                .next()
                .ok_or(CellError::MissingSpan)?
                .text()
                .collect::<String>(),
        };
        parse_number(&text)
    }
}

/// Text content of the first child node, whether text or element.
fn first_child_text(cell: ElementRef<'_>) -> Result<String, CellError> {
    let child = cell.first_child().ok_or(CellError::Empty)?;
    match ElementRef::wrap(child) {
        Some(element) => Ok(element.text().collect()),
        None => child
            .value()
            .as_text()
            .map(|text| String::from(&**text))
            .ok_or(CellError::Empty),
    }
}

fn parse_number(text: &str) -> Result<f64, CellError> {
    let trimmed = text.trim();
    let value: f64 = trimmed
        .parse()
        .map_err(|_| CellError::NotANumber(trimmed.to_string()))?;
    if !value.is_finite() {
        return Err(CellError::NotFinite(trimmed.to_string()));
    }
    Ok(value)
}
