//! Service layer for the scraper.
//!
//! This module contains the extraction logic:
//! - Page fetching capability (`PageFetcher`, `Page`)
//! - Numeric cell parsing (`CellParser`)
//! - Row to share extraction (`RowExtractor`)
//! - Listing pagination (`Paginator`)
//! - Run identifier lookup (`RunIdExtractor`)

mod cells;
mod page;
mod pagination;
mod rows;
mod run_id;

pub use cells::{CellError, CellFormat, CellParser};
pub use page::{Page, PageFetcher};
pub use pagination::{PageLink, Paginator, WalkSummary};
pub use rows::{RowError, RowExtractor};
pub use run_id::RunIdExtractor;

#[cfg(test)]
pub(crate) use page::testing;
