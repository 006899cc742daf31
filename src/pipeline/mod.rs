//! Pipeline entry points for scraper operations.
//!
//! - `Scraper::run`: Scrape the listing pages into a dated CSV file
//! - `run_validate`: Check the configuration

pub mod scrape;
pub mod validate;

pub use scrape::{RunOutcome, RunStats, Scraper};
pub use validate::run_validate;
