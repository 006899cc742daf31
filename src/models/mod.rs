// src/models/mod.rs

//! Domain models for the scraper.

mod config;
mod run_id;
mod share;

// Re-export all public types
pub use config::{ColumnMap, Config, FetcherConfig, LoggingConfig, OutputConfig, SourceConfig};
pub use run_id::RunId;
pub use share::{CSV_HEADER, Share};
