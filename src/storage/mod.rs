//! Flat-file storage for scraped shares.
//!
//! One CSV file per run identifier:
//!
//! ```text
//! ~/Documents/Share_Data/
//! ├── 10-16-2025.csv
//! └── 10-17-2025.csv
//! ```
//!
//! An existing file for a run identifier means that run is done; it is never
//! overwritten or appended to.

pub mod local;

// Re-export for convenience
pub use local::{CsvStore, ShareWriter};

/// What `ensure_dir` found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirStatus {
    Created,
    Existed,
}
