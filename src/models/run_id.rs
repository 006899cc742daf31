//! Run identifier: the "last updated" date read off the listing page.

use std::fmt;

use regex::Regex;

use crate::error::{AppError, Result};

/// Characters that would split the identifier into several path components.
const PATH_HOSTILE: [char; 3] = ['/', '\\', ':'];

/// Validated run identifier, used as the idempotence key and file stem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunId {
    raw: String,
}

impl RunId {
    /// Trim and validate raw text against the date-shaped `pattern`.
    pub fn parse(raw: &str, pattern: &Regex) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(AppError::run_id("identifier text is empty"));
        }
        if !pattern.is_match(raw) {
            return Err(AppError::run_id(format!(
                "'{raw}' does not look like a date (expected /{}/)",
                pattern.as_str()
            )));
        }
        Ok(Self {
            raw: raw.to_string(),
        })
    }

    /// The identifier as it appeared on the page.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// File stem safe to use as a single path component.
    pub fn file_stem(&self) -> String {
        self.raw
            .chars()
            .map(|c| if PATH_HOSTILE.contains(&c) { '-' } else { c })
            .collect()
    }

    /// Output file name, `<stem>.csv`.
    pub fn file_name(&self) -> String {
        format!("{}.csv", self.file_stem())
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
