//! Utility functions and helpers.

pub mod http;

use std::env;
use std::path::PathBuf;

use scraper::Selector;
use url::Url;

use crate::error::{AppError, Result};

/// Resolve a potentially relative `href` against the page it appeared on.
pub fn resolve_url(base: &Url, href: &str) -> Result<Url> {
    Ok(base.join(href)?)
}

/// Compile a CSS selector.
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// `~/Documents/Share_Data` for the invoking user.
pub fn default_output_dir() -> Result<PathBuf> {
    let home = env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .ok_or_else(|| AppError::config("cannot locate home directory; set output.dir"))?;
    Ok(PathBuf::from(home).join("Documents").join("Share_Data"))
}
