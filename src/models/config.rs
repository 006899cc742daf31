//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::utils::{default_output_dir, parse_selector};

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client settings
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Where the listing lives and how its markup is queried
    #[serde(default)]
    pub source: SourceConfig,

    /// Column role to table index mapping
    #[serde(default)]
    pub columns: ColumnMap,

    /// CSV output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Directory the CSV files are written to.
    pub fn output_dir(&self) -> Result<PathBuf> {
        match &self.output.dir {
            Some(dir) => Ok(dir.clone()),
            None => default_output_dir(),
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetcher.user_agent is empty"));
        }

        Url::parse(&self.source.listing_url)?;
        if self.source.page_count == 0 {
            return Err(AppError::validation("source.page_count must be > 0"));
        }
        if !self.source.page_link_template.contains("{page}") {
            return Err(AppError::validation(
                "source.page_link_template must contain {page}",
            ));
        }
        for selector in [
            &self.source.row_selector,
            &self.source.cell_selector,
            &self.source.name_selector,
            &self.source.span_selector,
            &self.source.run_id_selector,
        ] {
            parse_selector(selector)?;
        }
        parse_selector(&self.source.page_link_selector(1))?;
        Regex::new(&self.source.run_id_pattern)?;

        self.columns.validate()?;
        Ok(())
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds (0 waits indefinitely)
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Accept invalid TLS certificates
    #[serde(default = "defaults::accept_invalid_certs")]
    pub accept_invalid_certs: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            accept_invalid_certs: defaults::accept_invalid_certs(),
        }
    }
}

/// Listing page location and markup selectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of the first listing page
    #[serde(default = "defaults::listing_url")]
    pub listing_url: String,

    /// Number of listing pages to visit
    #[serde(default = "defaults::page_count")]
    pub page_count: u32,

    /// Exact `href` of a pagination anchor; `{page}` is the page number
    #[serde(default = "defaults::page_link_template")]
    pub page_link_template: String,

    /// Selector for each table row on a listing page
    #[serde(default = "defaults::row_selector")]
    pub row_selector: String,

    /// Selector for the cells within a row
    #[serde(default = "defaults::cell_selector")]
    pub cell_selector: String,

    /// Selector for the name anchor within the name cell
    #[serde(default = "defaults::name_selector")]
    pub name_selector: String,

    /// Selector for the styled element holding a percentage
    #[serde(default = "defaults::span_selector")]
    pub span_selector: String,

    /// Selector for the cell holding the "last updated" date
    #[serde(default = "defaults::run_id_selector")]
    pub run_id_selector: String,

    /// Which text node of that cell holds the date
    #[serde(default = "defaults::run_id_text_index")]
    pub run_id_text_index: usize,

    /// Pattern the date text must match
    #[serde(default = "defaults::run_id_pattern")]
    pub run_id_pattern: String,
}

impl SourceConfig {
    /// `href` of the anchor leading to listing page `page`.
    pub fn page_link_href(&self, page: u32) -> String {
        self.page_link_template.replace("{page}", &page.to_string())
    }

    /// Selector matching the anchor leading to listing page `page`.
    pub fn page_link_selector(&self, page: u32) -> String {
        format!("a[href=\"{}\"]", self.page_link_href(page))
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            listing_url: defaults::listing_url(),
            page_count: defaults::page_count(),
            page_link_template: defaults::page_link_template(),
            row_selector: defaults::row_selector(),
            cell_selector: defaults::cell_selector(),
            name_selector: defaults::name_selector(),
            span_selector: defaults::span_selector(),
            run_id_selector: defaults::run_id_selector(),
            run_id_text_index: defaults::run_id_text_index(),
            run_id_pattern: defaults::run_id_pattern(),
        }
    }
}

/// Position of each field in a components table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    #[serde(default = "defaults::col_name")]
    pub name: usize,
    #[serde(default = "defaults::col_latest_price")]
    pub latest_price: usize,
    #[serde(default = "defaults::col_change")]
    pub change: usize,
    #[serde(default = "defaults::col_change_3_months")]
    pub change_3_months: usize,
    #[serde(default = "defaults::col_change_6_months")]
    pub change_6_months: usize,
    #[serde(default = "defaults::col_change_1_year")]
    pub change_1_year: usize,
}

impl ColumnMap {
    fn indices(&self) -> [(&'static str, usize); 6] {
        [
            ("name", self.name),
            ("latest_price", self.latest_price),
            ("change", self.change),
            ("change_3_months", self.change_3_months),
            ("change_6_months", self.change_6_months),
            ("change_1_year", self.change_1_year),
        ]
    }

    /// Every role must point at its own column.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (role, index) in self.indices() {
            if !seen.insert(index) {
                return Err(AppError::validation(format!(
                    "columns.{role} reuses column {index}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: defaults::col_name(),
            latest_price: defaults::col_latest_price(),
            change: defaults::col_change(),
            change_3_months: defaults::col_change_3_months(),
            change_6_months: defaults::col_change_6_months(),
            change_1_year: defaults::col_change_1_year(),
        }
    }
}

/// CSV output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: ~/Documents/Share_Data)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Write a header row before the shares
    #[serde(default)]
    pub write_header: bool,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: debug, info, warn, or error
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    // Fetcher defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; share-scraper/0.1)".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn accept_invalid_certs() -> bool {
        true
    }

    // Source defaults
    pub fn listing_url() -> String {
        "https://markets.businessinsider.com/index/components/s&p_500?p=1".into()
    }
    pub fn page_count() -> u32 {
        10
    }
    pub fn page_link_template() -> String {
        "?p={page}".into()
    }
    pub fn row_selector() -> String {
        "tbody tr".into()
    }
    pub fn cell_selector() -> String {
        "td".into()
    }
    pub fn name_selector() -> String {
        "a".into()
    }
    pub fn span_selector() -> String {
        "span".into()
    }
    pub fn run_id_selector() -> String {
        "html > body > main > div > div:nth-of-type(3) > div:nth-of-type(1) \
         > div:nth-of-type(4) > table > tbody > tr:nth-of-type(1) > td:nth-of-type(5)"
            .into()
    }
    pub fn run_id_text_index() -> usize {
        1
    }
    pub fn run_id_pattern() -> String {
        r"\d{1,4}[./-]\d{1,2}[./-]\d{1,4}".into()
    }

    // Column defaults
    pub fn col_name() -> usize {
        0
    }
    pub fn col_latest_price() -> usize {
        1
    }
    pub fn col_change() -> usize {
        3
    }
    pub fn col_change_3_months() -> usize {
        5
    }
    pub fn col_change_6_months() -> usize {
        6
    }
    pub fn col_change_1_year() -> usize {
        7
    }

    // Logging defaults
    pub fn log_level() -> String {
        "info".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_defaults_match_deployment() {
        let config = Config::default();
        assert_eq!(config.source.page_count, 10);
        assert_eq!(config.columns.latest_price, 1);
        assert_eq!(config.columns.change, 3);
        assert_eq!(config.columns.change_1_year, 7);
        assert!(config.fetcher.accept_invalid_certs);
        assert!(!config.output.write_header);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [source]
            page_count = 3

            [columns]
            change = 4
            "#,
        )
        .unwrap();

        assert_eq!(config.source.page_count, 3);
        assert_eq!(config.source.row_selector, "tbody tr");
        assert_eq!(config.columns.change, 4);
        assert_eq!(config.columns.latest_price, 1);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.output.dir = Some(PathBuf::from("/tmp/shares"));
        let text = config.to_toml().unwrap();

        let loaded: Config = toml::from_str(&text).unwrap();
        assert_eq!(loaded.output.dir, Some(PathBuf::from("/tmp/shares")));
        assert_eq!(loaded.columns, config.columns);
    }

    #[test]
    fn test_page_link_selector() {
        let source = SourceConfig::default();
        assert_eq!(source.page_link_href(4), "?p=4");
        assert_eq!(source.page_link_selector(4), "a[href=\"?p=4\"]");
    }

    #[test]
    fn test_validate_rejects_bad_selector() {
        let mut config = Config::default();
        config.source.row_selector = "[[invalid".into();
        assert!(matches!(config.validate(), Err(AppError::Selector { .. })));
    }

    #[test]
    fn test_validate_rejects_duplicate_columns() {
        let mut config = Config::default();
        config.columns.change_6_months = config.columns.change;
        assert!(matches!(config.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_zero_pages() {
        let mut config = Config::default();
        config.source.page_count = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_output_dir_override() {
        let mut config = Config::default();
        config.output.dir = Some(PathBuf::from("out"));
        assert_eq!(config.output_dir().unwrap(), PathBuf::from("out"));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load("does/not/exist.toml"),
            Err(AppError::Io(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("share-scraper.toml");
        fs::write(&path, "[output]\nwrite_header = true\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.output.write_header);
        assert_eq!(config.source.page_count, 10);
    }
}
