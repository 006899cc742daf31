// src/pipeline/scrape.rs

//! Scrape run orchestration.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use scraper::Selector;
use url::Url;

use crate::error::Result;
use crate::models::Config;
use crate::services::{PageFetcher, Paginator, RowError, RowExtractor, RunIdExtractor};
use crate::storage::CsvStore;
use crate::utils::parse_selector;

/// Counters for one run.
#[derive(Debug, Clone)]
pub struct RunStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub pages_requested: usize,
    pub pages_visited: usize,
    pub pages_missing: usize,
    pub rows_seen: usize,
    pub rows_blank: usize,
    pub rows_malformed: usize,
    pub records_written: usize,
}

impl RunStats {
    fn new(started_at: DateTime<Utc>, pages_requested: usize) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            pages_requested,
            pages_visited: 0,
            pages_missing: 0,
            rows_seen: 0,
            rows_blank: 0,
            rows_malformed: 0,
            records_written: 0,
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        (self.finished_at - self.started_at).num_milliseconds() as f64 / 1000.0
    }
}

/// How a run ended.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The file for this run identifier was already there; nothing was written.
    AlreadyExists { path: PathBuf },
    /// A new file was written.
    Written {
        path: PathBuf,
        records: usize,
        stats: RunStats,
    },
}

/// Scrapes the listing pages into the run's CSV file.
pub struct Scraper<F: PageFetcher> {
    fetcher: F,
    listing_url: Url,
    run_id: RunIdExtractor,
    paginator: Paginator,
    rows: Selector,
    extractor: RowExtractor,
    store: CsvStore,
}

impl<F: PageFetcher> Scraper<F> {
    /// Compile selectors from `config` and bind the fetcher and store.
    pub fn new(config: &Config, fetcher: F, store: CsvStore) -> Result<Self> {
        Ok(Self {
            fetcher,
            listing_url: Url::parse(&config.source.listing_url)?,
            run_id: RunIdExtractor::from_config(&config.source)?,
            paginator: Paginator::from_config(&config.source)?,
            rows: parse_selector(&config.source.row_selector)?,
            extractor: RowExtractor::from_config(&config.source, config.columns)?,
            store,
        })
    }

    /// Run once.
    ///
    /// Returns `AlreadyExists` without touching the network again when the
    /// output file for the listing's date is present. Fetch and I/O errors
    /// abort the run and leave no output file behind.
    pub fn run(&self) -> Result<RunOutcome> {
        let started_at = Utc::now();

        log::info!("Fetching listing page {}", self.listing_url);
        let listing = self.fetcher.fetch(&self.listing_url)?;
        let run_id = self.run_id.extract(&listing)?;
        let path = self.store.path_for(&run_id);

        if self.store.exists(&run_id) {
            log::info!(
                "File already exists. Nothing written: {}",
                path.display()
            );
            return Ok(RunOutcome::AlreadyExists { path });
        }

        self.store.ensure_dir()?;
        let links = self.paginator.list_page_links(&listing)?;
        drop(listing);

        let mut writer = self.store.create(&run_id)?;
        let mut stats = RunStats::new(started_at, self.paginator.page_count());

        let walk = self.paginator.walk(&self.fetcher, &links, |_, page| {
            for row in page.select(&self.rows) {
                stats.rows_seen += 1;
                match self.extractor.extract(row) {
                    Ok(share) => writer.write(&share)?,
                    Err(skip) => {
                        skip.report();
                        match skip {
                            RowError::Blank => stats.rows_blank += 1,
                            _ => stats.rows_malformed += 1,
                        }
                    }
                }
            }
            Ok(())
        })?;

        let records = writer.commit()?;
        stats.pages_visited = walk.visited;
        stats.pages_missing = walk.missing;
        stats.records_written = records;
        stats.finished_at = Utc::now();

        log::info!(
            "Successfully written {} shares to {}",
            records,
            path.display()
        );
        Ok(RunOutcome::Written {
            path,
            records,
            stats,
        })
    }
}
