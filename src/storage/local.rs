//! Local filesystem CSV storage.
//!
//! Rows are written to `<stem>.csv.tmp` and renamed into place on commit, so
//! an aborted run leaves nothing that would block the next one.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::models::{CSV_HEADER, Config, RunId, Share};
use crate::storage::DirStatus;

/// Output directory holding one CSV file per run.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
    write_header: bool,
}

impl CsvStore {
    /// Create a store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_header: false,
        }
    }

    /// Create the store described by the `[output]` section.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(config.output_dir()?).with_header(config.output.write_header))
    }

    /// Write a header row at the top of new files.
    pub fn with_header(mut self, write_header: bool) -> Self {
        self.write_header = write_header;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Output path for a run.
    pub fn path_for(&self, run_id: &RunId) -> PathBuf {
        self.dir.join(run_id.file_name())
    }

    /// Whether the run already has an output file.
    pub fn exists(&self, run_id: &RunId) -> bool {
        self.path_for(run_id).exists()
    }

    /// Create the output directory if it is missing.
    pub fn ensure_dir(&self) -> Result<DirStatus> {
        if self.dir.is_dir() {
            log::info!("{} exists already.", self.dir.display());
            return Ok(DirStatus::Existed);
        }
        fs::create_dir_all(&self.dir)?;
        log::info!("{} has just been created.", self.dir.display());
        Ok(DirStatus::Created)
    }

    /// Open a writer for the run's output file.
    pub fn create(&self, run_id: &RunId) -> Result<ShareWriter> {
        let path = self.path_for(run_id);
        let tmp = self.dir.join(format!("{}.tmp", run_id.file_name()));

        let file = File::create(&tmp)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        if self.write_header {
            writer.write_record(CSV_HEADER)?;
        }

        Ok(ShareWriter {
            writer: Some(writer),
            tmp,
            path,
            records: 0,
            committed: false,
        })
    }

    /// CSV files already in the output directory, sorted by name.
    pub fn list(&self) -> Result<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

/// Writer for one run's CSV file.
///
/// Dropping it without [`commit`](ShareWriter::commit) discards the rows
/// written so far.
pub struct ShareWriter {
    writer: Option<csv::Writer<File>>,
    tmp: PathBuf,
    path: PathBuf,
    records: usize,
    committed: bool,
}

impl ShareWriter {
    /// Append one share as a CSV row.
    pub fn write(&mut self, share: &Share) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| AppError::validation("writer already closed"))?;
        writer.write_record(share.csv_fields())?;
        self.records += 1;
        Ok(())
    }

    /// Flush, close, and move the file into place. Returns the row count.
    pub fn commit(mut self) -> Result<usize> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        fs::rename(&self.tmp, &self.path)?;
        self.committed = true;
        Ok(self.records)
    }
}

impl Drop for ShareWriter {
    fn drop(&mut self) {
        // Close the handle before removing the file.
        drop(self.writer.take());
        if self.committed {
            return;
        }
        match fs::remove_file(&self.tmp) {
            Ok(()) => log::debug!("Discarded {}", self.tmp.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => log::warn!("Could not remove {}: {}", self.tmp.display(), e),
        }
    }
}
