//! Record persistence
//!
//! Two [`RecordSink`]s with the same byte format:
//!
//! 1. **`CsvLogStore`** (std): the log file on disk. Opened, written and
//!    closed inside each call; no handle is held between cycles.
//! 2. **`MemoryLogStore`**: the same text kept in memory, for tests and for
//!    targets that ship records elsewhere.
//!
//! ## Store lifecycle
//!
//! `ensure_store` writes the header only when the store does not exist.
//! An existing store is never inspected or rewritten, so switching the
//! reference sensor on or off between runs leaves the old header in place.

use alloc::string::String;

use crate::constants::csv_header;
use crate::errors::{MonitorError, MonitorResult};
use crate::record::CycleRecord;
use crate::traits::RecordSink;

#[cfg(feature = "std")]
pub use file::CsvLogStore;

/// In-memory log with file semantics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryLogStore {
    contents: Option<String>,
    records: usize,
}

impl MemoryLogStore {
    /// Store that does not exist yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `contents`, as if left by an earlier run
    pub fn existing(contents: &str) -> Self {
        Self {
            contents: Some(String::from(contents)),
            records: 0,
        }
    }

    /// True once the store has been created
    pub fn exists(&self) -> bool {
        self.contents.is_some()
    }

    /// Full text of the store, empty if it does not exist
    pub fn contents(&self) -> &str {
        self.contents.as_deref().unwrap_or("")
    }

    /// Records appended through this handle
    pub fn records_written(&self) -> usize {
        self.records
    }
}

impl RecordSink for MemoryLogStore {
    fn ensure_store(&mut self, has_reference: bool) -> MonitorResult<()> {
        if self.contents.is_none() {
            self.contents = Some(String::from(csv_header(has_reference)));
        }
        Ok(())
    }

    fn append(&mut self, record: &CycleRecord) -> MonitorResult<()> {
        // Appending to a missing file creates it, without a header
        let contents = self.contents.get_or_insert_with(String::new);
        record
            .write_csv_line(contents)
            .map_err(|_| MonitorError::Storage {
                reason: "record formatting failed",
            })?;
        self.records += 1;
        Ok(())
    }
}

#[cfg(feature = "std")]
mod file {
    use std::fs::OpenOptions;
    use std::io::{ErrorKind, Write};
    use std::path::{Path, PathBuf};

    use crate::constants::{csv_header, DEFAULT_LOG_FILE};
    use crate::errors::{MonitorError, MonitorResult};
    use crate::record::CycleRecord;
    use crate::traits::RecordSink;

    /// CSV log file on disk
    ///
    /// ## Example
    ///
    /// ```rust,no_run
    /// use ledtherm_core::logger::CsvLogStore;
    /// use ledtherm_core::traits::RecordSink;
    ///
    /// let mut store = CsvLogStore::new("/data/mittaukset.csv");
    /// store.ensure_store(true)?;
    /// # Ok::<(), ledtherm_core::MonitorError>(())
    /// ```
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CsvLogStore {
        path: PathBuf,
    }

    impl CsvLogStore {
        /// Store at `path`
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// Location of the log file
        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    /// `mittaukset.csv` in the working directory
    impl Default for CsvLogStore {
        fn default() -> Self {
            Self::new(DEFAULT_LOG_FILE)
        }
    }

    impl RecordSink for CsvLogStore {
        fn ensure_store(&mut self, has_reference: bool) -> MonitorResult<()> {
            // create_new fails on an existing file, so check and create are one step
            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&self.path)
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    log_debug!("Log store {} already exists", self.path.display());
                    return Ok(());
                }
                Err(e) => return Err(MonitorError::Io(e)),
            };

            file.write_all(csv_header(has_reference).as_bytes())?;
            file.flush()?;
            log_info!("Created log store {}", self.path.display());
            Ok(())
        }

        fn append(&mut self, record: &CycleRecord) -> MonitorResult<()> {
            let line = record.to_csv_line().map_err(|_| MonitorError::Storage {
                reason: "record line too long",
            })?;

            let mut file = OpenOptions::new()
                .append(true)
                .create(true)
                .open(&self.path)?;
            file.write_all(line.as_bytes())?;
            file.flush()?;
            Ok(())
        }
    }
}
