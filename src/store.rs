//! Append-only CSV store for accepted RSVPs.
//!
//! The file starts with the [`FIELDNAMES`] header and gains exactly one row
//! per [`RecordStore::append`]. Rows are never rewritten, reordered or removed.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::records::{read_records, Record, FIELDNAMES};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV error on {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the header row if the file is missing or empty. A file that
    /// already has content is left untouched.
    ///
    /// The header goes through an append-mode handle in a single write, so it
    /// can never land on top of a row another writer already appended.
    pub fn ensure_initialized(&self) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        if file.metadata().map_err(|e| self.io_error(e))?.len() > 0 {
            return Ok(());
        }

        let header = encode_header().map_err(|e| self.csv_error(e))?;
        file.write_all(&header).map_err(|e| self.io_error(e))?;
        file.sync_data().map_err(|e| self.io_error(e))?;

        info!(path = %self.path.display(), "initialized RSVP store");
        Ok(())
    }

    /// Adds `record` as the last row.
    ///
    /// The row is encoded up front and handed to the OS as one append-mode
    /// write, so concurrent appenders can interleave rows but never split one.
    pub fn append(&self, record: &Record) -> StoreResult<()> {
        self.ensure_initialized()?;

        let row = encode_row(record).map_err(|e| self.csv_error(e))?;

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(&row).map_err(|e| self.io_error(e))?;
        file.sync_data().map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), timestamp = %record.timestamp, "appended RSVP");
        Ok(())
    }

    /// Every stored record, oldest first.
    ///
    /// Rows that cannot be decoded (for example a write cut short by a crash)
    /// are logged and skipped.
    pub fn read_all(&self) -> StoreResult<Vec<Record>> {
        Ok(self.snapshot()?.records)
    }

    /// The backing file byte-for-byte, header included.
    pub fn raw_contents(&self) -> StoreResult<Vec<u8>> {
        Ok(self.snapshot()?.raw)
    }

    /// Raw bytes and decoded records taken from a single read of the file.
    pub fn snapshot(&self) -> StoreResult<Snapshot> {
        self.ensure_initialized()?;

        let raw = fs::read(&self.path).map_err(|e| self.io_error(e))?;
        let records = self.decode(&raw)?;
        Ok(Snapshot { raw, records })
    }

    fn decode(&self, raw: &[u8]) -> StoreResult<Vec<Record>> {
        let mut records = Vec::new();
        for (index, row) in read_records(raw).enumerate() {
            match row {
                // Two writers racing on an empty file can both lay down a header.
                Ok(record) if is_header(&record) => {}
                Ok(record) => records.push(record),
                Err(e) if e.is_io_error() => return Err(self.csv_error(e)),
                Err(e) => {
                    warn!(path = %self.path.display(), row = index + 1, error = %e, "skipping unreadable RSVP row");
                }
            }
        }

        debug!(path = %self.path.display(), count = records.len(), "read RSVP store");
        Ok(records)
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

/// File contents and the records decoded from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub raw: Vec<u8>,
    pub records: Vec<Record>,
}

fn is_header(record: &Record) -> bool {
    [
        &record.timestamp,
        &record.name,
        &record.email,
        &record.attending,
        &record.guests,
        &record.note,
    ]
    .iter()
    .zip(FIELDNAMES)
    .all(|(value, name)| value.as_str() == name)
}

fn encode_header() -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(FIELDNAMES)?;
    wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}

fn encode_row(record: &Record) -> Result<Vec<u8>, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.serialize(record)?;
    wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}
