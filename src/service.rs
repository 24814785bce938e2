//! The operations an RSVP front end needs: take a submission, list what has
//! been recorded, export the raw file.
//!
//! Outcomes carry the HTTP status a web handler would answer with, so any
//! front end (the bundled CLI included) can map them without extra logic.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::{Config, EventDetails};
use crate::records::Record;
use crate::report::{listing_order, totals, Totals};
use crate::store::{RecordStore, StoreError};
use crate::validation::{validate, FieldErrors, RawSubmission};

pub const NOTHING_RECORDED: &str = "No RSVPs recorded yet.";

/// `2024-07-26T18:00:00.123456`, UTC without an offset suffix.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
const EXPORT_STAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("{}", NOTHING_RECORDED)]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DeskError {
    pub fn status_code(&self) -> u16 {
        match self {
            DeskError::NotFound => 404,
            DeskError::Store(_) => 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Saved. Carries the row exactly as written.
    Accepted(Record),
    /// Nothing saved. `form` is the input as posted, for re-rendering.
    Rejected {
        errors: FieldErrors,
        form: RawSubmission,
    },
}

impl SubmitOutcome {
    pub fn status_code(&self) -> u16 {
        match self {
            SubmitOutcome::Accepted(_) => 200,
            SubmitOutcome::Rejected { .. } => 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    /// Newest first.
    pub records: Vec<Record>,
    pub totals: Totals,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct RsvpDesk {
    config: Config,
    store: RecordStore,
}

impl RsvpDesk {
    pub fn new(config: Config) -> Self {
        let store = RecordStore::new(&config.data_path);
        Self { config, store }
    }

    pub fn event(&self) -> &EventDetails {
        &self.config.event
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn submit(&self, raw: RawSubmission) -> Result<SubmitOutcome, DeskError> {
        self.submit_at(raw, Utc::now())
    }

    pub fn submit_at(
        &self,
        raw: RawSubmission,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome, DeskError> {
        let validation = validate(&raw);
        if !validation.is_valid() {
            return Ok(SubmitOutcome::Rejected {
                errors: validation.errors,
                form: raw,
            });
        }

        let record = validation
            .cleaned
            .into_record(now.format(TIMESTAMP_FORMAT).to_string());
        self.store.append(&record)?;

        info!(attending = %record.attending, guests = %record.guests, "RSVP recorded");
        Ok(SubmitOutcome::Accepted(record))
    }

    pub fn listing(&self) -> Result<Listing, DeskError> {
        let records = self.store.read_all()?;
        if records.is_empty() {
            return Err(DeskError::NotFound);
        }

        Ok(Listing {
            totals: totals(&records),
            records: listing_order(records),
        })
    }

    pub fn export(&self) -> Result<Export, DeskError> {
        self.export_at(Utc::now())
    }

    pub fn export_at(&self, now: DateTime<Utc>) -> Result<Export, DeskError> {
        let snapshot = self.store.snapshot()?;
        if snapshot.records.is_empty() {
            return Err(DeskError::NotFound);
        }

        Ok(Export {
            filename: format!("rsvps_{}.csv", now.format(EXPORT_STAMP_FORMAT)),
            content_type: "text/csv",
            body: snapshot.raw,
        })
    }
}
