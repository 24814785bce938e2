//! RSVP collection for a single event: form validation, an append-only CSV
//! record store, and the listing/export views organizers use.

pub mod cli;
pub mod config;
pub mod records;
pub mod report;
pub mod service;
pub mod store;
pub mod validation;

pub use config::{Config, EventDetails};
pub use records::{Record, FIELDNAMES};
pub use service::{DeskError, RsvpDesk, SubmitOutcome};
pub use store::{RecordStore, StoreError};
pub use validation::{validate, RawSubmission, Validation};
