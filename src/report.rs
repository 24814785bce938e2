use serde::Serialize;
use tracing::warn;

use crate::records::Record;

/// Headcount summary shown above the RSVP listing. Derived on demand, never
/// stored.
#[derive(Debug, Serialize, PartialEq, Eq, Default, Clone, Copy)]
pub struct Totals {
    pub yes: usize,
    pub no: usize,
    /// Extra guests brought by people who said yes.
    pub guests: u64,
}

pub fn totals(records: &[Record]) -> Totals {
    records.iter().fold(Totals::default(), |mut totals, record| {
        if record.is_attending() {
            totals.yes += 1;
            totals.guests = totals.guests.saturating_add(guest_count(record));
        } else if record.is_declined() {
            totals.no += 1;
        }
        totals
    })
}

/// Newest first. Records sharing a timestamp keep their stored order.
pub fn listing_order(mut records: Vec<Record>) -> Vec<Record> {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    records
}

fn guest_count(record: &Record) -> u64 {
    match record.guests.trim().parse::<u32>() {
        Ok(count) => u64::from(count),
        Err(_) => {
            // Only reachable if the file was edited by hand.
            warn!(timestamp = %record.timestamp, guests = %record.guests, "unreadable guest count, counting as 0");
            0
        }
    }
}
