use serde::{Deserialize, Serialize};

/// Column order of the backing CSV. Never reorder or rename these.
pub const FIELDNAMES: [&str; 6] = ["timestamp", "name", "email", "attending", "guests", "note"];

/// One accepted RSVP, exactly as it is stored.
///
/// Every field is kept as the string that was written so a record read back
/// from disk compares equal to the one that was appended. Field order matches
/// [`FIELDNAMES`] and drives the CSV column order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct Record {
    pub timestamp: String,
    pub name: String,
    pub email: String,
    pub attending: String,
    pub guests: String,
    pub note: String,
}

impl Record {
    pub fn is_attending(&self) -> bool {
        self.attending == "yes"
    }

    pub fn is_declined(&self) -> bool {
        self.attending == "no"
    }
}

/// Deserializes rows from any CSV source that starts with a header line.
///
/// Rows that do not fit the record shape are handed back as errors so the
/// caller decides whether to skip them.
pub fn read_records<R: std::io::Read>(reader: R) -> impl Iterator<Item = Result<Record, csv::Error>> {
    let rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    rdr.into_deserialize::<Record>()
}
