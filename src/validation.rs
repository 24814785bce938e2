//! Form validation for RSVP submissions.
//!
//! Every rule runs on every submission; failures accumulate into
//! [`FieldErrors`] instead of stopping at the first one, so the form can show
//! all problems at once.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use crate::records::Record;

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_GUESTS: i64 = 5;

pub const NAME_ERROR: &str = "Please enter your full name.";
pub const EMAIL_ERROR: &str = "Enter a valid email address.";
pub const ATTENDING_ERROR: &str = "Let us know if you can attend.";
pub const GUESTS_ERROR: &str = "The guest count must be between 0 and 5.";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid"));

/// Form fields that can carry a validation message.
///
/// Variant order is the order errors are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Attending,
    Guests,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Attending => "attending",
            Field::Guests => "guests",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type FieldErrors = BTreeMap<Field, &'static str>;

/// Raw form input as posted. Absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub attending: Option<String>,
    pub guests: Option<String>,
    pub note: Option<String>,
}

impl RawSubmission {
    /// Builds a submission from decoded form pairs. Unknown keys are ignored
    /// and a repeated key keeps its first value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut raw = RawSubmission::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "name" => &mut raw.name,
                "email" => &mut raw.email,
                "attending" => &mut raw.attending,
                "guests" => &mut raw.guests,
                "note" => &mut raw.note,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        raw
    }
}

/// Normalized submission values, produced whether or not validation passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanedFields {
    pub name: String,
    pub email: String,
    pub attending: String,
    pub guests: String,
    pub note: String,
}

impl CleanedFields {
    /// Stamps the cleaned values into a storable record.
    pub fn into_record(self, timestamp: impl Into<String>) -> Record {
        Record {
            timestamp: timestamp.into(),
            name: self.name,
            email: self.email,
            attending: self.attending,
            guests: self.guests,
            note: self.note,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub errors: FieldErrors,
    pub cleaned: CleanedFields,
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate(raw: &RawSubmission) -> Validation {
    let mut errors = FieldErrors::new();

    let name = trimmed(raw.name.as_deref());
    if name.chars().count() < MIN_NAME_LEN {
        errors.insert(Field::Name, NAME_ERROR);
    }

    let email = trimmed(raw.email.as_deref());
    if !is_valid_email(&email) {
        errors.insert(Field::Email, EMAIL_ERROR);
    }

    let attending = raw.attending.as_deref();
    if !matches!(attending, Some("yes" | "no")) {
        errors.insert(Field::Attending, ATTENDING_ERROR);
    }

    let guests = match parse_guests(raw.guests.as_deref().unwrap_or("0")) {
        Some(count) => count,
        None => {
            errors.insert(Field::Guests, GUESTS_ERROR);
            0
        }
    };

    Validation {
        errors,
        cleaned: CleanedFields {
            name,
            email,
            attending: match attending {
                Some(value) if !value.is_empty() => value.to_string(),
                _ => "no".to_string(),
            },
            guests: guests.to_string(),
            note: trimmed(raw.note.as_deref()),
        },
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

fn trimmed(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}

/// Integer parse tolerant of surrounding whitespace and a leading sign.
fn parse_guests(value: &str) -> Option<i64> {
    value
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|count| (0..=MAX_GUESTS).contains(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, email: &str, attending: &str, guests: &str) -> RawSubmission {
        RawSubmission {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            attending: Some(attending.to_string()),
            guests: Some(guests.to_string()),
            note: None,
        }
    }

    fn valid() -> RawSubmission {
        submission("Grace Hopper", "grace@example.com", "yes", "2")
    }

    #[test]
    fn accepts_valid_submission() {
        let result = validate(&valid());

        assert!(result.is_valid());
        assert_eq!(result.cleaned.name, "Grace Hopper");
        assert_eq!(result.cleaned.attending, "yes");
        assert_eq!(result.cleaned.guests, "2");
        assert_eq!(result.cleaned.note, "");
    }

    #[test]
    fn trims_text_fields() {
        let mut raw = submission("  Grace  ", "  grace@example.com\t", "no", "0");
        raw.note = Some("\n vegetarian please  ".to_string());

        let result = validate(&raw);

        assert!(result.is_valid());
        assert_eq!(result.cleaned.name, "Grace");
        assert_eq!(result.cleaned.email, "grace@example.com");
        assert_eq!(result.cleaned.note, "vegetarian please");
    }

    #[test]
    fn short_name_is_the_only_error() {
        let mut raw = valid();
        raw.name = Some("  G ".to_string());

        let result = validate(&raw);

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[&Field::Name], NAME_ERROR);
        assert_eq!(result.cleaned.name, "G");
        assert_eq!(result.cleaned.email, "grace@example.com");
        assert_eq!(result.cleaned.guests, "2");
    }

    #[test]
    fn bad_email_is_the_only_error() {
        let mut raw = submission(" Grace Hopper ", " a b@c.d ", "yes", "3");
        raw.note = Some(" vegetarian ".to_string());

        let result = validate(&raw);

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[&Field::Email], EMAIL_ERROR);
        assert_eq!(result.cleaned.email, "a b@c.d");
        assert_eq!(result.cleaned.name, "Grace Hopper");
        assert_eq!(result.cleaned.attending, "yes");
        assert_eq!(result.cleaned.guests, "3");
        assert_eq!(result.cleaned.note, "vegetarian");
    }

    #[test]
    fn bad_attending_is_the_only_error() {
        let mut raw = valid();
        raw.attending = Some("maybe".to_string());

        let result = validate(&raw);

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[&Field::Attending], ATTENDING_ERROR);
        assert_eq!(result.cleaned.attending, "maybe");
    }

    #[test]
    fn missing_attending_defaults_to_no_but_still_fails() {
        let mut raw = valid();
        raw.attending = None;

        let result = validate(&raw);

        assert_eq!(result.errors[&Field::Attending], ATTENDING_ERROR);
        assert_eq!(result.cleaned.attending, "no");
    }

    #[test]
    fn guest_count_out_of_range() {
        let mut raw = valid();
        raw.guests = Some("7".to_string());

        let result = validate(&raw);

        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[&Field::Guests], GUESTS_ERROR);
        assert_eq!(result.cleaned.guests, "0");
    }

    #[test]
    fn guest_count_not_a_number() {
        let mut raw = valid();
        raw.guests = Some("abc".to_string());

        let result = validate(&raw);

        assert_eq!(result.errors[&Field::Guests], GUESTS_ERROR);
        assert_eq!(result.cleaned.guests, "0");
    }

    #[test]
    fn guest_count_negative() {
        let mut raw = valid();
        raw.guests = Some("-1".to_string());

        let result = validate(&raw);

        assert_eq!(result.errors[&Field::Guests], GUESTS_ERROR);
        assert_eq!(result.cleaned.guests, "0");
    }

    #[test]
    fn guest_count_upper_bound_is_inclusive() {
        let mut raw = valid();
        raw.guests = Some("5".to_string());

        let result = validate(&raw);

        assert!(result.is_valid());
        assert_eq!(result.cleaned.guests, "5");
    }

    #[test]
    fn missing_guest_count_defaults_to_zero() {
        let mut raw = valid();
        raw.guests = None;

        let result = validate(&raw);

        assert!(result.is_valid());
        assert_eq!(result.cleaned.guests, "0");
    }

    #[test]
    fn empty_submission_reports_every_field() {
        let result = validate(&RawSubmission::default());

        let fields: Vec<Field> = result.errors.keys().copied().collect();
        assert_eq!(fields, vec![Field::Name, Field::Email, Field::Attending]);
        assert_eq!(result.cleaned.guests, "0");
        assert_eq!(result.cleaned.attending, "no");
    }

    #[test]
    fn email_shapes() {
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("first.last@sub.example.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("@c.d"));
        assert!(!is_valid_email("a@@b.c"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn from_pairs_ignores_unknown_keys() {
        let raw = RawSubmission::from_pairs([
            ("name", "Grace Hopper"),
            ("csrf", "token"),
            ("attending", "yes"),
            ("attending", "no"),
        ]);

        assert_eq!(raw.name.as_deref(), Some("Grace Hopper"));
        assert_eq!(raw.attending.as_deref(), Some("yes"));
        assert_eq!(raw.email, None);
    }

    #[test]
    fn into_record_keeps_column_values() {
        let record = validate(&valid()).cleaned.into_record("2024-07-26T18:00:00.000000");

        assert_eq!(record.timestamp, "2024-07-26T18:00:00.000000");
        assert_eq!(record.email, "grace@example.com");
        assert_eq!(record.guests, "2");
    }
}
