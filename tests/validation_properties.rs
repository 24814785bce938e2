use proptest::prelude::*;
use proptest::test_runner::Config;
use rsvp_desk::validation::{Field, EMAIL_ERROR, GUESTS_ERROR, NAME_ERROR};
use rsvp_desk::{validate, RawSubmission};

fn valid_name() -> impl Strategy<Value = String> {
    "[ \t]{0,2}[A-Za-z]{2,12}( [A-Za-z'-]{1,12})?[ \t]{0,2}"
}

fn valid_email() -> impl Strategy<Value = String> {
    "[a-z0-9._+-]{1,12}@[a-z0-9-]{1,12}(\\.[a-z0-9-]{1,8})?\\.[a-z]{2,6}"
}

fn attending_answer() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["yes", "no"])
}

fn submission(name: &str, email: &str, attending: &str, guests: &str) -> RawSubmission {
    RawSubmission {
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        attending: Some(attending.to_string()),
        guests: Some(guests.to_string()),
        note: None,
    }
}

proptest! {
    #![proptest_config(Config::with_cases(256))]
    #[test]
    fn well_formed_submissions_pass(
        name in valid_name(),
        email in valid_email(),
        attending in attending_answer(),
        guests in 0_u8..=5,
    ) {
        let result = validate(&submission(&name, &email, attending, &guests.to_string()));

        prop_assert!(result.errors.is_empty(), "unexpected errors: {:?}", result.errors);
        prop_assert_eq!(result.cleaned.name, name.trim());
        prop_assert_eq!(result.cleaned.attending, attending);
        prop_assert_eq!(result.cleaned.guests, guests.to_string());
    }

    #[test]
    fn out_of_range_guests_is_the_only_error(
        name in valid_name(),
        email in valid_email(),
        attending in attending_answer(),
        guests in prop_oneof![6_i64..10_000, -10_000_i64..0],
    ) {
        let result = validate(&submission(&name, &email, attending, &guests.to_string()));

        prop_assert_eq!(result.errors.len(), 1);
        prop_assert_eq!(result.errors.get(&Field::Guests).copied(), Some(GUESTS_ERROR));
        prop_assert_eq!(result.cleaned.guests, "0");
        prop_assert_eq!(result.cleaned.name, name.trim());
    }

    #[test]
    fn whitespace_in_email_is_the_only_error(
        name in valid_name(),
        local in "[a-z]{1,6}",
        rest in "[a-z]{1,6}",
        attending in attending_answer(),
        guests in 0_u8..=5,
    ) {
        let email = format!("{local} {rest}@example.com");
        let result = validate(&submission(&name, &email, attending, &guests.to_string()));

        prop_assert_eq!(result.errors.len(), 1);
        prop_assert_eq!(result.errors.get(&Field::Email).copied(), Some(EMAIL_ERROR));
        prop_assert_eq!(result.cleaned.guests, guests.to_string());
    }

    #[test]
    fn one_letter_name_is_the_only_error(
        letter in "[A-Za-z]",
        email in valid_email(),
        attending in attending_answer(),
        guests in 0_u8..=5,
    ) {
        let result = validate(&submission(&format!("  {letter} "), &email, attending, &guests.to_string()));

        prop_assert_eq!(result.errors.len(), 1);
        prop_assert_eq!(result.errors.get(&Field::Name).copied(), Some(NAME_ERROR));
        prop_assert_eq!(result.cleaned.name, letter);
    }
}
