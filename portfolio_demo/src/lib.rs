use std::sync::LazyLock;

use chrono::{TimeZone, Utc};
use portfolio_models::contact::{ContactForm, ContactSubmission};

pub const RELAY_DESTINATION: &str = "owner@example.com";

pub static ALL_SUBMISSIONS: LazyLock<Vec<&ContactSubmission>> =
    LazyLock::new(|| vec![&JANE, &MAX]);

pub static JANE: LazyLock<ContactSubmission> = LazyLock::new(|| ContactSubmission {
    timestamp: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
    name: "Jane Doe".try_into().unwrap(),
    email: "jane@example.com".try_into().unwrap(),
    message: "Hello there".try_into().unwrap(),
});

/// Exercises quoting: commas, quotes, newlines and non-ASCII text.
pub static MAX: LazyLock<ContactSubmission> = LazyLock::new(|| ContactSubmission {
    timestamp: Utc.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap()
        + chrono::Duration::microseconds(535_897),
    name: "Max \"Maxi\" Mustermann".try_into().unwrap(),
    email: "max.mustermann@example.de".try_into().unwrap(),
    message: "Hi,\nI liked your projects, especially the one about Snowflake.\n\nGrüße, Max"
        .try_into()
        .unwrap(),
});

/// Returns the form that produces `submission`.
pub fn form(submission: &ContactSubmission) -> ContactForm {
    ContactForm {
        name: (*submission.name).clone(),
        email: (*submission.email).clone(),
        message: (*submission.message).clone(),
    }
}
