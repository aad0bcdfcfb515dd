//! Unit id generation.
//!
//! Ids are `{slug}-{salt}`: readable from the subject, made unique by a
//! millisecond timestamp.

use std::time::{SystemTime, UNIX_EPOCH};

/// Fallback slug when the subject has no ASCII alphanumerics.
pub const FALLBACK_SLUG: &str = "magnet";

/// Lowercase the subject, collapse every run of characters outside
/// `[a-z0-9]` into a single `-`, and trim leading/trailing dashes.
pub fn slugify(subject: &str) -> String {
    let mut slug = String::with_capacity(subject.len());
    let mut pending_dash = false;
    for ch in subject.to_lowercase().chars() {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Build an id from a subject and a salt.
pub fn unit_id(subject: &str, salt: u128) -> String {
    format!("{}-{salt}", slugify(subject))
}

/// Milliseconds since the Unix epoch, used as the default id salt.
pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}
