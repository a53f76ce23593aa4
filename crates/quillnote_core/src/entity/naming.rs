//! Name translation between storage columns and in-memory attributes.
//!
//! # Responsibility
//! - Translate snake_case column names to camelCase attribute names and
//!   back.
//! - Derive hyphen-separated slugs from attribute text.
//!
//! # Invariants
//! - The translation pair is pure and round-trip idempotent for
//!   convention-following ASCII names.
//! - Names without underscores or internal capitals are fixed points of
//!   both directions.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALPHANUMERIC_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("[^A-Za-z0-9]+").expect("valid slug regex"));

/// Translates a snake_case column name to its camelCase attribute name.
///
/// `created_at` becomes `createdAt`. Behavior on names outside the
/// lowercase snake_case convention is unspecified.
pub fn column_to_property(column: &str) -> String {
    let mut property = String::with_capacity(column.len());

    for (index, segment) in column.split('_').enumerate() {
        if index == 0 {
            property.push_str(&segment.to_ascii_lowercase());
            continue;
        }

        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            property.push(first.to_ascii_uppercase());
            property.push_str(chars.as_str());
        }
    }

    property
}

/// Translates a camelCase attribute name to its snake_case column name.
///
/// `createdAt` becomes `created_at`. Behavior on names outside the
/// camelCase convention is unspecified.
pub fn property_to_column(property: &str) -> String {
    let mut column = String::with_capacity(property.len() + 2);

    for ch in property.chars() {
        if ch.is_ascii_uppercase() {
            if !column.is_empty() {
                column.push('_');
            }
            column.push(ch.to_ascii_lowercase());
        } else {
            column.push(ch);
        }
    }

    column
}

/// Derives a slug from arbitrary text: every maximal run of
/// non-alphanumeric characters becomes a single `-`, the result is
/// lowercased and leading/trailing `-` are trimmed.
///
/// Slugs are not unique; callers needing uniqueness must disambiguate
/// themselves.
pub fn slug_from(text: &str) -> String {
    NON_ALPHANUMERIC_RUN_RE
        .replace_all(text, "-")
        .to_ascii_lowercase()
        .trim_matches('-')
        .to_string()
}
