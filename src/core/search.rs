//! Client-side patient search and display ordering
//!
//! The list view filters the store's snapshot locally: a case-insensitive
//! substring match over the given names (joined by a space) and over the
//! family name. Store order carries no meaning, so views sort with
//! [`display_order`].

use crate::domain::PatientRecord;
use std::cmp::Ordering;

/// True when `record` matches the search query
///
/// The query is matched as typed, surrounding whitespace included. An empty
/// query matches every record.
pub fn matches(record: &PatientRecord, query: &str) -> bool {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return true;
    }

    record.name.family.to_lowercase().contains(&needle)
        || record.name.given_joined().to_lowercase().contains(&needle)
}

/// Display ordering: family name, then given names, then id
pub fn display_order(a: &PatientRecord, b: &PatientRecord) -> Ordering {
    a.name
        .family
        .to_lowercase()
        .cmp(&b.name.family.to_lowercase())
        .then_with(|| {
            a.name
                .given_joined()
                .to_lowercase()
                .cmp(&b.name.given_joined().to_lowercase())
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Filter records by `query` and return them in display order
pub fn filter_patients<'a>(records: &'a [PatientRecord], query: &str) -> Vec<&'a PatientRecord> {
    let mut hits: Vec<&PatientRecord> = records.iter().filter(|r| matches(r, query)).collect();
    hits.sort_by(|a, b| display_order(a, b));
    hits
}
