// src/pipeline/rank.rs
//! Deterministic ordering for the final report: best score first, then a
//! stable textual tie-break so reruns over the same inputs produce identical
//! output.

use std::cmp::Ordering;

use crate::ingest::types::Listing;

/// Sort matches in place: score descending, then source kind, then title,
/// then URL (both case-insensitive ascending). A missing score sorts as 0.
pub fn sort_matches(matches: &mut [Listing]) {
    matches.sort_by(compare);
}

fn compare(a: &Listing, b: &Listing) -> Ordering {
    let score_a = a.preference_score.unwrap_or(0);
    let score_b = b.preference_score.unwrap_or(0);
    score_b
        .cmp(&score_a)
        .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
        .then_with(|| a.url.to_lowercase().cmp(&b.url.to_lowercase()))
}
