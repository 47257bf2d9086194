// src/pipeline/mod.rs
//! Listing pipeline: dedupe -> keyword gate -> hard requirements -> score ->
//! rank. Stages run in that fixed order; each stage only sees survivors of
//! the previous one.

pub mod dedup;
pub mod extract;
pub mod filter;
pub mod rank;
pub mod score;

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;

use crate::config::FiltersCfg;
use crate::ingest::types::Listing;

// Re-export convenient types.
pub use crate::pipeline::dedup::dedupe_by_url;
pub use crate::pipeline::filter::{keyword_gate, HardRequirements, RejectReason};
pub use crate::pipeline::rank::sort_matches;
pub use crate::pipeline::score::Preferences;

/// One-time metrics registration (so series show up under a recorder).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "pipeline_dedup_total",
            "Listings dropped as duplicate URLs."
        );
        describe_counter!(
            "pipeline_rejected_total",
            "Listings rejected by keyword or hard-requirement gates."
        );
        describe_counter!("pipeline_matches_total", "Listings that became matches.");
    });
}

/// Run the whole selection pipeline over freshly collected listings.
///
/// Duplicates are dropped first so a URL fetched by two sources is judged
/// once. Survivors of both gates get a preference score stamped on them, and
/// the result comes back sorted for the report.
pub fn select_matches(listings: Vec<Listing>, filters: &FiltersCfg) -> Vec<Listing> {
    ensure_metrics_described();

    let total = listings.len();
    let unique = dedupe_by_url(listings);
    let duplicates = total - unique.len();
    counter!("pipeline_dedup_total").increment(duplicates as u64);

    let mut matches: Vec<Listing> = Vec::with_capacity(unique.len());
    let mut rejected = 0usize;
    for mut listing in unique {
        let haystack = listing.haystack();
        if !keyword_gate(
            &haystack,
            &filters.keywords,
            &filters.exclude,
            filters.match_all_when_no_keywords,
        ) {
            tracing::debug!(url = %listing.url, "rejected by keyword gate");
            rejected += 1;
            continue;
        }
        if let Some(reason) = filters.hard_requirements.rejection(&haystack) {
            tracing::debug!(url = %listing.url, %reason, "rejected by hard requirement");
            rejected += 1;
            continue;
        }
        listing.preference_score = Some(filters.preferences.score(&haystack));
        matches.push(listing);
    }
    counter!("pipeline_rejected_total").increment(rejected as u64);
    counter!("pipeline_matches_total").increment(matches.len() as u64);

    sort_matches(&mut matches);

    tracing::info!(
        target: "pipeline",
        total,
        duplicates,
        rejected,
        matches = matches.len(),
        "selection pass complete"
    );
    matches
}
