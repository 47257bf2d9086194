// src/pipeline/dedup.rs
use std::collections::HashSet;

use crate::ingest::types::Listing;

/// Collapse listings that share a normalized url (trim + lowercase), keeping
/// the first occurrence and preserving relative order. Listings without a url
/// all share the empty key, so at most one of them survives.
pub fn dedupe_by_url(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen: HashSet<String> = HashSet::with_capacity(listings.len());
    let mut out = Vec::with_capacity(listings.len());
    for listing in listings {
        if seen.insert(listing.dedup_key()) {
            out.push(listing);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::types::SourceKind;

    fn listing(title: &str, url: &str) -> Listing {
        Listing {
            title: title.into(),
            url: url.into(),
            summary: String::new(),
            source: "https://feeds.test/a".into(),
            feed_name: "a".into(),
            kind: SourceKind::Syndicated,
            preference_score: None,
        }
    }

    #[test]
    fn first_occurrence_wins_and_order_is_preserved() {
        let out = dedupe_by_url(vec![
            listing("first", "https://x.test/1"),
            listing("other", "https://x.test/2"),
            listing("repost", "https://x.test/1"),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "first");
        assert_eq!(out[1].title, "other");
    }

    #[test]
    fn key_ignores_case_and_surrounding_whitespace() {
        let out = dedupe_by_url(vec![
            listing("a", "https://x.test/Apt-1"),
            listing("b", "  HTTPS://X.TEST/APT-1 "),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "a");
    }

    #[test]
    fn at_most_one_empty_url_survives() {
        let out = dedupe_by_url(vec![
            listing("no url 1", ""),
            listing("has url", "https://x.test/1"),
            listing("no url 2", "   "),
        ]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "no url 1");
    }
}
