// tests/pipeline_dedup.rs
use apartment_scout::pipeline::dedupe_by_url;
use apartment_scout::{Listing, SourceKind};

fn listing(title: &str, url: &str) -> Listing {
    Listing {
        title: title.to_string(),
        url: url.to_string(),
        summary: String::new(),
        source: "https://feeds.test".to_string(),
        feed_name: "feed".to_string(),
        kind: SourceKind::Syndicated,
        preference_score: None,
    }
}

#[test]
fn first_occurrence_wins_across_sources() {
    let out = dedupe_by_url(vec![
        listing("seen first", "https://x.test/apt/1"),
        listing("same apt, other feed", "HTTPS://X.TEST/apt/1"),
        listing("different apt", "https://x.test/apt/2"),
        listing("same again with spaces", "  https://x.test/apt/1  "),
    ]);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].title, "seen first");
    assert_eq!(out[1].title, "different apt");
}

#[test]
fn url_less_listings_collapse_onto_one() {
    let out = dedupe_by_url(vec![
        listing("no url a", ""),
        listing("no url b", ""),
        listing("no url c", "   "),
    ]);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].title, "no url a");
}

#[test]
fn input_order_is_preserved() {
    let out = dedupe_by_url(vec![
        listing("c", "https://x.test/c"),
        listing("a", "https://x.test/a"),
        listing("b", "https://x.test/b"),
    ]);
    let titles: Vec<&str> = out.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["c", "a", "b"]);
}
