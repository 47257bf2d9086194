// tests/providers_html.rs
use apartment_scout::config::HtmlSourceCfg;
use apartment_scout::ingest::providers::html_list::HtmlListProvider;
use apartment_scout::ingest::types::{ListingSource, SourceKind};
use std::fs;

fn board_cfg() -> HtmlSourceCfg {
    HtmlSourceCfg {
        url: "https://board.test/search?q=apartment".to_string(),
        name: "test board".to_string(),
        item_selector: "a.result-title".to_string(),
        title_attr: "text".to_string(),
        href_attr: "href".to_string(),
    }
}

fn fixture_provider() -> HtmlListProvider {
    let html = fs::read_to_string("tests/fixtures/listings_page.html")
        .expect("missing tests/fixtures/listings_page.html");
    HtmlListProvider::from_fixture_str(&board_cfg(), &html)
}

#[tokio::test]
async fn page_yields_linked_entries_only() {
    let items = fixture_provider().fetch_listings().await.expect("parse ok");
    assert_eq!(items.len(), 2, "the entry without an href is skipped");
    assert!(items.iter().all(|l| l.kind == SourceKind::Scraped));
    assert!(items.iter().all(|l| l.feed_name == "test board"));
}

#[tokio::test]
async fn relative_hrefs_resolve_against_the_page_url() {
    let items = fixture_provider().fetch_listings().await.expect("parse ok");
    assert_eq!(items[0].url, "https://board.test/listings/301");
    assert_eq!(
        items[0].title,
        "Charming Brooklyn 1br, washer/dryer, $2,350/month"
    );
    // Absolute hrefs pass through untouched.
    assert_eq!(items[1].url, "https://board.test/listings/302");
}
