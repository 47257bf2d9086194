// src/ingest/mod.rs
pub mod providers;
pub mod types;

use crate::config::SourcesCfg;
use crate::ingest::providers::{html_list::HtmlListProvider, rss::RssFeedProvider};
use crate::ingest::types::{Listing, ListingSource};
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up under a recorder).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "ingest_listings_total",
            "Raw listings parsed from all sources."
        );
        describe_counter!(
            "ingest_source_errors_total",
            "Source fetch/parse errors (run continues without that source)."
        );
        describe_histogram!("ingest_parse_ms", "Source parse time in milliseconds.");
    });
}

/// Normalize free text coming out of feeds/pages: decode HTML entities, strip
/// tags, collapse whitespace, trim.
pub fn normalize_text(s: &str) -> String {
    let mut out = html_escape::decode_html_entities(s).to_string();

    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags =
        RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").expect("tag-strip regex"));
    out = re_tags.replace_all(&out, " ").to_string();

    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"\s+").expect("whitespace regex"));
    out = re_ws.replace_all(&out, " ").to_string();

    out.trim().to_string()
}

/// Build boxed sources from configuration, rss feeds first and then html
/// pages, each in configured order. The flattened fetch order is therefore
/// deterministic run to run, which keeps ranking tie-breaks reproducible.
/// Returns the providers plus the number of sources skipped as unbuildable,
/// so the caller can count them alongside fetch failures.
pub fn build_providers(cfg: &SourcesCfg) -> (Vec<Box<dyn ListingSource>>, usize) {
    let mut providers: Vec<Box<dyn ListingSource>> = Vec::new();
    let mut skipped = 0usize;
    for src in &cfg.rss {
        providers.push(Box::new(RssFeedProvider::from_cfg(src)));
    }
    for src in &cfg.html {
        match HtmlListProvider::from_cfg(src) {
            Ok(p) => providers.push(Box::new(p)),
            Err(e) => {
                skipped += 1;
                tracing::warn!(error = ?e, source = %src.url, "skipping html source");
                counter!("ingest_source_errors_total").increment(1);
            }
        }
    }
    (providers, skipped)
}

/// Fetch every source once, sequentially, isolating per-source failures: a
/// source that errors contributes nothing and the run continues.
/// Returns the flattened listings plus the number of failed sources.
pub async fn collect_listings(sources: &[Box<dyn ListingSource>]) -> (Vec<Listing>, usize) {
    ensure_metrics_described();

    let mut all = Vec::new();
    let mut errors = 0usize;
    for src in sources {
        match src.fetch_listings().await {
            Ok(mut items) => {
                tracing::debug!(source = src.name(), count = items.len(), "source fetched");
                all.append(&mut items);
            }
            Err(e) => {
                errors += 1;
                tracing::warn!(error = ?e, source = src.name(), "source error");
                counter!("ingest_source_errors_total").increment(1);
            }
        }
    }
    (all, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HtmlSourceCfg, RssSourceCfg};

    #[test]
    fn normalize_text_decodes_strips_and_collapses() {
        let s = "  <b>Bright&nbsp;&nbsp;studio</b> near the park!  ";
        assert_eq!(normalize_text(s), "Bright studio near the park!");
    }

    #[test]
    fn normalize_text_keeps_prices_intact() {
        assert_eq!(
            normalize_text("<p>$2,500/month, heat included</p>"),
            "$2,500/month, heat included"
        );
    }

    #[test]
    fn empty_source_lists_build_no_providers() {
        let cfg = SourcesCfg::default();
        let (providers, skipped) = build_providers(&cfg);
        assert!(providers.is_empty());
        assert_eq!(skipped, 0);
    }

    #[test]
    fn unbuildable_html_source_is_skipped_and_counted() {
        let cfg = SourcesCfg {
            rss: vec![RssSourceCfg {
                url: "https://feeds.test/rentals.xml".to_string(),
                name: "feed".to_string(),
            }],
            html: vec![HtmlSourceCfg {
                url: "https://board.test/search".to_string(),
                name: "board".to_string(),
                item_selector: "li:::".to_string(),
                title_attr: "text".to_string(),
                href_attr: "href".to_string(),
            }],
        };
        let (providers, skipped) = build_providers(&cfg);
        assert_eq!(providers.len(), 1, "the rss source still builds");
        assert_eq!(skipped, 1);
    }
}
