// src/ingest/providers/html_list.rs
//! Adapter for ad-hoc HTML listing pages: a configured CSS selector picks the
//! per-listing elements, and configured attribute names say where the title
//! and link live ("text" means the element's text content).

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use crate::config::HtmlSourceCfg;
use crate::ingest::types::{Listing, ListingSource, SourceKind};

/// Placeholder when a matched entry has a link but no usable text.
const NO_TITLE: &str = "(no title)";

pub struct HtmlListProvider {
    feed_name: String,
    url: String,
    item_selector: String,
    title_attr: String,
    href_attr: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http(reqwest::Client),
}

impl HtmlListProvider {
    /// Build the fetching provider, validating the configured selector up
    /// front so a broken source is skipped at startup, not on every fetch.
    pub fn from_cfg(cfg: &HtmlSourceCfg) -> Result<Self> {
        Selector::parse(&cfg.item_selector)
            .map_err(|e| anyhow!("invalid item_selector `{}`: {e}", cfg.item_selector))?;
        Ok(Self {
            feed_name: cfg.name.clone(),
            url: cfg.url.clone(),
            item_selector: cfg.item_selector.clone(),
            title_attr: cfg.title_attr.clone(),
            href_attr: cfg.href_attr.clone(),
            mode: Mode::Http(build_client()?),
        })
    }

    /// Parse the given HTML instead of fetching. `url` still identifies the
    /// source and anchors relative hrefs.
    pub fn from_fixture_str(cfg: &HtmlSourceCfg, html: &str) -> Self {
        Self {
            feed_name: cfg.name.clone(),
            url: cfg.url.clone(),
            item_selector: cfg.item_selector.clone(),
            title_attr: cfg.title_attr.clone(),
            href_attr: cfg.href_attr.clone(),
            mode: Mode::Fixture(html.to_string()),
        }
    }

    fn parse_listing_page(&self, html: &str) -> Result<Vec<Listing>> {
        let t0 = std::time::Instant::now();
        let document = Html::parse_document(html);
        let selector = Selector::parse(&self.item_selector)
            .map_err(|e| anyhow!("invalid item_selector `{}`: {e}", self.item_selector))?;

        let mut out = Vec::new();
        for element in document.select(&selector) {
            let text = element_text(&element);

            let href = if self.href_attr == "text" {
                text.clone()
            } else {
                element
                    .value()
                    .attr(&self.href_attr)
                    .unwrap_or_default()
                    .trim()
                    .to_string()
            };
            if href.is_empty() {
                continue;
            }
            let href = self.resolve_href(href);

            let title = if self.title_attr == "text" {
                text
            } else {
                element
                    .value()
                    .attr(&self.title_attr)
                    .unwrap_or_default()
                    .trim()
                    .to_string()
            };
            let title = if title.is_empty() {
                NO_TITLE.to_string()
            } else {
                title
            };

            out.push(Listing {
                title,
                url: href,
                summary: String::new(),
                source: self.url.clone(),
                feed_name: self.feed_name.clone(),
                kind: SourceKind::Scraped,
                preference_score: None,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("ingest_parse_ms").record(ms);
        counter!("ingest_listings_total").increment(out.len() as u64);
        Ok(out)
    }

    /// Root-relative hrefs are resolved against the page url; anything else
    /// is kept verbatim (best effort, this is an adapter).
    fn resolve_href(&self, href: String) -> String {
        if !href.starts_with('/') {
            return href;
        }
        match Url::parse(&self.url).and_then(|base| base.join(&href)) {
            Ok(abs) => abs.to_string(),
            Err(_) => href,
        }
    }
}

#[async_trait]
impl ListingSource for HtmlListProvider {
    async fn fetch_listings(&self) -> Result<Vec<Listing>> {
        match &self.mode {
            Mode::Fixture(html) => self.parse_listing_page(html),
            Mode::Http(client) => {
                let body = client
                    .get(&self.url)
                    .send()
                    .await
                    .with_context(|| format!("fetching listing page {}", self.url))?
                    .error_for_status()
                    .with_context(|| format!("listing page {} returned non-2xx", self.url))?
                    .text()
                    .await
                    .with_context(|| format!("reading page body from {}", self.url))?;
                self.parse_listing_page(&body)
            }
        }
    }

    fn name(&self) -> &str {
        &self.feed_name
    }
}

/// Collected text of an element with whitespace collapsed, the closest
/// equivalent of a stripped text extraction.
fn element_text(element: &scraper::ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Listing sites are quick to serve bot walls to bare clients; send the
/// header set of an ordinary desktop browser.
fn build_client() -> Result<reqwest::Client> {
    let user_agent = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                      (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
            .parse()
            .expect("accept header"),
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        "en-US,en;q=0.5".parse().expect("accept-language header"),
    );
    headers.insert(
        reqwest::header::DNT,
        "1".parse().expect("dnt header"),
    );
    headers.insert(
        reqwest::header::CONNECTION,
        "keep-alive".parse().expect("connection header"),
    );
    headers.insert(
        reqwest::header::UPGRADE_INSECURE_REQUESTS,
        "1".parse().expect("upgrade-insecure-requests header"),
    );

    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(user_agent)
        .default_headers(headers)
        .build()
        .context("building http client for listing pages")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HtmlSourceCfg;

    fn cfg(selector: &str) -> HtmlSourceCfg {
        HtmlSourceCfg {
            url: "https://rentals.test/search".to_string(),
            name: "rentals".to_string(),
            item_selector: selector.to_string(),
            title_attr: "text".to_string(),
            href_attr: "href".to_string(),
        }
    }

    const PAGE: &str = r#"<html><body>
      <ul>
        <li><a class="result" href="/apt/1">Bright 1BR, $2,100</a></li>
        <li><a class="result" href="https://rentals.test/apt/2">Studio with W/D</a></li>
        <li><a class="result">No link at all</a></li>
        <li><a class="result" href="/apt/3">  </a></li>
      </ul>
    </body></html>"#;

    #[tokio::test]
    async fn selector_extraction_resolves_relative_hrefs() {
        let p = HtmlListProvider::from_fixture_str(&cfg("a.result"), PAGE);
        let items = p.fetch_listings().await.expect("parse ok");
        assert_eq!(items.len(), 3, "entry without href is skipped");
        assert_eq!(items[0].url, "https://rentals.test/apt/1");
        assert_eq!(items[0].title, "Bright 1BR, $2,100");
        assert_eq!(items[1].url, "https://rentals.test/apt/2");
        assert!(items.iter().all(|l| l.kind == SourceKind::Scraped));
        assert!(items.iter().all(|l| l.summary.is_empty()));
    }

    #[tokio::test]
    async fn empty_text_becomes_placeholder_title() {
        let p = HtmlListProvider::from_fixture_str(&cfg("a.result"), PAGE);
        let items = p.fetch_listings().await.expect("parse ok");
        assert_eq!(items[2].title, NO_TITLE);
        assert_eq!(items[2].url, "https://rentals.test/apt/3");
    }

    #[tokio::test]
    async fn title_from_attribute_when_configured() {
        let mut c = cfg("a.result");
        c.title_attr = "data-name".to_string();
        let page = r#"<a class="result" href="/x" data-name="Attr Title">ignored</a>"#;
        let p = HtmlListProvider::from_fixture_str(&c, page);
        let items = p.fetch_listings().await.expect("parse ok");
        assert_eq!(items[0].title, "Attr Title");
    }

    #[tokio::test]
    async fn bad_selector_is_an_error() {
        let p = HtmlListProvider::from_fixture_str(&cfg("li:::"), PAGE);
        assert!(p.fetch_listings().await.is_err());
    }
}
