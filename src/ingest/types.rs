// src/ingest/types.rs
use anyhow::Result;

/// One candidate rental listing, normalized from whatever shape its source
/// produced. The `url` is the canonical identity: two listings whose urls are
/// equal after trim + lowercase are the same listing, whatever the rest says.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    pub url: String,
    pub summary: String,
    /// Originating feed/page identifier (usually the source url).
    pub source: String,
    /// Human-readable label for the source, from configuration.
    pub feed_name: String,
    pub kind: SourceKind,
    /// Stamped by the preference scorer after the listing passes eligibility;
    /// `None` until then.
    pub preference_score: Option<u32>,
}

impl Listing {
    /// The uniform text surface for every keyword/pattern rule: lower-cased
    /// concatenation of title, summary and url.
    pub fn haystack(&self) -> String {
        format!("{} {} {}", self.title, self.summary, self.url).to_lowercase()
    }

    /// Identity key for deduplication. An empty url yields an empty key, so
    /// url-less listings all collapse onto one another.
    pub fn dedup_key(&self) -> String {
        self.url.trim().to_lowercase()
    }
}

/// How a listing arrived. Affects only the ranking tie-break ("scraped" sorts
/// before "syndicated"), never filtering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Scraped,
    Syndicated,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Scraped => "scraped",
            SourceKind::Syndicated => "syndicated",
        }
    }
}

#[async_trait::async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch and parse the source's current listings. Recoverable fetch/parse
    /// problems surface as `Err`; the orchestrator logs them and moves on.
    async fn fetch_listings(&self) -> Result<Vec<Listing>>;
    fn name(&self) -> &str;
}
