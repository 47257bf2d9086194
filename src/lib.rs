// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod ingest;
pub mod notify;
pub mod pipeline;
pub mod report;

// ---- Re-exports for stable public API ----
pub use crate::config::ScoutConfig;
pub use crate::ingest::types::{Listing, ListingSource, SourceKind};
pub use crate::notify::EmailNotifier;
pub use crate::pipeline::select_matches;
