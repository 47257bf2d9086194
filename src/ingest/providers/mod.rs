// src/ingest/providers/mod.rs
pub mod html_list;
pub mod rss;
