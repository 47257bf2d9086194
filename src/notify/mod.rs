// src/notify/mod.rs
//! Outbound notifications. Email is the only channel; it is optional at
//! runtime and never blocks or fails the pipeline.

pub mod email;

pub use email::EmailNotifier;
