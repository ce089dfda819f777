//! Infrastructure layer: store, cache tiers, and the analytics sink.

pub mod analytics;
pub mod cache;
pub mod persistence;
