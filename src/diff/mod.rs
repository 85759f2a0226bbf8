//! Change detection - fingerprint comparison and sync decisions

mod compare;

pub use compare::{decide, should_sync, SyncDecision};
