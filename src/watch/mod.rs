// src/watch/mod.rs

//! Filesystem watching.
//!
//! One recursive `notify` watcher covers the project root; changed paths
//! are made relative and run through four glob profiles ([`profiles`]),
//! one per [`WatchChannel`](crate::engine::WatchChannel). A path matching
//! several profiles produces one event per match.

pub mod profiles;
pub mod watcher;

pub use profiles::WatchProfiles;
pub use watcher::{spawn, ChangeWatcher};
