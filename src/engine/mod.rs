// src/engine/mod.rs

//! Orchestration engine for docwatch.
//!
//! This module ties together:
//! - change classification (via [`crate::route`])
//! - the keyed in-flight build table (what happens when a change arrives
//!   while a build for the same target is active)
//! - the main runtime event loop that reacts to:
//!   - watcher change events
//!   - build completion events
//!   - package requests from finished pipelines
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::fmt;
use std::path::PathBuf;

/// Key identifying a build target: the relative path whose outputs the
/// build produces. Two jobs with the same key write the same files.
pub type BuildKey = String;

/// Which watch registration produced a change event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchChannel {
    /// Full source tree; mirrored verbatim.
    SourceMirror,
    /// Style definitions, theme overrides and the theme config.
    Styles,
    /// Script sources under the definitions tree.
    Scripts,
    /// Component-named files under theme asset directories.
    ThemeAssets,
}

/// A single unit of work dispatched to the build backend.
///
/// Paths are relative to the project root with forward slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildJob {
    /// Compile a resolved style definition into both compression branches.
    Style { source: PathBuf },
    /// Copy + minify a script source.
    Script { path: PathBuf },
    /// Copy a theme asset.
    Asset { path: PathBuf },
    /// Mirror a source file verbatim.
    Mirror { path: PathBuf },
}

impl BuildJob {
    /// The in-flight table key for this job.
    ///
    /// Style builds key on the *resolved* source, so edits to a theme
    /// override and to its matching definition contend for the same slot.
    pub fn key(&self) -> BuildKey {
        let (tag, path) = match self {
            BuildJob::Style { source } => ("style", source),
            BuildJob::Script { path } => ("script", path),
            BuildJob::Asset { path } => ("asset", path),
            BuildJob::Mirror { path } => ("mirror", path),
        };
        format!("{tag}:{}", path.to_string_lossy().replace('\\', "/"))
    }
}

/// Outcome of one build pipeline execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildOutcome {
    /// All branches wrote their outputs.
    Success,
    /// Compile/minify/write failed; logged, outputs possibly partial.
    Failed,
    /// Resolved source missing on disk; nothing written.
    Skipped,
}

/// Named downstream action requested after a pipeline finishes.
///
/// These are fire-and-forget signals to external tooling; no result is
/// consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageAction {
    UncompressedCss,
    CompressedCss,
    UncompressedJs,
    CompressedJs,
    /// Requested when the theme config itself changes.
    FullRebuild,
}

impl fmt::Display for PackageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PackageAction::UncompressedCss => "package uncompressed docs css",
            PackageAction::CompressedCss => "package compressed docs css",
            PackageAction::UncompressedJs => "package uncompressed docs js",
            PackageAction::CompressedJs => "package compressed docs js",
            PackageAction::FullRebuild => "build docs",
        };
        f.write_str(name)
    }
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// If true, exit the runtime once no builds are in flight and nothing
    /// is parked in the table. Production runs keep this false; tests use
    /// it to drive the runtime to completion.
    pub exit_when_idle: bool,
}

/// Events flowing into the runtime from the watcher, pipelines, etc.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// The watcher observed a created/modified path on one channel.
    ChangeDetected {
        channel: WatchChannel,
        path: PathBuf,
    },
    /// A build pipeline finished with a concrete outcome.
    ///
    /// Cancelled (superseded) build instances never send this. The
    /// generation identifies which instance finished: a build that
    /// completes in the window before its cancellation lands still
    /// reports, and the stale generation lets the table ignore it.
    BuildFinished {
        key: BuildKey,
        generation: u64,
        outcome: BuildOutcome,
    },
    /// A pipeline asked for a downstream package action.
    PackageRequested { action: PackageAction },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod inflight;
pub mod runtime;

pub use crate::types::OverlapPolicy;
pub use self::core::{CoreCommand, CoreRuntime, CoreStep};
pub use self::inflight::InflightTable;
pub use self::runtime::Runtime;
