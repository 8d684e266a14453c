// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated in-flight table
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible
//! for:
//! - reading events from channels
//! - starting and cancelling build tasks
//! - invoking the packager
//!
//! The core is intended to be extensively unit tested without any Tokio,
//! channels, filesystem, or processes.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::engine::inflight::InflightTable;
use crate::engine::{
    BuildJob, BuildKey, PackageAction, RuntimeEvent, RuntimeOptions, WatchChannel,
};
use crate::route::{rel_str, ChangeCategory, Router};
use crate::types::OverlapPolicy;

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Start the given build instance in the backend. The generation must
    /// be echoed back in the instance's `BuildFinished` event.
    StartBuild { job: BuildJob, generation: u64 },
    /// Cancel the in-flight build for this key (supersede policy).
    CancelBuild(BuildKey),
    /// Forward a downstream package action to the packager.
    Package(PackageAction),
    /// Request that the process exits (idle in `exit_when_idle` mode).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    fn running(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }
}

/// Pure core runtime state.
///
/// Owns the router (classification + resolution) and the keyed in-flight
/// build table. It has **no** channels, no Tokio types, and performs no IO.
#[derive(Debug)]
pub struct CoreRuntime {
    router: Router,
    inflight: InflightTable,
    options: RuntimeOptions,
}

impl CoreRuntime {
    pub fn new(router: Router, policy: OverlapPolicy, options: RuntimeOptions) -> Self {
        Self {
            router,
            inflight: InflightTable::new(policy),
            options,
        }
    }

    /// Expose whether any builds are in flight (for tests).
    pub fn is_idle(&self) -> bool {
        self.inflight.is_idle()
    }

    /// Handle a single runtime event, updating core state and returning
    /// the resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::ChangeDetected { channel, path } => self.on_change(channel, path),
            RuntimeEvent::BuildFinished {
                key,
                generation,
                outcome,
            } => {
                debug!(key = %key, generation, ?outcome, "build finished");
                let mut commands = self.inflight.on_finished(&key, generation);

                let mut keep_running = true;
                if self.options.exit_when_idle && self.inflight.is_idle() {
                    keep_running = false;
                    commands.push(CoreCommand::RequestExit);
                }

                CoreStep {
                    commands,
                    keep_running,
                }
            }
            RuntimeEvent::PackageRequested { action } => {
                CoreStep::running(vec![CoreCommand::Package(action)])
            }
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }

    /// Turn a watcher change event into zero or more build/package
    /// commands.
    fn on_change(&mut self, channel: WatchChannel, path: PathBuf) -> CoreStep {
        let rel = rel_str(&path);

        let job = match channel {
            WatchChannel::SourceMirror => BuildJob::Mirror { path },
            WatchChannel::Scripts => BuildJob::Script { path },
            WatchChannel::ThemeAssets => BuildJob::Asset { path },
            WatchChannel::Styles => {
                let Some(category) = self.router.classify(&rel) else {
                    // Unrecognized change: no resolvable source, nothing to
                    // build. Matches the historical silent fall-through.
                    debug!(path = %rel, "style change did not classify; ignoring");
                    return CoreStep::running(Vec::new());
                };

                if category == ChangeCategory::Config {
                    return CoreStep::running(vec![CoreCommand::Package(
                        PackageAction::FullRebuild,
                    )]);
                }

                match self.router.resolve(&rel, category) {
                    Some(source) => BuildJob::Style {
                        source: PathBuf::from(source),
                    },
                    None => {
                        warn!(path = %rel, ?category, "could not resolve style source");
                        return CoreStep::running(Vec::new());
                    }
                }
            }
        };

        CoreStep::running(self.inflight.on_job(job))
    }
}
