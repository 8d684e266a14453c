// src/engine/runtime.rs

use std::collections::HashMap;
use std::fmt;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use crate::errors::Result;
use crate::package::Packager;
use crate::pipeline::BuildBackend;

use super::core::{CoreCommand, CoreRuntime};
use super::{BuildKey, RuntimeEvent};

/// Drives the build pipelines in response to `RuntimeEvent`s, and
/// delegates actual work to a [`BuildBackend`] and a [`Packager`].
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// runtime semantics. This struct handles async IO: reading events from
/// the channel, starting/cancelling build tasks and invoking the
/// packager.
pub struct Runtime<B: BuildBackend, P: Packager> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    builds: B,
    packager: P,
    /// Cancellation handle and generation of the in-flight build owning
    /// each key's slot.
    cancels: HashMap<BuildKey, (u64, oneshot::Sender<()>)>,
}

impl<B: BuildBackend, P: Packager> fmt::Debug for Runtime<B, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<B: BuildBackend, P: Packager> Runtime<B, P> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        builds: B,
        packager: P,
    ) -> Self {
        Self {
            core,
            event_rx,
            builds,
            packager,
            cancels: HashMap::new(),
        }
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core runtime.
    /// - Executes the commands returned by the core.
    ///
    /// Per-file build failures surface as `BuildFinished` events and never
    /// break this loop; the watcher stays alive until shutdown.
    pub async fn run(mut self) -> Result<()> {
        info!("docwatch runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            // Completed builds no longer need their cancellation handle.
            // A stale completion (superseded instance that finished before
            // its cancel arrived) must leave the new build's handle alone.
            if let RuntimeEvent::BuildFinished {
                key, generation, ..
            } = &event
            {
                if self
                    .cancels
                    .get(key)
                    .is_some_and(|(current, _)| current == generation)
                {
                    self.cancels.remove(key);
                }
            }

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");
        Ok(())
    }

    /// Execute a single command from the core.
    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::StartBuild { job, generation } => {
                let key = job.key();
                let (cancel_tx, cancel_rx) = oneshot::channel();
                self.cancels.insert(key, (generation, cancel_tx));
                self.builds.start_build(job, generation, cancel_rx).await?;
            }
            CoreCommand::CancelBuild(key) => {
                if let Some((_, cancel)) = self.cancels.remove(&key) {
                    if cancel.send(()).is_err() {
                        debug!(key = %key, "build finished before cancellation arrived");
                    }
                } else {
                    debug!(key = %key, "no cancellation handle for key");
                }
            }
            CoreCommand::Package(action) => {
                self.packager.package(action).await?;
            }
            CoreCommand::RequestExit => {
                // keep_running already handles the actual exit; just log.
                info!("core issued RequestExit command");
            }
        }
        Ok(())
    }
}
