// src/package.rs

//! Downstream package actions.
//!
//! Pipelines finish by asking for a named package action (repackage the
//! docs CSS, rebuild everything, ...). Whether anything happens depends on
//! the `[package]` section: each action maps to an optional shell command,
//! launched fire-and-forget. Unset actions are logged and dropped.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, error, info};

use crate::config::PackageSection;
use crate::engine::PackageAction;
use crate::errors::Result;

pub type PackageFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

/// Seam between the runtime and downstream packaging tools.
pub trait Packager: Send + Debug {
    fn package(&mut self, action: PackageAction) -> PackageFuture<'_>;
}

/// Packager that launches the configured `[package]` commands.
///
/// Commands are spawned detached; their exit status is reaped in a
/// background task and logged, never awaited by the runtime.
#[derive(Debug, Clone)]
pub struct CommandPackager {
    package: PackageSection,
}

impl CommandPackager {
    pub fn new(package: PackageSection) -> Self {
        Self { package }
    }

    fn command_for(&self, action: PackageAction) -> Option<&str> {
        match action {
            PackageAction::UncompressedCss => self.package.uncompressed_css.as_deref(),
            PackageAction::CompressedCss => self.package.compressed_css.as_deref(),
            PackageAction::UncompressedJs => self.package.uncompressed_js.as_deref(),
            PackageAction::CompressedJs => self.package.compressed_js.as_deref(),
            PackageAction::FullRebuild => self.package.full_rebuild.as_deref(),
        }
    }

    #[cfg(not(windows))]
    fn shell(command_line: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command_line);
        cmd
    }

    #[cfg(windows)]
    fn shell(command_line: &str) -> Command {
        let mut cmd = Command::new("cmd");
        cmd.arg("/C").arg(command_line);
        cmd
    }
}

impl Packager for CommandPackager {
    fn package(&mut self, action: PackageAction) -> PackageFuture<'_> {
        Box::pin(async move {
            let Some(command_line) = self.command_for(action) else {
                debug!(%action, "no package command configured; dropping");
                return Ok(());
            };

            info!(%action, command = command_line, "launching package command");

            let spawned = Self::shell(command_line)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();

            match spawned {
                Ok(mut child) => {
                    let action_name = action.to_string();
                    tokio::spawn(async move {
                        match child.wait().await {
                            Ok(status) if status.success() => {
                                debug!(action = %action_name, "package command finished");
                            }
                            Ok(status) => {
                                error!(action = %action_name, %status, "package command failed");
                            }
                            Err(e) => {
                                error!(action = %action_name, error = %e, "package command lost");
                            }
                        }
                    });
                }
                Err(e) => {
                    // Packaging is best-effort; a broken command must not
                    // take the watcher down.
                    error!(%action, error = %e, "failed to launch package command");
                }
            }

            Ok(())
        })
    }
}
