// src/pipeline/mod.rs

//! Build pipelines: the work done for one changed file.
//!
//! Each pipeline is an async function taking a [`BuildContext`] plus a
//! path, returning a [`BuildOutcome`](crate::engine::BuildOutcome). All IO
//! goes through the context's [`FileSystem`] and [`Toolchain`] handles, so
//! every pipeline runs unchanged against the in-memory fakes in tests.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::config::ConfigFile;
use crate::engine::{PackageAction, RuntimeEvent};
use crate::errors::Result;
use crate::fs::FileSystem;
use crate::tools::Toolchain;

pub mod assets;
pub mod backend;
pub mod banner;
pub mod comments;
pub mod mirror;
pub mod script;
pub mod style;

pub use backend::{BuildBackend, RealBuildBackend};

/// Shared dependencies handed to every pipeline run.
#[derive(Clone)]
pub struct BuildContext {
    pub config: Arc<ConfigFile>,
    pub fs: Arc<dyn FileSystem>,
    pub tools: Arc<dyn Toolchain>,
    /// Channel back into the runtime, used for package requests and by
    /// the backend for completion events.
    pub event_tx: mpsc::Sender<RuntimeEvent>,
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BuildContext {
    /// Ask the runtime to run a downstream package action.
    ///
    /// Best-effort: if the runtime is already gone the request is dropped.
    pub async fn request_package(&self, action: PackageAction) {
        let _ = self
            .event_tx
            .send(RuntimeEvent::PackageRequested { action })
            .await;
    }

    /// Write an output file, stamp the configured permission mode, and
    /// log the creation.
    pub(crate) fn write_output(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.fs.write(path, contents)?;
        self.stamp_mode(path)?;
        info!(path = %path.display(), "created");
        Ok(())
    }

    /// Copy a file into an output location, stamp permissions, log.
    pub(crate) fn copy_output(&self, from: &Path, to: &Path) -> Result<()> {
        self.fs.copy(from, to)?;
        self.stamp_mode(to)?;
        info!(path = %to.display(), "created");
        Ok(())
    }

    fn stamp_mode(&self, path: &Path) -> Result<()> {
        if let Some(mode) = self.config.build.permission_mode() {
            self.fs.set_mode(path, mode)?;
        }
        Ok(())
    }
}

/// Insert `.min` before the final extension: `elements/button.css`
/// becomes `elements/button.min.css`. A path without an extension gets
/// `.min` appended.
pub fn min_name(rel: &str) -> String {
    match rel.rfind('.') {
        Some(idx) if !rel[idx + 1..].contains('/') => {
            format!("{}.min{}", &rel[..idx], &rel[idx..])
        }
        _ => format!("{rel}.min"),
    }
}

#[cfg(test)]
mod tests {
    use super::min_name;

    #[test]
    fn min_name_inserts_before_extension() {
        assert_eq!(min_name("elements/button.css"), "elements/button.min.css");
        assert_eq!(min_name("a.b/file.js"), "a.b/file.min.js");
    }

    #[test]
    fn min_name_appends_without_extension() {
        assert_eq!(min_name("Makefile"), "Makefile.min");
        assert_eq!(min_name("dir.v2/file"), "dir.v2/file.min");
    }
}
