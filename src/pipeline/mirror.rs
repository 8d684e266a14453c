// src/pipeline/mirror.rs

//! Verbatim source mirror.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::engine::BuildOutcome;
use crate::errors::Result;
use crate::route::{rel_str, strip_root};

use super::BuildContext;

pub async fn mirror_file(ctx: &BuildContext, path: &Path) -> Result<BuildOutcome> {
    let rel = rel_str(path);

    if !ctx.fs.is_file(path) {
        // Deletions and directory events reach the mirror channel too;
        // only real files are copied.
        return Ok(BuildOutcome::Skipped);
    }

    let Some(below) = strip_root(&rel, &ctx.config.source.root) else {
        warn!(source = %rel, "change outside the source root; skipping mirror");
        return Ok(BuildOutcome::Skipped);
    };

    let target = PathBuf::from(format!("{}{}", ctx.config.output.mirror, below));
    ctx.copy_output(path, &target)?;
    Ok(BuildOutcome::Success)
}
