// src/pipeline/assets.rs

//! Theme asset copy.
//!
//! Assets reach this pipeline already filtered by the component-named
//! watch glob; the handler itself copies unconditionally.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::engine::BuildOutcome;
use crate::errors::Result;
use crate::route::{rel_str, strip_root};

use super::BuildContext;

pub async fn copy_asset(ctx: &BuildContext, path: &Path) -> Result<BuildOutcome> {
    let rel = rel_str(path);

    if !ctx.fs.is_file(path) {
        warn!(source = %rel, "theme asset missing; skipping copy");
        return Ok(BuildOutcome::Skipped);
    }

    let Some(below) = strip_root(&rel, &ctx.config.source.themes) else {
        warn!(source = %rel, "asset outside the themes root; skipping");
        return Ok(BuildOutcome::Skipped);
    };

    let target = PathBuf::from(format!("{}{}", ctx.config.output.themes, below));
    ctx.copy_output(path, &target)?;
    Ok(BuildOutcome::Success)
}
