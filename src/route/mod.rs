// src/route/mod.rs

//! Change classification and source resolution.
//!
//! This module turns a changed path into the canonical style-definition
//! file that must be recompiled:
//!
//! - [`classify`] decides which change category a path belongs to by
//!   substring matching against the configured source roots.
//! - [`resolve`] maps a classified path onto the definitions tree and
//!   rewrites the extension to the style-source extension.
//!
//! Everything here is pure: no filesystem access, no logging side channel
//! beyond a category trace. Whether the resolved file actually exists is
//! the build pipeline's concern.

pub mod classify;
pub mod resolve;

pub use classify::ChangeCategory;

use std::path::Path;

use crate::config::ConfigFile;

/// Compiled, immutable view of the path configuration used by the
/// classifier and resolver.
///
/// Root strings are normalized (forward slashes, trailing `/`) by config
/// validation before they get here.
#[derive(Debug, Clone)]
pub struct Router {
    config_marker: String,
    definitions: String,
    site: String,
    themes: String,
    style_ext: String,
}

impl Router {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            config_marker: cfg.source.config.clone(),
            definitions: cfg.source.definitions.clone(),
            site: cfg.source.site.clone(),
            themes: cfg.source.themes.clone(),
            style_ext: cfg.source.style_ext.clone(),
        }
    }

    pub fn classify(&self, rel_path: &str) -> Option<ChangeCategory> {
        classify::classify(rel_path, self)
    }

    pub fn resolve(&self, rel_path: &str, category: ChangeCategory) -> Option<String> {
        resolve::resolve(rel_path, category, self)
    }

    pub(crate) fn config_marker(&self) -> &str {
        &self.config_marker
    }

    pub(crate) fn definitions(&self) -> &str {
        &self.definitions
    }

    pub(crate) fn site(&self) -> &str {
        &self.site
    }

    pub(crate) fn themes(&self) -> &str {
        &self.themes
    }

    pub(crate) fn style_ext(&self) -> &str {
        &self.style_ext
    }
}

/// Strip a configured root prefix off a relative path.
///
/// Used by the pipelines to compute output locations that preserve the
/// path below the root (e.g. `src/definitions/elements/button.less` ->
/// `elements/button.less` below `src/definitions/`).
pub fn strip_root<'a>(rel_path: &'a str, root: &str) -> Option<&'a str> {
    rel_path.strip_prefix(root)
}

/// Forward-slash relative string for a path that is already relative.
pub fn rel_str(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
