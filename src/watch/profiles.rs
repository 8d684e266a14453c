// src/watch/profiles.rs

//! Glob profiles deciding which pipelines a changed path feeds.

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::config::ConfigFile;
use crate::engine::WatchChannel;
use crate::errors::{DocwatchError, Result};

/// The four compiled watch profiles.
///
/// - mirror: everything under the source root
/// - styles: the theme config, definitions with the style extension, and
///   override files under the site and packaged-theme trees
/// - scripts: `.js` files under the definitions tree
/// - assets: component-named files (singular or plural, any extension)
///   under `assets/` directories of the packaged-theme tree
#[derive(Debug)]
pub struct WatchProfiles {
    mirror: GlobSet,
    styles: GlobSet,
    scripts: GlobSet,
    assets: GlobSet,
}

impl WatchProfiles {
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        let src = &cfg.source;

        let mirror = build_set(&[format!("{}**", src.root)])?;

        let mut style_globs = vec![
            src.config.clone(),
            format!("{}**/*.{}", src.definitions, src.style_ext),
        ];
        for root in [&src.site, &src.themes] {
            for ext in &src.override_exts {
                style_globs.push(format!("{root}**/*.{ext}"));
            }
        }
        let styles = build_set(&style_globs)?;

        let scripts = build_set(&[format!("{}**/*.js", src.definitions)])?;

        let mut asset_globs = Vec::new();
        for component in &cfg.assets.components {
            asset_globs.push(format!("{}**/assets/**/{component}.*", src.themes));
            asset_globs.push(format!("{}**/assets/**/{component}s.*", src.themes));
        }
        let assets = build_set(&asset_globs)?;

        Ok(Self {
            mirror,
            styles,
            scripts,
            assets,
        })
    }

    /// Every channel whose profile matches this relative path.
    pub fn channels_for(&self, rel_path: &str) -> Vec<WatchChannel> {
        let mut channels = Vec::new();
        if self.mirror.is_match(rel_path) {
            channels.push(WatchChannel::SourceMirror);
        }
        if self.styles.is_match(rel_path) {
            channels.push(WatchChannel::Styles);
        }
        if self.scripts.is_match(rel_path) {
            channels.push(WatchChannel::Scripts);
        }
        if self.assets.is_match(rel_path) {
            channels.push(WatchChannel::ThemeAssets);
        }
        channels
    }
}

fn build_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| DocwatchError::ConfigError(format!("bad watch glob {pattern:?}: {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| DocwatchError::ConfigError(format!("building watch globs: {e}")))
}
