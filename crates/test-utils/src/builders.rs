#![allow(dead_code)]

use docwatch::config::{ConfigFile, RawConfigFile};
use docwatch::types::OverlapPolicy;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_components(mut self, names: &[&str]) -> Self {
        self.config.assets.components = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_overlap(mut self, policy: OverlapPolicy) -> Self {
        self.config.build.overlap = policy;
        self
    }

    pub fn with_permission(mut self, octal: &str) -> Self {
        self.config.build.permission = Some(octal.to_string());
        self
    }

    pub fn with_banner(mut self, template: &str) -> Self {
        self.config.build.banner = template.to_string();
        self
    }

    pub fn with_name_version(mut self, name: &str, version: &str) -> Self {
        self.config.build.name = name.to_string();
        self.config.build.version = version.to_string();
        self
    }

    pub fn with_asset_rewrites(mut self, source: &str, uncompressed: &str, compressed: &str) -> Self {
        self.config.assets.source = source.to_string();
        self.config.assets.uncompressed = uncompressed.to_string();
        self.config.assets.compressed = compressed.to_string();
        self
    }

    pub fn with_package_command(mut self, full_rebuild: &str) -> Self {
        self.config.package.full_rebuild = Some(full_rebuild.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
