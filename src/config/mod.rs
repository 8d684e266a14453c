// src/config/mod.rs

//! Configuration loading, validation and normalization.
//!
//! - [`model`] maps `Docwatch.toml` onto serde structs.
//! - [`validate`] converts the raw file into a validated [`ConfigFile`]
//!   with normalized directory roots.
//! - [`loader`] reads the file from disk.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{
    AssetsSection, BuildSection, ConfigFile, OutputSection, PackageSection, RawConfigFile,
    SourceSection, ToolsSection,
};
