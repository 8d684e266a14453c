// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DocwatchError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DocwatchError;

    fn try_from(mut raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        normalize_raw_config(&mut raw);
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

/// Normalize all directory roots to forward slashes with a trailing `/`,
/// so substring classification and prefix replacement behave the same on
/// every platform.
fn normalize_raw_config(raw: &mut RawConfigFile) {
    for dir in [
        &mut raw.source.root,
        &mut raw.source.definitions,
        &mut raw.source.site,
        &mut raw.source.themes,
        &mut raw.output.uncompressed,
        &mut raw.output.compressed,
        &mut raw.output.themes,
        &mut raw.output.mirror,
    ] {
        *dir = normalize_dir(dir);
    }
    raw.source.config = raw.source.config.replace('\\', "/");
}

fn normalize_dir(dir: &str) -> String {
    let mut s = dir.replace('\\', "/");
    if !s.is_empty() && !s.ends_with('/') {
        s.push('/');
    }
    s
}

fn validate_raw_config(raw: &RawConfigFile) -> Result<()> {
    validate_source(raw)?;
    validate_output(raw)?;
    validate_assets(raw)?;
    validate_build(raw)?;
    validate_tools(raw)?;
    Ok(())
}

fn validate_source(raw: &RawConfigFile) -> Result<()> {
    let src = &raw.source;

    for (field, value) in [
        ("source.root", &src.root),
        ("source.config", &src.config),
        ("source.definitions", &src.definitions),
        ("source.site", &src.site),
        ("source.themes", &src.themes),
        ("source.style_ext", &src.style_ext),
    ] {
        if value.is_empty() {
            return Err(DocwatchError::ConfigError(format!(
                "[{field}] must not be empty"
            )));
        }
    }

    // Classification relies on these prefixes being distinguishable.
    let roots = [&src.definitions, &src.site, &src.themes];
    for (i, a) in roots.iter().enumerate() {
        for b in roots.iter().skip(i + 1) {
            if a == b {
                return Err(DocwatchError::ConfigError(format!(
                    "source roots must be distinct, but two are '{a}'"
                )));
            }
        }
    }

    if src.override_exts.is_empty() {
        return Err(DocwatchError::ConfigError(
            "[source].override_exts must list at least one extension".to_string(),
        ));
    }
    for ext in &src.override_exts {
        if ext.is_empty() || ext.starts_with('.') {
            return Err(DocwatchError::ConfigError(format!(
                "[source].override_exts entries must be bare extensions (got '{ext}')"
            )));
        }
    }

    Ok(())
}

fn validate_output(raw: &RawConfigFile) -> Result<()> {
    for (field, value) in [
        ("output.uncompressed", &raw.output.uncompressed),
        ("output.compressed", &raw.output.compressed),
        ("output.themes", &raw.output.themes),
        ("output.mirror", &raw.output.mirror),
    ] {
        if value.is_empty() {
            return Err(DocwatchError::ConfigError(format!(
                "[{field}] must not be empty"
            )));
        }
    }
    Ok(())
}

fn validate_assets(raw: &RawConfigFile) -> Result<()> {
    for name in &raw.assets.components {
        if name.is_empty() {
            return Err(DocwatchError::ConfigError(
                "[assets].components must not contain empty names".to_string(),
            ));
        }
        if name
            .chars()
            .any(|c| !c.is_ascii_alphanumeric() && c != '-' && c != '_')
        {
            return Err(DocwatchError::ConfigError(format!(
                "[assets].components entry '{name}' contains glob metacharacters"
            )));
        }
    }
    Ok(())
}

fn validate_build(raw: &RawConfigFile) -> Result<()> {
    if let Some(perm) = raw.build.permission.as_deref() {
        if u32::from_str_radix(perm, 8).is_err() {
            return Err(DocwatchError::ConfigError(format!(
                "[build].permission must be an octal mode like \"644\" (got '{perm}')"
            )));
        }
    }
    Ok(())
}

fn validate_tools(raw: &RawConfigFile) -> Result<()> {
    for (field, value) in [
        ("tools.compiler", &raw.tools.compiler),
        ("tools.prefixer", &raw.tools.prefixer),
        ("tools.css_minifier", &raw.tools.css_minifier),
        ("tools.js_minifier", &raw.tools.js_minifier),
    ] {
        if value.trim().is_empty() {
            return Err(DocwatchError::ConfigError(format!(
                "[{field}] must not be empty"
            )));
        }
    }
    Ok(())
}
