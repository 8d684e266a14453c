// src/route/resolve.rs

use super::{ChangeCategory, Router};

/// Resolve a classified change to the style-definition path that must be
/// recompiled (relative to the project root, forward slashes).
///
/// - `PackagedTheme`: replace the packaged-theme root *and the theme name
///   directory under it* with the definitions root, then rewrite the
///   extension. Every packaged theme overrides the same definition tree,
///   so `themes/<name>/` collapses away.
/// - `SiteTheme`: replace the site root with the definitions root, then
///   rewrite the extension.
/// - `Definition`: rewrite the extension only.
/// - `Config`: returns `None`; config changes bypass per-file resolution
///   and trigger a full rebuild at the engine level.
///
/// The result is deterministic given path and category. Whether the file
/// exists on disk is checked later, by the style pipeline.
pub fn resolve(rel_path: &str, category: ChangeCategory, router: &Router) -> Option<String> {
    let mapped = match category {
        ChangeCategory::Config => return None,
        ChangeCategory::PackagedTheme => {
            replace_theme_prefix(rel_path, router.themes(), router.definitions())?
        }
        ChangeCategory::SiteTheme => replace_prefix(rel_path, router.site(), router.definitions())?,
        ChangeCategory::Definition => rel_path.to_string(),
    };

    Some(replace_extension(&mapped, router.style_ext()))
}

/// Replace the first occurrence of `from` in `path` with `to`.
///
/// Classification guarantees the prefix occurs somewhere in the path; if
/// it somehow does not, the path cannot be mapped and resolution fails.
fn replace_prefix(path: &str, from: &str, to: &str) -> Option<String> {
    if !path.contains(from) {
        return None;
    }
    Some(path.replacen(from, to, 1))
}

/// Replace `<themes-root><theme-name>/` with the definitions root.
fn replace_theme_prefix(path: &str, themes_root: &str, definitions: &str) -> Option<String> {
    let start = path.find(themes_root)?;
    let after_root = &path[start + themes_root.len()..];
    let theme_end = after_root.find('/')?;
    let below_theme = &after_root[theme_end + 1..];
    Some(format!("{}{}{}", &path[..start], definitions, below_theme))
}

/// Rewrite the final extension of `path` to `ext`. A path with no
/// extension gets one appended.
pub fn replace_extension(path: &str, ext: &str) -> String {
    // Only look for a dot inside the final component so dotted directory
    // names are left alone.
    let file_start = path.rfind('/').map(|i| i + 1).unwrap_or(0);
    match path[file_start..].rfind('.') {
        Some(dot) => format!("{}.{}", &path[..file_start + dot], ext),
        None => format!("{path}.{ext}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFile, RawConfigFile};
    use crate::route::Router;

    fn router() -> Router {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        Router::from_config(&cfg)
    }

    #[test]
    fn packaged_theme_maps_to_definitions() {
        let r = router();
        let out = resolve(
            "src/themes/default/elements/button.variables",
            ChangeCategory::PackagedTheme,
            &r,
        );
        assert_eq!(out.as_deref(), Some("src/definitions/elements/button.less"));
    }

    #[test]
    fn site_theme_maps_to_definitions() {
        let r = router();
        let out = resolve(
            "src/site/collections/menu.overrides",
            ChangeCategory::SiteTheme,
            &r,
        );
        assert_eq!(out.as_deref(), Some("src/definitions/collections/menu.less"));
    }

    #[test]
    fn definition_only_rewrites_extension() {
        let r = router();
        let out = resolve(
            "src/definitions/elements/button.less",
            ChangeCategory::Definition,
            &r,
        );
        assert_eq!(out.as_deref(), Some("src/definitions/elements/button.less"));
    }

    #[test]
    fn config_bypasses_resolution() {
        let r = router();
        assert_eq!(resolve("src/theme.config", ChangeCategory::Config, &r), None);
    }

    #[test]
    fn depth_does_not_matter() {
        let r = router();
        let out = resolve(
            "src/themes/material/very/deep/nesting/input.variables",
            ChangeCategory::PackagedTheme,
            &r,
        );
        assert_eq!(
            out.as_deref(),
            Some("src/definitions/very/deep/nesting/input.less")
        );
    }

    #[test]
    fn extension_rewrite_ignores_dotted_dirs() {
        assert_eq!(
            replace_extension("src/v1.2/button.overrides", "less"),
            "src/v1.2/button.less"
        );
        assert_eq!(replace_extension("src/defs/button", "less"), "src/defs/button.less");
    }
}
