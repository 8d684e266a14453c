// src/route/classify.rs

use tracing::info;

use super::Router;

/// Which part of the source tree a changed path belongs to.
///
/// Categories are checked in a fixed order and the first match wins, so a
/// theme config file sitting under the themes root still classifies as
/// `Config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCategory {
    /// The theme config marker changed; short-circuits to a full rebuild.
    Config,
    /// A packaged (distributable) theme override changed.
    PackagedTheme,
    /// A site-local theme override changed.
    SiteTheme,
    /// A style definition itself changed.
    Definition,
}

/// Classify a changed path (relative to the project root, forward
/// slashes) by substring matching against the configured roots.
///
/// Returns `None` for paths that belong to none of the four categories;
/// no error is raised for those, matching the historical behaviour where
/// an unrecognized change simply produced no buildable source.
pub fn classify(rel_path: &str, router: &Router) -> Option<ChangeCategory> {
    let category = if rel_path.contains(router.config_marker()) {
        ChangeCategory::Config
    } else if rel_path.contains(router.themes()) {
        ChangeCategory::PackagedTheme
    } else if rel_path.contains(router.site()) {
        ChangeCategory::SiteTheme
    } else if rel_path.contains(router.definitions()) {
        ChangeCategory::Definition
    } else {
        return None;
    };

    match category {
        ChangeCategory::Config => info!(path = %rel_path, "change detected in theme config"),
        ChangeCategory::PackagedTheme => {
            info!(path = %rel_path, "change detected in packaged theme")
        }
        ChangeCategory::SiteTheme => info!(path = %rel_path, "change detected in site theme"),
        ChangeCategory::Definition => info!(path = %rel_path, "change detected in definition"),
    }

    Some(category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use crate::config::RawConfigFile;

    fn router() -> Router {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        Router::from_config(&cfg)
    }

    #[test]
    fn config_marker_wins() {
        let r = router();
        assert_eq!(r.classify("src/theme.config"), Some(ChangeCategory::Config));
    }

    #[test]
    fn packaged_theme_before_site() {
        let r = router();
        assert_eq!(
            r.classify("src/themes/default/elements/button.variables"),
            Some(ChangeCategory::PackagedTheme)
        );
        assert_eq!(
            r.classify("src/site/elements/button.overrides"),
            Some(ChangeCategory::SiteTheme)
        );
    }

    #[test]
    fn definitions_match() {
        let r = router();
        assert_eq!(
            r.classify("src/definitions/elements/button.less"),
            Some(ChangeCategory::Definition)
        );
    }

    #[test]
    fn unrelated_path_is_unrecognized() {
        let r = router();
        assert_eq!(r.classify("README.md"), None);
        assert_eq!(r.classify("docs/index.html"), None);
    }
}
