use docwatch::route::{ChangeCategory, Router};
use docwatch_test_utils::builders::ConfigFileBuilder;
use proptest::prelude::*;

fn router() -> Router {
    Router::from_config(&ConfigFileBuilder::new().build())
}

#[test]
fn classification_order_is_config_theme_site_definition() {
    let r = router();

    assert_eq!(r.classify("src/theme.config"), Some(ChangeCategory::Config));
    assert_eq!(
        r.classify("src/themes/default/elements/button.overrides"),
        Some(ChangeCategory::PackagedTheme)
    );
    assert_eq!(
        r.classify("src/site/elements/button.variables"),
        Some(ChangeCategory::SiteTheme)
    );
    assert_eq!(
        r.classify("src/definitions/elements/button.less"),
        Some(ChangeCategory::Definition)
    );
    assert_eq!(r.classify("unrelated/file.less"), None);
}

#[test]
fn packaged_theme_path_collapses_the_theme_directory() {
    let r = router();
    let resolved = r
        .resolve(
            "src/themes/material/collections/menu.variables",
            ChangeCategory::PackagedTheme,
        )
        .unwrap();
    assert_eq!(resolved, "src/definitions/collections/menu.less");
}

#[test]
fn site_override_maps_onto_definitions() {
    let r = router();
    let resolved = r
        .resolve(
            "src/site/elements/button.overrides",
            ChangeCategory::SiteTheme,
        )
        .unwrap();
    assert_eq!(resolved, "src/definitions/elements/button.less");
}

#[test]
fn definition_change_only_rewrites_extension() {
    let r = router();
    let resolved = r
        .resolve(
            "src/definitions/modules/dropdown.less",
            ChangeCategory::Definition,
        )
        .unwrap();
    assert_eq!(resolved, "src/definitions/modules/dropdown.less");
}

#[test]
fn config_changes_never_resolve() {
    let r = router();
    assert_eq!(r.resolve("src/theme.config", ChangeCategory::Config), None);
}

proptest! {
    /// Overrides at any depth, under either override tree, resolve to a
    /// definitions-root path carrying the style extension.
    #[test]
    fn overrides_resolve_into_the_definitions_tree(
        theme in "[a-z]{1,8}",
        segments in prop::collection::vec("[a-z]{1,8}", 1..4),
        name in "[a-z]{1,8}",
        ext in prop::sample::select(vec!["overrides", "variables"]),
    ) {
        let r = router();
        let below = format!("{}/{name}.{ext}", segments.join("/"));

        let themed = format!("src/themes/{theme}/{below}");
        let resolved = r.resolve(&themed, ChangeCategory::PackagedTheme).unwrap();
        prop_assert!(resolved.starts_with("src/definitions/"));
        prop_assert!(resolved.ends_with(".less"));
        prop_assert_eq!(
            &resolved,
            &format!("src/definitions/{}/{name}.less", segments.join("/"))
        );

        let sited = format!("src/site/{below}");
        let resolved = r.resolve(&sited, ChangeCategory::SiteTheme).unwrap();
        prop_assert_eq!(
            resolved,
            format!("src/definitions/{}/{name}.less", segments.join("/"))
        );
    }
}
