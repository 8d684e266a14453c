// src/pipeline/banner.rs

use crate::config::BuildSection;

/// Render the configured banner template, substituting `{name}` and
/// `{version}`. An empty template disables the header.
pub fn render(build: &BuildSection) -> Option<String> {
    if build.banner.is_empty() {
        return None;
    }
    Some(
        build
            .banner
            .replace("{name}", &build.name)
            .replace("{version}", &build.version),
    )
}

/// Prepend the rendered banner to built output.
pub fn prepend(build: &BuildSection, text: &str) -> String {
    match render(build) {
        Some(banner) => format!("{banner}{text}"),
        None => text.to_string(),
    }
}
