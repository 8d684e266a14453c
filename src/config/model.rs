// src/config/model.rs

use serde::Deserialize;

use crate::types::OverlapPolicy;

/// Top-level configuration exactly as read from `Docwatch.toml`.
///
/// ```toml
/// [source]
/// definitions = "src/definitions/"
///
/// [output]
/// uncompressed = "docs/build/uncompressed/"
///
/// [assets]
/// components = ["button", "grid"]
/// ```
///
/// All sections are optional and default to the conventional layout. Use
/// `ConfigFile::try_from` to get a validated, path-normalized view.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Source tree roots from `[source]`.
    #[serde(default)]
    pub source: SourceSection,

    /// Build output roots from `[output]`.
    #[serde(default)]
    pub output: OutputSection,

    /// Asset reference rewriting and component names from `[assets]`.
    #[serde(default)]
    pub assets: AssetsSection,

    /// Banner, permissions and overlap policy from `[build]`.
    #[serde(default)]
    pub build: BuildSection,

    /// External tool commands from `[tools]`.
    #[serde(default)]
    pub tools: ToolsSection,

    /// Downstream package commands from `[package]`.
    #[serde(default)]
    pub package: PackageSection,
}

/// Validated configuration.
///
/// Same shape as [`RawConfigFile`], but guaranteed by `TryFrom` to have
/// non-empty, normalized directory roots (trailing `/`, forward slashes)
/// and a parsable permission string.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub source: SourceSection,
    pub output: OutputSection,
    pub assets: AssetsSection,
    pub build: BuildSection,
    pub tools: ToolsSection,
    pub package: PackageSection,
}

impl ConfigFile {
    /// Construct directly from already-validated sections.
    ///
    /// Only `validate` should call this; everyone else goes through
    /// `ConfigFile::try_from(raw)`.
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            source: raw.source,
            output: raw.output,
            assets: raw.assets,
            build: raw.build,
            tools: raw.tools,
            package: raw.package,
        }
    }
}

/// `[source]` section: where the watched tree lives.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSection {
    /// Root of the whole source tree, mirrored verbatim on any change.
    #[serde(default = "default_source_root")]
    pub root: String,

    /// Theme config marker. A changed path *containing* this string
    /// triggers a full rebuild instead of a targeted recompile.
    #[serde(default = "default_source_config")]
    pub config: String,

    /// Canonical style-definition tree, one file per UI component.
    #[serde(default = "default_source_definitions")]
    pub definitions: String,

    /// Site-local theme override tree.
    #[serde(default = "default_source_site")]
    pub site: String,

    /// Packaged (distributable) theme tree.
    #[serde(default = "default_source_themes")]
    pub themes: String,

    /// Extension of style-source files (without the dot).
    #[serde(default = "default_style_ext")]
    pub style_ext: String,

    /// Extensions of per-theme override files (without the dot).
    #[serde(default = "default_override_exts")]
    pub override_exts: Vec<String>,
}

fn default_source_root() -> String {
    "src/".to_string()
}
fn default_source_config() -> String {
    "src/theme.config".to_string()
}
fn default_source_definitions() -> String {
    "src/definitions/".to_string()
}
fn default_source_site() -> String {
    "src/site/".to_string()
}
fn default_source_themes() -> String {
    "src/themes/".to_string()
}
fn default_style_ext() -> String {
    "less".to_string()
}
fn default_override_exts() -> Vec<String> {
    vec!["overrides".to_string(), "variables".to_string()]
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            root: default_source_root(),
            config: default_source_config(),
            definitions: default_source_definitions(),
            site: default_source_site(),
            themes: default_source_themes(),
            style_ext: default_style_ext(),
            override_exts: default_override_exts(),
        }
    }
}

/// `[output]` section: where built artifacts land.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSection {
    /// Human-readable build outputs.
    #[serde(default = "default_output_uncompressed")]
    pub uncompressed: String,

    /// Minified build outputs (`.min` inserted before the extension).
    #[serde(default = "default_output_compressed")]
    pub compressed: String,

    /// Copied theme assets.
    #[serde(default = "default_output_themes")]
    pub themes: String,

    /// Verbatim mirror of the source tree.
    #[serde(default = "default_output_mirror")]
    pub mirror: String,
}

fn default_output_uncompressed() -> String {
    "docs/build/uncompressed/".to_string()
}
fn default_output_compressed() -> String {
    "docs/build/compressed/".to_string()
}
fn default_output_themes() -> String {
    "docs/build/themes/".to_string()
}
fn default_output_mirror() -> String {
    "docs/build/src/".to_string()
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            uncompressed: default_output_uncompressed(),
            compressed: default_output_compressed(),
            themes: default_output_themes(),
            mirror: default_output_mirror(),
        }
    }
}

/// `[assets]` section.
///
/// `source` is the asset-reference prefix as it appears inside compiled
/// stylesheets; each compression branch rewrites it to its own form before
/// writing. `components` feeds the theme-asset watch glob: only files named
/// after a component (or its plural) are ever observed.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetsSection {
    #[serde(default = "default_assets_source")]
    pub source: String,

    #[serde(default = "default_assets_rewrite")]
    pub uncompressed: String,

    #[serde(default = "default_assets_rewrite")]
    pub compressed: String,

    #[serde(default)]
    pub components: Vec<String>,
}

fn default_assets_source() -> String {
    "themes/default/assets/".to_string()
}
fn default_assets_rewrite() -> String {
    "../assets/".to_string()
}

impl Default for AssetsSection {
    fn default() -> Self {
        Self {
            source: default_assets_source(),
            uncompressed: default_assets_rewrite(),
            compressed: default_assets_rewrite(),
            components: Vec::new(),
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Project name substituted into the banner as `{name}`.
    #[serde(default = "default_build_name")]
    pub name: String,

    /// Version substituted into the banner as `{version}`.
    #[serde(default = "default_build_version")]
    pub version: String,

    /// Banner template prepended to every built stylesheet. Empty string
    /// disables the header entirely.
    #[serde(default = "default_build_banner")]
    pub banner: String,

    /// Optional octal permission string (e.g. "644") stamped onto every
    /// output file. `None` leaves file modes untouched.
    #[serde(default)]
    pub permission: Option<String>,

    /// What to do when a change arrives for a target that is already
    /// building. See [`OverlapPolicy`].
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

fn default_build_name() -> String {
    "docs".to_string()
}
fn default_build_version() -> String {
    "0.0.0".to_string()
}
fn default_build_banner() -> String {
    "/*!\n * {name} {version}\n */\n".to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            name: default_build_name(),
            version: default_build_version(),
            banner: default_build_banner(),
            permission: None,
            overlap: OverlapPolicy::default(),
        }
    }
}

impl BuildSection {
    /// Parsed octal permission mode, if configured.
    ///
    /// Validation guarantees the string parses, so this returns `None` only
    /// when no permission was configured at all.
    pub fn permission_mode(&self) -> Option<u32> {
        self.permission
            .as_deref()
            .and_then(|s| u32::from_str_radix(s, 8).ok())
    }
}

/// `[tools]` section: shell commands for the external tool seams.
///
/// The compiler gets the source file path appended as an argument; the
/// other three read from stdin and write to stdout.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsSection {
    #[serde(default = "default_tool_compiler")]
    pub compiler: String,

    #[serde(default = "default_tool_prefixer")]
    pub prefixer: String,

    #[serde(default = "default_tool_css_minifier")]
    pub css_minifier: String,

    #[serde(default = "default_tool_js_minifier")]
    pub js_minifier: String,
}

fn default_tool_compiler() -> String {
    "lessc".to_string()
}
fn default_tool_prefixer() -> String {
    "postcss --use autoprefixer".to_string()
}
fn default_tool_css_minifier() -> String {
    "cleancss".to_string()
}
fn default_tool_js_minifier() -> String {
    "uglifyjs".to_string()
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            compiler: default_tool_compiler(),
            prefixer: default_tool_prefixer(),
            css_minifier: default_tool_css_minifier(),
            js_minifier: default_tool_js_minifier(),
        }
    }
}

/// `[package]` section: optional fire-and-forget commands run after a
/// pipeline finishes. Unset actions are logged and dropped.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageSection {
    #[serde(default)]
    pub uncompressed_css: Option<String>,

    #[serde(default)]
    pub compressed_css: Option<String>,

    #[serde(default)]
    pub uncompressed_js: Option<String>,

    #[serde(default)]
    pub compressed_js: Option<String>,

    /// Command for the full rebuild triggered by a theme config change.
    #[serde(default)]
    pub full_rebuild: Option<String>,
}
