//! Output layout: where a template's assets live relative to the module root.

use crate::asset_paths::posix::{dirname, join, relative};
use crate::models::Manifest;

/// Maps a template's location to the directory its relative asset paths resolve against.
pub trait OutputRootStrategy {
    /// Output root for a template at `template_path` built as part of `package`.
    fn output_root(&self, mod_root: &str, package: &Manifest, template_path: &str) -> String;

    /// Directory that hyperlinks must not escape.
    fn build_root<'a>(&'a self, cwd: &'a str) -> &'a str;
}

/// Fixed-suffix layout: `modRoot/name/version` followed verbatim by `htmlRoot`.
///
/// The root is produced by plain string concatenation so that templates built before the
/// template-directory layout existed keep resolving to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyLayout {
    /// Suffix appended after the package version, usually starting with `/`.
    pub html_root: String,
}

impl OutputRootStrategy for LegacyLayout {
    fn output_root(&self, mod_root: &str, package: &Manifest, _template_path: &str) -> String {
        format!(
            "{}/{}/{}{}",
            mod_root, package.name, package.version, self.html_root
        )
    }

    fn build_root<'a>(&'a self, cwd: &'a str) -> &'a str {
        cwd
    }
}

/// Mirrors the template's position below `template_dir` into the module output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDirLayout {
    /// Absolute, normalized directory holding the package templates.
    pub template_dir: String,
}

impl OutputRootStrategy for TemplateDirLayout {
    fn output_root(&self, mod_root: &str, package: &Manifest, template_path: &str) -> String {
        let nested = relative(&self.template_dir, dirname(template_path));
        join(&[
            mod_root,
            package.name.as_str(),
            package.version.as_str(),
            nested.as_str(),
        ])
    }

    fn build_root<'a>(&'a self, _cwd: &'a str) -> &'a str {
        &self.template_dir
    }
}

/// The configured layout strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// `htmlRoot` concatenation layout.
    Legacy(LegacyLayout),
    /// `templateDir` relative layout.
    TemplateDir(TemplateDirLayout),
}

impl Layout {
    /// Borrow the active strategy.
    pub fn strategy(&self) -> &dyn OutputRootStrategy {
        match self {
            Self::Legacy(layout) => layout,
            Self::TemplateDir(layout) => layout,
        }
    }
}

/// Validated layout configuration of a compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Root directory (or URL path) all module directories live under.
    pub mod_root: String,
    /// How template locations map into the module output directory.
    pub layout: Layout,
    /// Root prepended to hyperlinks, when links are served from another host.
    pub href_root: Option<String>,
    /// Asset hosts, empty when URLs stay root-relative.
    pub hosts: Vec<String>,
    /// Whether assets are spread across hosts by path length.
    pub hash_host: bool,
    /// Extension of emitted script files.
    pub js_ext: String,
    /// Extension of emitted stylesheet files.
    pub css_ext: String,
}
