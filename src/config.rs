//! Layout options, as passed in code or discovered from a project configuration file.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;

use crate::asset_paths::posix::resolve;
use crate::error::{FacadeError, Result};
use crate::layout::{Layout, LayoutConfig, LegacyLayout, TemplateDirLayout};

/// File name searched for by [`LayoutOptions::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "facade.config.json";

const DEFAULT_JS_EXT: &str = ".js";
const DEFAULT_CSS_EXT: &str = ".css";

/// Unvalidated layout options. Every field may be omitted from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutOptions {
    /// Root all module directories live under. Required.
    pub mod_root: Option<String>,
    /// Suffix for the fixed-string layout. Used when `template_dir` is absent.
    pub html_root: Option<String>,
    /// Directory holding the templates, relative to the working directory.
    pub template_dir: Option<String>,
    /// Root prepended to non-relative hyperlinks.
    pub href_root: Option<String>,
    /// Asset hosts.
    pub hosts: Option<Vec<String>>,
    /// Spread assets across hosts by path length. Defaults to `true`.
    pub hash_host: Option<bool>,
    /// Extension of emitted script files. Defaults to `.js`.
    pub js_ext: Option<String>,
    /// Extension of emitted stylesheet files. Defaults to `.css`.
    pub css_ext: Option<String>,
}

impl LayoutOptions {
    /// Load [`DEFAULT_CONFIG_FILE`] from `dir`, falling back to empty options when it is absent.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        match fs::read_to_string(&candidate) {
            Ok(content) => parse(&candidate, &content),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(FacadeError::Io {
                path: candidate,
                source,
            }),
        }
    }

    /// Read options from a specific JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| FacadeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        parse(path, &content)
    }

    /// Overlay every option set in `overrides` on top of `self`.
    pub fn merge(self, overrides: LayoutOptions) -> Self {
        Self {
            mod_root: overrides.mod_root.or(self.mod_root),
            html_root: overrides.html_root.or(self.html_root),
            template_dir: overrides.template_dir.or(self.template_dir),
            href_root: overrides.href_root.or(self.href_root),
            hosts: overrides.hosts.or(self.hosts),
            hash_host: overrides.hash_host.or(self.hash_host),
            js_ext: overrides.js_ext.or(self.js_ext),
            css_ext: overrides.css_ext.or(self.css_ext),
        }
    }

    /// Validate the options, resolving `template_dir` against `cwd`.
    ///
    /// `template_dir` takes precedence over `html_root` when both are set.
    pub fn validate(self, cwd: &str) -> Result<LayoutConfig> {
        let mod_root =
            non_empty(self.mod_root).ok_or(FacadeError::MissingRequiredOption("modRoot"))?;

        let layout = match (non_empty(self.template_dir), self.html_root) {
            (Some(template_dir), _) => Layout::TemplateDir(TemplateDirLayout {
                template_dir: resolve(cwd, &template_dir),
            }),
            (None, Some(html_root)) => Layout::Legacy(LegacyLayout { html_root }),
            (None, None) => {
                return Err(FacadeError::MissingRequiredOption("htmlRoot or templateDir"));
            }
        };

        let hosts = self
            .hosts
            .unwrap_or_default()
            .into_iter()
            .map(|host| host.trim().to_string())
            .filter(|host| !host.is_empty())
            .collect();

        Ok(LayoutConfig {
            mod_root,
            layout,
            href_root: non_empty(self.href_root),
            hosts,
            hash_host: self.hash_host.unwrap_or(true),
            js_ext: extension(self.js_ext, DEFAULT_JS_EXT),
            css_ext: extension(self.css_ext, DEFAULT_CSS_EXT),
        })
    }
}

fn parse(path: &Path, content: &str) -> Result<LayoutOptions> {
    serde_json::from_str(content).map_err(|source| FacadeError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

fn extension(value: Option<String>, default: &str) -> String {
    match non_empty(value) {
        Some(ext) if ext.starts_with('.') => ext,
        Some(ext) => format!(".{ext}"),
        None => default.to_string(),
    }
}
