//! Parsing of the short module references written inside template directives.

use std::fmt;

use crate::error::{FacadeError, Result};

/// Range used when a reference names no version at all.
pub const ANY_VERSION: &str = "*";

/// A module reference such as `foo`, `foo@^1.2.0` or `foo@1.0.0/sub/file.css`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    /// Package name, including the `@scope/` prefix for scoped packages.
    pub name: String,
    /// Exact version pinned by the caller. Wins over `range` when both are present.
    pub version: Option<String>,
    /// Version range written after `@`.
    pub range: Option<String>,
    /// Path inside the package, without the leading slash.
    pub sub_path: Option<String>,
}

impl PackageRef {
    /// Reference to `name` at exactly `version`, bypassing range resolution.
    pub fn exact(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
            range: None,
            sub_path: None,
        }
    }

    /// Parse `name`, `name@range`, `name/sub/path` or `name@range/sub/path`.
    ///
    /// Whatever follows `@` is kept as a range, even when it spells an exact version: the
    /// resolver still checks it against the lockfile.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(malformed(text, "empty reference"));
        }

        let scope_len = if text.starts_with('@') {
            match text.find('/') {
                Some(index) => index + 1,
                None => return Err(malformed(text, "scoped name is missing the package part")),
            }
        } else {
            0
        };

        let unscoped = &text[scope_len..];
        let name_end = scope_len + unscoped.find(['@', '/']).unwrap_or(unscoped.len());
        let name = &text[..name_end];
        if name_end == scope_len || name.chars().any(char::is_whitespace) {
            return Err(malformed(text, "invalid package name"));
        }

        let rest = &text[name_end..];
        let (range, sub_path) = if let Some(spec) = rest.strip_prefix('@') {
            match spec.split_once('/') {
                Some((range, sub_path)) => (Some(range), Some(sub_path)),
                None => (Some(spec), None),
            }
        } else {
            (None, rest.strip_prefix('/'))
        };

        if range.is_some_and(|range| range.trim().is_empty()) {
            return Err(malformed(text, "empty version after '@'"));
        }

        Ok(Self {
            name: name.to_string(),
            version: None,
            range: range.map(|range| range.trim().to_string()),
            sub_path: sub_path
                .map(|path| path.trim_matches('/'))
                .filter(|path| !path.is_empty())
                .map(str::to_string),
        })
    }

    /// Range to resolve against, defaulting to any version.
    pub fn range_or_any(&self) -> &str {
        self.range.as_deref().unwrap_or(ANY_VERSION)
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(spec) = self.version.as_deref().or(self.range.as_deref()) {
            write!(f, "@{spec}")?;
        }
        if let Some(sub_path) = &self.sub_path {
            write!(f, "/{sub_path}")?;
        }
        Ok(())
    }
}

fn malformed(text: &str, reason: &'static str) -> FacadeError {
    FacadeError::MalformedReference {
        reference: text.to_string(),
        reason,
    }
}
