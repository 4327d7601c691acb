//! Package manifest and lockfile records consumed by the compiler.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{FacadeError, Result};

/// The `{name, version}` pair describing the package being built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Manifest {
    /// Package name.
    #[serde(default)]
    pub name: String,
    /// Exact package version.
    #[serde(default)]
    pub version: String,
}

impl Manifest {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Read a manifest from a JSON file, ignoring unrelated fields.
    pub fn from_path(path: &Path) -> Result<Self> {
        read_json(path)
    }
}

/// One node of the shrinkwrapped dependency graph.
///
/// Children are keyed by package name, so nested nodes usually omit `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LockNode {
    /// Package name, present on the root node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Exact locked version.
    #[serde(default)]
    pub version: String,
    /// Range the version was originally resolved from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Direct dependencies keyed by package name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, LockNode>,
    /// Bootstrap engines keyed by package name. Only read from the root.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub engines: BTreeMap<String, LockNode>,
}

impl LockNode {
    /// Read a shrinkwrap lockfile from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        read_json(path)
    }

    /// Leaf node locked at `version`.
    pub fn locked(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            ..Self::default()
        }
    }

    /// Add a dependency edge, returning the node for chaining.
    pub fn with_dependency(mut self, name: impl Into<String>, node: LockNode) -> Self {
        self.dependencies.insert(name.into(), node);
        self
    }

    /// Add an engine entry, returning the node for chaining.
    pub fn with_engine(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.engines.insert(name.into(), LockNode::locked(version));
        self
    }
}

/// A bootstrap dependency that must load before any application module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Engine {
    /// Engine package name.
    pub name: String,
    /// Locked engine version.
    pub version: String,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|source| FacadeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| FacadeError::Json {
        path: path.to_path_buf(),
        source,
    })
}
