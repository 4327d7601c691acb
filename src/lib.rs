#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod bootstrap;
pub mod compiler;
pub mod config;
pub mod directives;
pub mod error;
pub mod graph;
pub mod layout;
pub mod models;
pub mod package_ref;
pub mod template;
pub mod version;

pub use compiler::{CompiledTemplate, Compiler, CompilerOptions};
pub use config::{DEFAULT_CONFIG_FILE, LayoutOptions};
pub use directives::{Directive, RenderContext};
pub use error::{FacadeError, Result};
pub use graph::DependencyGraph;
pub use layout::{Layout, LayoutConfig};
pub use models::{Engine, LockNode, Manifest};
pub use package_ref::PackageRef;
pub use template::{Node, Template};
pub use version::{VersionRange, VersionResolver};
