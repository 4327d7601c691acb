//! Error type shared by every stage of template compilation.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = FacadeError> = std::result::Result<T, E>;

/// Failures raised while constructing a [`crate::Compiler`] or evaluating a directive.
///
/// Every variant is deterministic for a given set of inputs. A single failing directive
/// aborts the whole render.
#[derive(Debug, Error)]
pub enum FacadeError {
    /// A required construction option was absent or empty.
    #[error("missing required option `{0}`")]
    MissingRequiredOption(&'static str),

    /// A module reference could not be parsed.
    #[error("malformed module reference '{reference}': {reason}")]
    MalformedReference {
        /// Reference text as written in the template.
        reference: String,
        /// Why the reference was rejected.
        reason: &'static str,
    },

    /// The version range of a reference is not valid range syntax.
    #[error("invalid version range in '{reference}'")]
    InvalidRange {
        /// Reference text carrying the offending range.
        reference: String,
    },

    /// No locked version of the package satisfies the requested range.
    #[error("no locked version of '{name}' satisfies '{range}', is it installed?")]
    UnsatisfiableRange {
        /// Package name that was looked up.
        name: String,
        /// Range that could not be satisfied.
        range: String,
    },

    /// A hyperlink resolved outside of the build root.
    #[error("link '{reference}' resolves outside of the build root")]
    PathTraversal {
        /// Link text as written in the template.
        reference: String,
    },

    /// The lockfile walk exceeded the node limit.
    #[error("dependency graph exceeds {limit} nodes, the lockfile may be cyclic")]
    GraphTooDeep {
        /// Number of nodes visited before giving up.
        limit: usize,
    },

    /// A template used a directive that is not registered on the compiler.
    #[error("unknown directive `{0}`")]
    UnknownDirective(String),

    /// The template source could not be split into text and directives.
    #[error("template syntax error at byte {offset}: {reason}")]
    TemplateSyntax {
        /// Byte offset of the offending tag.
        offset: usize,
        /// What went wrong.
        reason: &'static str,
    },

    /// Failed to serialize data embedded into the rendered output.
    #[error("failed to serialize runtime config: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Failed to read an input file.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// Path that caused the error.
        path: PathBuf,
        /// Source I/O error.
        source: std::io::Error,
    },

    /// Failed to parse an input JSON file.
    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        /// Path that caused the error.
        path: PathBuf,
        /// Source parse error.
        source: serde_json::Error,
    },
}
