//! Error types for directive processing and discovery.

use std::io;
use std::path::PathBuf;

use crate::{ExecError, ResolveError, SyntaxError};

/// Error raised while invoking a directive.
///
/// Syntax and argument errors carry the source file and 1-based line number.
/// Resolution and execution errors come from the [`CodeBackend`](crate::CodeBackend)
/// and are passed through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    /// Malformed directive line.
    #[error("In file {} line {line}: {source}", path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        #[source]
        source: SyntaxError,
    },
    /// Well-formed line with an argument the directive cannot use.
    #[error("In file {} line {line}: {message}", path.display())]
    Argument {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// Error raised while discovering custom directives.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The custom directive directory or a definition file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A definition file is not valid TOML or has unknown fields.
    #[error("invalid directive definition {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// A definition file parsed but describes an unusable directive.
    #[error("invalid directive definition {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}
