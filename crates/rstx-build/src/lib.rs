//! Build pipeline for rstx sources.
//!
//! Finds `.rstx` files under a source directory and expands their directive
//! lines into `.rst` files written next to them.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use rstx_build::{Transformer, find_sources};
//! use rstx_directive::Registry;
//! use rstx_python::PythonBackend;
//!
//! let registry = Registry::builtin();
//! let backend = PythonBackend::default();
//! let sources = find_sources(Path::new("docs"));
//! let report = Transformer::new(&registry, &backend).run(&sources)?;
//! println!("{} files written", report.files.len());
//! # Ok::<(), rstx_build::BuildError>(())
//! ```

mod scanner;
mod transformer;

use std::path::{Path, PathBuf};

use rstx_directive::DirectiveError;

pub use scanner::{OUTPUT_EXTENSION, SOURCE_EXTENSION, find_sources, output_path};
pub use transformer::{BuildReport, Transformer};

/// Error produced while building a file.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A directive line failed validation or content generation.
    #[error(transparent)]
    Directive(#[from] DirectiveError),
    /// Reading a source or writing an output failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The source file doesn't have the `.rstx` extension.
    #[error("not an rstx source (expected a .rstx file): {}", .0.display())]
    NotSource(PathBuf),
    /// The source path has no UTF-8 file name.
    #[error("invalid source path: {}", .0.display())]
    InvalidPath(PathBuf),
}

impl BuildError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
