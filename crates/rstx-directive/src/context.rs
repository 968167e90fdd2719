//! Directive processing context.

use std::path::{Path, PathBuf};

use crate::CodeBackend;

/// Location of the line being processed and the backend to generate content
/// with.
pub struct DirectiveContext<'a> {
    /// Directory containing the source file.
    pub file_dir: &'a Path,
    /// File name of the source file within `file_dir`.
    pub file_name: &'a str,
    /// Line index of the directive (0-based).
    pub line_index: usize,
    /// Collaborator that resolves and executes code references.
    pub backend: &'a dyn CodeBackend,
}

impl DirectiveContext<'_> {
    /// Full path of the source file.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.file_dir.join(self.file_name)
    }

    /// Line number of the directive (1-based), for error messages.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line_index + 1
    }

    /// File name of the figure generated for this source file.
    ///
    /// One figure per source file: the source name with its extension
    /// replaced by `.png`.
    #[must_use]
    pub fn figure_name(&self) -> String {
        Path::new(self.file_name)
            .with_extension("png")
            .to_string_lossy()
            .into_owned()
    }

    /// Absolute location of the figure, next to the source file.
    #[must_use]
    pub fn figure_path(&self) -> PathBuf {
        self.file_dir.join(self.figure_name())
    }
}
