//! Language collaborator seam.
//!
//! Directives never read source files or run code themselves. They ask a
//! [`CodeBackend`] to resolve a reference to source text and to execute a
//! fragment, and only format the results.

use std::io;
use std::path::{Path, PathBuf};

/// Source lookup and fragment execution for one language.
pub trait CodeBackend {
    /// Language label used in generated `code-block` directives.
    fn language(&self) -> &str;

    /// Full source of an importable module (e.g. `pkg.sub.mod`).
    ///
    /// `file_dir` is the directory of the file being processed; backends use
    /// it as the first import root.
    fn module_source(&self, module: &str, file_dir: &Path) -> Result<String, ResolveError>;

    /// Source of `member` defined inside `container` in `module`, including
    /// its signature line.
    fn member_source(
        &self,
        module: &str,
        container: &str,
        member: &str,
        file_dir: &Path,
    ) -> Result<String, ResolveError>;

    /// Execute a fragment and return everything it wrote to standard output.
    fn capture_output(&self, source: &str, file_dir: &Path) -> Result<String, ExecError>;

    /// Execute a fragment that draws a plot and save the figure as a PNG at
    /// `image_path`.
    fn render_figure(&self, source: &str, file_dir: &Path, image_path: &Path)
    -> Result<(), ExecError>;
}

/// A code reference could not be resolved.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No file found for the module path.
    #[error("module '{module}' not found")]
    ModuleNotFound { module: String },
    /// The module exists but does not define the container.
    #[error("'{container}' not found in module '{module}'")]
    ContainerNotFound { module: String, container: String },
    /// The container exists but does not define the member.
    #[error("'{member}' not found in '{module}.{container}'")]
    MemberNotFound {
        module: String,
        container: String,
        member: String,
    },
    /// The module file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// An embedded fragment failed to run.
#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    /// The interpreter could not be started.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    /// The fragment exited unsuccessfully.
    #[error("embedded code failed ({}):\n{stderr}", status.map_or_else(|| "terminated by signal".to_owned(), |c| format!("exit status {c}")))]
    Failed { status: Option<i32>, stderr: String },
    /// The fragment ran but did not produce the expected figure.
    #[error("no figure written to {}", path.display())]
    MissingFigure { path: PathBuf },
}
