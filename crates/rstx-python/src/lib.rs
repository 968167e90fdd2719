//! Python backend for rstx directives.
//!
//! [`PythonBackend`] resolves dotted module paths to `.py` files, extracts
//! class members from their source, and runs fragments in a child
//! interpreter with standard output captured through a pipe.
//!
//! # Import roots
//!
//! Modules are searched, in order, in the directory of the file being
//! processed and then in each configured module path. The same roots are
//! exported as `PYTHONPATH` to executed fragments.

mod exec;
mod resolve;

use std::path::{Path, PathBuf};

use rstx_directive::{CodeBackend, ExecError, ResolveError};

/// Default interpreter command.
pub const DEFAULT_INTERPRETER: &str = "python3";

/// [`CodeBackend`] for Python sources.
#[derive(Debug, Clone)]
pub struct PythonBackend {
    interpreter: String,
    module_paths: Vec<PathBuf>,
}

impl Default for PythonBackend {
    fn default() -> Self {
        Self::new(DEFAULT_INTERPRETER)
    }
}

impl PythonBackend {
    /// Create a backend running `interpreter` (e.g. `python3` or a venv path).
    #[must_use]
    pub fn new(interpreter: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            module_paths: Vec::new(),
        }
    }

    /// Set additional import roots, searched after the file's directory.
    #[must_use]
    pub fn with_module_paths(mut self, module_paths: Vec<PathBuf>) -> Self {
        self.module_paths = module_paths;
        self
    }

    /// Interpreter command.
    #[must_use]
    pub fn interpreter(&self) -> &str {
        &self.interpreter
    }

    fn search_roots(&self, file_dir: &Path) -> Vec<PathBuf> {
        std::iter::once(file_dir.to_path_buf())
            .chain(self.module_paths.iter().cloned())
            .collect()
    }

    fn read_module(&self, module: &str, file_dir: &Path) -> Result<String, ResolveError> {
        let path = resolve::find_module(module, &self.search_roots(file_dir)).ok_or_else(|| {
            ResolveError::ModuleNotFound {
                module: module.to_owned(),
            }
        })?;
        tracing::debug!(module, path = %path.display(), "resolved module");
        std::fs::read_to_string(&path).map_err(|source| ResolveError::Io { path, source })
    }
}

impl CodeBackend for PythonBackend {
    fn language(&self) -> &'static str {
        "python"
    }

    fn module_source(&self, module: &str, file_dir: &Path) -> Result<String, ResolveError> {
        self.read_module(module, file_dir)
    }

    fn member_source(
        &self,
        module: &str,
        container: &str,
        member: &str,
        file_dir: &Path,
    ) -> Result<String, ResolveError> {
        let source = self.read_module(module, file_dir)?;
        resolve::extract_member(&source, container, member).map_err(|missing| match missing {
            resolve::Missing::Container => ResolveError::ContainerNotFound {
                module: module.to_owned(),
                container: container.to_owned(),
            },
            resolve::Missing::Member => ResolveError::MemberNotFound {
                module: module.to_owned(),
                container: container.to_owned(),
                member: member.to_owned(),
            },
        })
    }

    fn capture_output(&self, source: &str, file_dir: &Path) -> Result<String, ExecError> {
        exec::Run {
            interpreter: &self.interpreter,
            script: source,
            cwd: file_dir,
            roots: &self.search_roots(file_dir),
            figure_path: None,
        }
        .output()
    }

    fn render_figure(
        &self,
        source: &str,
        file_dir: &Path,
        image_path: &Path,
    ) -> Result<(), ExecError> {
        let script = exec::figure_script(source);
        exec::Run {
            interpreter: &self.interpreter,
            script: &script,
            cwd: file_dir,
            roots: &self.search_roots(file_dir),
            figure_path: Some(image_path),
        }
        .output()?;

        if !image_path.is_file() {
            return Err(ExecError::MissingFigure {
                path: image_path.to_path_buf(),
            });
        }
        Ok(())
    }
}
