//! Mock backend implementation for testing.
//!
//! Provides [`MockBackend`] for exercising directives without an interpreter.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{CodeBackend, ExecError, ResolveError};

/// In-memory [`CodeBackend`].
///
/// Sources and outputs are keyed by exact text. Fragments with no registered
/// output print nothing. Executions and rendered figures are recorded.
#[derive(Debug, Default)]
pub struct MockBackend {
    modules: HashMap<String, String>,
    members: HashMap<(String, String, String), String>,
    outputs: HashMap<String, String>,
    failures: HashMap<String, String>,
    executions: RefCell<Vec<String>>,
    figures: RefCell<Vec<PathBuf>>,
}

impl MockBackend {
    /// Create an empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the full source of a module.
    #[must_use]
    pub fn with_module(mut self, module: &str, source: &str) -> Self {
        self.modules.insert(module.to_owned(), source.to_owned());
        self
    }

    /// Register the source of a member, including its signature line.
    #[must_use]
    pub fn with_member(mut self, module: &str, container: &str, member: &str, source: &str) -> Self {
        self.modules
            .entry(module.to_owned())
            .or_insert_with(String::new);
        self.members.insert(
            (module.to_owned(), container.to_owned(), member.to_owned()),
            source.to_owned(),
        );
        self
    }

    /// Register what a fragment prints when executed.
    #[must_use]
    pub fn with_output(mut self, fragment: &str, stdout: &str) -> Self {
        self.outputs.insert(fragment.to_owned(), stdout.to_owned());
        self
    }

    /// Make a fragment fail with the given stderr.
    #[must_use]
    pub fn with_failure(mut self, fragment: &str, stderr: &str) -> Self {
        self.failures.insert(fragment.to_owned(), stderr.to_owned());
        self
    }

    /// Fragments executed so far, in order.
    pub fn executions(&self) -> Vec<String> {
        self.executions.borrow().clone()
    }

    /// Figures written so far, in order.
    pub fn figures(&self) -> Vec<PathBuf> {
        self.figures.borrow().clone()
    }

    fn execute(&self, source: &str) -> Result<String, ExecError> {
        self.executions.borrow_mut().push(source.to_owned());
        if let Some(stderr) = self.failures.get(source) {
            return Err(ExecError::Failed {
                status: Some(1),
                stderr: stderr.clone(),
            });
        }
        Ok(self.outputs.get(source).cloned().unwrap_or_default())
    }
}

impl CodeBackend for MockBackend {
    fn language(&self) -> &'static str {
        "python"
    }

    fn module_source(&self, module: &str, _file_dir: &Path) -> Result<String, ResolveError> {
        self.modules
            .get(module)
            .cloned()
            .ok_or_else(|| ResolveError::ModuleNotFound {
                module: module.to_owned(),
            })
    }

    fn member_source(
        &self,
        module: &str,
        container: &str,
        member: &str,
        _file_dir: &Path,
    ) -> Result<String, ResolveError> {
        if !self.modules.contains_key(module) {
            return Err(ResolveError::ModuleNotFound {
                module: module.to_owned(),
            });
        }
        self.members
            .get(&(module.to_owned(), container.to_owned(), member.to_owned()))
            .cloned()
            .ok_or_else(|| ResolveError::MemberNotFound {
                module: module.to_owned(),
                container: container.to_owned(),
                member: member.to_owned(),
            })
    }

    fn capture_output(&self, source: &str, _file_dir: &Path) -> Result<String, ExecError> {
        self.execute(source)
    }

    /// Writes a placeholder image when the target directory exists, so
    /// filesystem tests can observe it.
    fn render_figure(
        &self,
        source: &str,
        _file_dir: &Path,
        image_path: &Path,
    ) -> Result<(), ExecError> {
        self.execute(source)?;
        if image_path.parent().is_some_and(Path::is_dir) {
            fs::write(image_path, source.as_bytes()).map_err(|source| ExecError::Spawn {
                program: "mock".to_owned(),
                source,
            })?;
        }
        self.figures.borrow_mut().push(image_path.to_path_buf());
        Ok(())
    }
}
