//! Line-by-line directive expansion.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rstx_directive::{CodeBackend, DirectiveContext, Registry, strip_spaces};

use crate::BuildError;
use crate::scanner::{SOURCE_EXTENSION, output_path};

/// Result of a build.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Generated `.rst` files, in processing order.
    pub files: Vec<PathBuf>,
}

/// Expands directive lines using a registry and a code backend.
///
/// Lines that don't invoke a registered directive are copied unchanged,
/// including their line terminators.
pub struct Transformer<'a> {
    registry: &'a Registry,
    backend: &'a dyn CodeBackend,
}

impl<'a> Transformer<'a> {
    /// Create a transformer.
    #[must_use]
    pub fn new(registry: &'a Registry, backend: &'a dyn CodeBackend) -> Self {
        Self { registry, backend }
    }

    /// Transform the text of `file_name`, located in `file_dir`.
    ///
    /// # Errors
    ///
    /// Returns the first directive error. No partial output is produced.
    pub fn transform_str(
        &self,
        file_dir: &Path,
        file_name: &str,
        text: &str,
    ) -> Result<String, BuildError> {
        let mut out = String::with_capacity(text.len());

        for (line_index, line) in text.split_inclusive('\n').enumerate() {
            let stripped = strip_spaces(line);
            let Some(directive) = self.registry.matching_stripped(&stripped) else {
                out.push_str(line);
                continue;
            };

            let ctx = DirectiveContext {
                file_dir,
                file_name,
                line_index,
                backend: self.backend,
            };
            for generated in directive.invoke(&ctx, line)? {
                out.push_str(&generated);
            }
        }

        Ok(out)
    }

    /// Transform `source` and write the result next to it with an `.rst`
    /// extension.
    ///
    /// The output is written to a temporary file in the same directory and
    /// then renamed over the target, so a failed run never leaves a partial
    /// file behind.
    ///
    /// # Errors
    ///
    /// Returns an error if `source` doesn't have the `.rstx` extension, the
    /// source cannot be read, a directive fails, or the output cannot be
    /// written.
    pub fn transform_file(&self, source: &Path) -> Result<PathBuf, BuildError> {
        if source.extension().is_none_or(|e| e != SOURCE_EXTENSION) {
            return Err(BuildError::NotSource(source.to_path_buf()));
        }
        let file_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| BuildError::InvalidPath(source.to_path_buf()))?;

        // Executed code runs inside the source directory, so every path handed
        // to the backend must be absolute.
        let absolute = std::path::absolute(source).map_err(|e| BuildError::io(source, e))?;
        let file_dir = absolute
            .parent()
            .ok_or_else(|| BuildError::InvalidPath(source.to_path_buf()))?;

        let text = fs::read_to_string(source).map_err(|e| BuildError::io(source, e))?;
        let transformed = self.transform_str(file_dir, file_name, &text)?;

        let target = output_path(source);
        let mut tmp =
            tempfile::NamedTempFile::new_in(file_dir).map_err(|e| BuildError::io(&target, e))?;
        tmp.write_all(transformed.as_bytes())
            .map_err(|e| BuildError::io(&target, e))?;
        tmp.persist(&target)
            .map_err(|e| BuildError::io(&target, e.error))?;

        tracing::info!(source = %source.display(), output = %target.display(), "wrote");
        Ok(target)
    }

    /// Transform `sources` in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// Returns the first error. Files processed before it keep their output.
    pub fn run(&self, sources: &[PathBuf]) -> Result<BuildReport, BuildError> {
        let mut report = BuildReport::default();
        for source in sources {
            report.files.push(self.transform_file(source)?);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstx_directive::{
        BlockKind, ComposedDirective, DirectiveError, MockBackend, Scale, SourceMode,
    };

    use super::*;

    const DOCS: &str = "/docs";

    fn transform(registry: &Registry, backend: &MockBackend, text: &str) -> Result<String, BuildError> {
        Transformer::new(registry, backend).transform_str(Path::new(DOCS), "guide.rstx", text)
    }

    #[test]
    fn test_embed_module_with_indent() {
        let registry = Registry::builtin();
        let backend = MockBackend::new().with_module("pkg.mod", "print('hi')\n");

        let out = transform(&registry, &backend, "  .. embed-module:: pkg.mod\n").unwrap();
        assert_eq!(
            out,
            "  .. code-block:: python\n\n    print('hi')\n    \n"
        );
        assert!(backend.executions().is_empty());
    }

    #[test]
    fn test_plain_text_is_identity() {
        let registry = Registry::builtin();
        let backend = MockBackend::new();
        let text = "Title\n=====\n\n.. note::\n\n   Some ``code``.\r\n\tTabbed line\nno trailing newline";

        assert_eq!(transform(&registry, &backend, text).unwrap(), text);
    }

    #[test]
    fn test_empty_input() {
        let registry = Registry::builtin();
        let backend = MockBackend::new();
        assert_eq!(transform(&registry, &backend, "").unwrap(), "");
    }

    #[test]
    fn test_surrounding_lines_preserved() {
        let registry = Registry::builtin();
        let backend = MockBackend::new().with_module("m", "x = 1");

        let out = transform(&registry, &backend, "Intro\n\n.. embed-module:: m\n\nOutro\n").unwrap();
        assert_eq!(
            out,
            "Intro\n\n.. code-block:: python\n\n  x = 1\n\nOutro\n"
        );
    }

    #[test]
    fn test_silent_print_variant_emits_code_only() {
        let registry = Registry::builtin();
        let backend = MockBackend::new().with_module("quiet", "x = 1\n");

        let out = transform(&registry, &backend, ".. embed-module-print:: quiet\n").unwrap();
        assert_eq!(out, ".. code-block:: python\n\n  x = 1\n  \n");
        assert_eq!(backend.executions(), vec!["x = 1\n".to_owned()]);
    }

    #[test]
    fn test_print_variant_emits_output() {
        let registry = Registry::builtin();
        let backend = MockBackend::new()
            .with_module("loud", "print(42)")
            .with_output("print(42)", "42\n");

        let out = transform(&registry, &backend, ".. embed-module-print:: loud\n").unwrap();
        assert_eq!(
            out,
            ".. code-block:: python\n\n  print(42)\n::\n\n  42\n  \n"
        );
    }

    #[test]
    fn test_syntax_error_reports_file_and_line() {
        let registry = Registry::builtin();
        let backend = MockBackend::new();

        let err = transform(&registry, &backend, "ok\nok\n.. embed-module:: a, b\n").unwrap_err();
        assert!(matches!(
            err,
            BuildError::Directive(DirectiveError::Syntax { line: 3, .. })
        ));
        assert_eq!(
            err.to_string(),
            "In file /docs/guide.rstx line 3: there should be 1 arguments for directive \"embed-module\", separated by commas."
        );
    }

    #[test]
    fn test_text_before_marker_is_error() {
        let registry = Registry::builtin();
        let backend = MockBackend::new().with_module("m", "x = 1");

        let err = transform(&registry, &backend, "see .. embed-module:: m\n").unwrap_err();
        assert!(err.to_string().contains("there should only be white spaces before the directive."));
    }

    #[test]
    fn test_missing_module_is_error() {
        let registry = Registry::builtin();
        let backend = MockBackend::new();

        let err = transform(&registry, &backend, ".. embed-module:: absent\n").unwrap_err();
        assert_eq!(err.to_string(), "module 'absent' not found");
    }

    #[test]
    fn test_marker_without_space_is_error() {
        let registry = Registry::builtin();
        let backend = MockBackend::new().with_module("m", "x = 1");

        let err = transform(&registry, &backend, "..embed-module:: m\n").unwrap_err();
        assert!(matches!(
            err,
            BuildError::Directive(DirectiveError::Syntax { line: 1, .. })
        ));
    }

    #[test]
    fn test_registered_directive_expands() {
        let registry = Registry::new().with(ComposedDirective::new(
            "show",
            SourceMode::Module,
            vec![BlockKind::Code],
            Scale::Argument,
        ));
        let backend = MockBackend::new().with_module("m", "x");

        let out = transform(&registry, &backend, ".. show:: m\n.. embed-module:: m\n").unwrap();
        assert_eq!(out, ".. code-block:: python\n\n  x\n.. embed-module:: m\n");
    }

    #[test]
    fn test_transform_file_writes_rst() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("page.rstx");
        fs::write(&source, "Page\n\n.. embed-module:: m\n").unwrap();

        let registry = Registry::builtin();
        let backend = MockBackend::new().with_module("m", "x = 1");
        let target = Transformer::new(&registry, &backend)
            .transform_file(&source)
            .unwrap();

        assert_eq!(target, temp_dir.path().join("page.rst"));
        assert_eq!(
            fs::read_to_string(&target).unwrap(),
            "Page\n\n.. code-block:: python\n\n  x = 1\n"
        );
    }

    #[test]
    fn test_transform_file_error_leaves_no_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("page.rstx");
        fs::write(&source, ".. embed-module:: absent\n").unwrap();

        let registry = Registry::builtin();
        let backend = MockBackend::new();
        let result = Transformer::new(&registry, &backend).transform_file(&source);

        assert!(result.is_err());
        let names: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("page.rstx")]);
    }

    #[test]
    fn test_transform_file_missing_source() {
        let temp_dir = tempfile::tempdir().unwrap();
        let registry = Registry::builtin();
        let backend = MockBackend::new();

        let err = Transformer::new(&registry, &backend)
            .transform_file(&temp_dir.path().join("absent.rstx"))
            .unwrap_err();
        assert!(matches!(err, BuildError::Io { .. }));
    }

    #[test]
    fn test_figure_written_next_to_source() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("plots.rstx");
        fs::write(&source, ".. embed-module-plot:: m, 50\n").unwrap();

        let registry = Registry::builtin();
        let backend = MockBackend::new().with_module("m", "plt.plot([1])");
        let target = Transformer::new(&registry, &backend)
            .transform_file(&source)
            .unwrap();

        assert_eq!(backend.figures(), vec![temp_dir.path().join("plots.png")]);
        assert!(temp_dir.path().join("plots.png").is_file());
        assert_eq!(
            fs::read_to_string(target).unwrap(),
            ".. code-block:: python\n\n  plt.plot([1])\n.. figure:: plots.png\n  :scale: 50 %\n  :align: center\n"
        );
    }

    #[test]
    fn test_relative_source_gets_absolute_dir() {
        let temp_dir = tempfile::tempdir_in(".").unwrap();
        let relative = temp_dir
            .path()
            .strip_prefix(std::env::current_dir().unwrap())
            .unwrap_or(temp_dir.path())
            .to_path_buf();
        let source = relative.join("plots.rstx");
        fs::write(&source, ".. embed-module-plot:: m, 50\n").unwrap();

        let registry = Registry::builtin();
        let backend = MockBackend::new().with_module("m", "plt.plot([1])");
        let target = Transformer::new(&registry, &backend)
            .transform_file(&source)
            .unwrap();

        let figures = backend.figures();
        assert_eq!(figures.len(), 1);
        assert!(figures[0].is_absolute());
        assert_eq!(
            figures[0],
            std::path::absolute(relative.join("plots.png")).unwrap()
        );
        assert_eq!(target, relative.join("plots.rst"));
        assert!(target.is_file());
    }

    #[test]
    fn test_non_rstx_source_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("page.rst");
        fs::write(&source, "Hand-written\n.. embed-module:: m\n").unwrap();

        let registry = Registry::builtin();
        let backend = MockBackend::new().with_module("m", "x = 1");
        let err = Transformer::new(&registry, &backend)
            .transform_file(&source)
            .unwrap_err();

        assert!(matches!(err, BuildError::NotSource(ref p) if *p == source));
        assert_eq!(
            fs::read_to_string(&source).unwrap(),
            "Hand-written\n.. embed-module:: m\n"
        );
    }

    #[test]
    fn test_run_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let first = temp_dir.path().join("a.rstx");
        let second = temp_dir.path().join("b.rstx");
        fs::write(&first, "A\n.. embed-module-print:: m\n").unwrap();
        fs::write(&second, "B\n").unwrap();

        let registry = Registry::builtin();
        let backend = MockBackend::new()
            .with_module("m", "print(1)")
            .with_output("print(1)", "1\n");
        let transformer = Transformer::new(&registry, &backend);
        let sources = vec![first, second];

        let report = transformer.run(&sources).unwrap();
        let before: Vec<String> = report
            .files
            .iter()
            .map(|f| fs::read_to_string(f).unwrap())
            .collect();

        let again = transformer.run(&sources).unwrap();
        let after: Vec<String> = again
            .files
            .iter()
            .map(|f| fs::read_to_string(f).unwrap())
            .collect();

        assert_eq!(report, again);
        assert_eq!(before, after);
        assert_eq!(
            report.files,
            vec![temp_dir.path().join("a.rst"), temp_dir.path().join("b.rst")]
        );
    }

    #[test]
    fn test_run_stops_at_first_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let bad = temp_dir.path().join("a.rstx");
        let good = temp_dir.path().join("b.rstx");
        fs::write(&bad, ".. embed-module:: absent\n").unwrap();
        fs::write(&good, "fine\n").unwrap();

        let registry = Registry::builtin();
        let backend = MockBackend::new();
        let result = Transformer::new(&registry, &backend).run(&[bad, good]);

        assert!(result.is_err());
        assert!(!temp_dir.path().join("b.rst").exists());
    }
}
