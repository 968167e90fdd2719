//! `rstx build` command implementation.

use std::path::PathBuf;

use clap::Args;
use rstx_build::{Transformer, find_sources};
use rstx_config::CliSettings;
use rstx_python::PythonBackend;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Files to build (default: every `.rstx` file under the source directory).
    files: Vec<PathBuf>,

    /// Path to configuration file (default: auto-discover rstx.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory scanned for `.rstx` files (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Directory of custom directive definitions (overrides config).
    #[arg(long, env = "RSTX_CUSTOM_DIRECTIVES_DIR")]
    custom_directives_dir: Option<PathBuf>,

    /// Python interpreter used to run embedded code (overrides config).
    #[arg(long, env = "RSTX_PYTHON")]
    python: Option<String>,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a custom directive definition
    /// is malformed, or any file fails to build.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            custom_directives_dir: self.custom_directives_dir,
            interpreter: self.python,
        };
        let config = super::load_config(self.config.as_deref(), &cli_settings)?;
        let registry = super::load_registry(&config, &output)?;

        let python = &config.python_resolved;
        let backend = PythonBackend::new(python.interpreter.clone())
            .with_module_paths(python.module_paths.clone());

        let sources = if self.files.is_empty() {
            find_sources(&config.paths.source_dir)
        } else {
            self.files
        };
        if sources.is_empty() {
            output.warning(&format!(
                "No .rstx files found in {}",
                config.paths.source_dir.display()
            ));
            return Ok(());
        }

        let report = Transformer::new(&registry, &backend).run(&sources)?;

        for file in &report.files {
            output.detail(&format!("  {}", file.display()));
        }
        output.success(&format!("Built {} file(s)", report.files.len()));
        Ok(())
    }
}
