//! `rstx directives` command implementation.

use std::path::PathBuf;

use clap::Args;
use rstx_config::CliSettings;
use rstx_directive::Registry;

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the directives command.
#[derive(Args)]
pub(crate) struct DirectivesArgs {
    /// Path to configuration file (default: auto-discover rstx.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory of custom directive definitions (overrides config).
    #[arg(long, env = "RSTX_CUSTOM_DIRECTIVES_DIR")]
    custom_directives_dir: Option<PathBuf>,
}

impl DirectivesArgs {
    /// Execute the directives command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or a custom directive
    /// definition is malformed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            custom_directives_dir: self.custom_directives_dir,
            ..CliSettings::default()
        };
        let config = super::load_config(self.config.as_deref(), &cli_settings)?;
        let registry = super::load_registry(&config, &output)?;

        for line in listing(&registry) {
            output.print(&line);
        }
        Ok(())
    }
}

/// One aligned `name  arity  origin` row per directive, in match order.
fn listing(registry: &Registry) -> Vec<String> {
    let width = registry.names().map(str::len).max().unwrap_or(0);
    registry
        .iter()
        .map(|(directive, origin)| {
            format!(
                "{:<width$}  {}  {origin}",
                directive.name(),
                directive.arity()
            )
        })
        .collect()
}
