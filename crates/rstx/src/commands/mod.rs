//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod directives;

pub(crate) use build::BuildArgs;
pub(crate) use directives::DirectivesArgs;

use std::path::Path;

use rstx_config::{CliSettings, Config};
use rstx_directive::Registry;

use crate::error::CliError;
use crate::output::Output;

/// Load config from `--config` or by discovery from the working directory.
fn load_config(config_path: Option<&Path>, cli_settings: &CliSettings) -> Result<Config, CliError> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(config_path, &cwd, Some(cli_settings))?;
    if let Some(path) = &config.config_path {
        tracing::info!(path = %path.display(), "loaded config");
    }
    Ok(config)
}

/// Built-in directives plus the configured custom definitions.
fn load_registry(config: &Config, output: &Output) -> Result<Registry, CliError> {
    let custom_dir = config.paths.custom_directives_dir.as_deref();
    if let Some(dir) = custom_dir.filter(|dir| !dir.is_dir()) {
        output.warning(&format!(
            "Custom directives directory not found: {} (using built-in directives only)",
            dir.display()
        ));
    }
    Ok(Registry::discover(custom_dir)?)
}
