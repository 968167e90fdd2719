//! Configuration management for rstx.
//!
//! Parses `rstx.toml` with serde and discovers it by walking from a start
//! directory up through its ancestors. No configuration file is not an
//! error: defaults rooted at the start directory are used and only built-in
//! directives are available.
//!
//! ```toml
//! custom_directives_dir = "docs/_directives"
//! source_dir = "docs"
//!
//! [python]
//! interpreter = "python3"
//! module_paths = ["src"]
//! ```
//!
//! Relative paths resolve against the directory containing `rstx.toml`.
//!
//! ## Environment Variable Expansion
//!
//! `custom_directives_dir`, `source_dir`, `python.interpreter` and
//! `python.module_paths` support `${VAR}` and `${VAR:-default}`. Path values
//! also expand a leading `~`.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "rstx.toml";

/// Default Python interpreter command.
const DEFAULT_INTERPRETER: &str = "python3";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the directory scanned for `.rstx` files.
    pub source_dir: Option<PathBuf>,
    /// Override the custom directive directory.
    pub custom_directives_dir: Option<PathBuf>,
    /// Override the Python interpreter.
    pub interpreter: Option<String>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory of custom directive definitions (relative string from TOML).
    custom_directives_dir: Option<String>,
    /// Directory scanned for `.rstx` files (relative string from TOML).
    source_dir: Option<String>,
    /// Python backend configuration (raw strings from TOML).
    python: PythonConfigRaw,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths: PathsConfig,
    /// Resolved Python backend configuration (set after loading).
    #[serde(skip)]
    pub python_resolved: PythonConfig,
    /// Path to the config file, if one was found (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw Python configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct PythonConfigRaw {
    interpreter: Option<String>,
    module_paths: Option<Vec<String>>,
}

/// Resolved project paths.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PathsConfig {
    /// Root of the `.rstx` file walk.
    pub source_dir: PathBuf,
    /// Custom directive directory, if configured.
    pub custom_directives_dir: Option<PathBuf>,
}

/// Resolved Python backend configuration.
#[derive(Debug, PartialEq, Eq)]
pub struct PythonConfig {
    /// Interpreter command or path.
    pub interpreter: String,
    /// Extra import roots, searched after the processed file's directory.
    pub module_paths: Vec<PathBuf>,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_owned(),
            module_paths: Vec::new(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Explicitly requested file not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`python.interpreter`").
        field: String,
        /// Error message (e.g., "${`PYTHON`} not set").
        message: String,
    },
}

/// Search for `rstx.toml` in `start` and each of its ancestors.
///
/// Returns the first candidate found, or `None` once the filesystem root has
/// been checked.
///
/// # Example
///
/// ```
/// let dir = tempfile::tempdir().unwrap();
/// std::fs::create_dir_all(dir.path().join("docs/api")).unwrap();
/// std::fs::write(dir.path().join("rstx.toml"), "").unwrap();
///
/// let found = rstx_config::discover_config(&dir.path().join("docs/api"));
/// assert_eq!(found, Some(dir.path().join("rstx.toml")));
/// ```
#[must_use]
pub fn discover_config(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

impl Config {
    /// Load configuration with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// `start_dir` and its parents for `rstx.toml`, falling back to defaults
    /// rooted at `start_dir`.
    ///
    /// CLI settings are applied after path resolution and take precedence.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, or if the
    /// file cannot be read, parsed or validated.
    pub fn load(
        config_path: Option<&Path>,
        start_dir: &Path,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = discover_config(start_dir) {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_base(start_dir)
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.paths.source_dir.clone_from(source_dir);
        }
        if let Some(custom_dir) = &settings.custom_directives_dir {
            self.paths.custom_directives_dir = Some(custom_dir.clone());
        }
        if let Some(interpreter) = &settings.interpreter {
            self.python_resolved.interpreter.clone_from(interpreter);
        }
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            custom_directives_dir: None,
            source_dir: None,
            python: PythonConfigRaw::default(),
            paths: PathsConfig {
                source_dir: base.to_path_buf(),
                custom_directives_dir: None,
            },
            python_resolved: PythonConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve(config_dir)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate resolved values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.python_resolved.interpreter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "python.interpreter cannot be empty".to_owned(),
            ));
        }
        if self
            .paths
            .custom_directives_dir
            .as_deref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            return Err(ConfigError::Validation(
                "custom_directives_dir cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand variables and resolve relative paths against `config_dir`.
    fn resolve(&mut self, config_dir: &Path) -> Result<(), ConfigError> {
        let resolve_path = |value: &str, field: &str| -> Result<PathBuf, ConfigError> {
            let expanded = expand::expand_path(value, field)?;
            if expanded.is_empty() {
                return Err(ConfigError::Validation(format!("{field} cannot be empty")));
            }
            Ok(config_dir.join(expanded))
        };

        self.paths = PathsConfig {
            source_dir: match self.source_dir.as_deref() {
                Some(dir) => resolve_path(dir, "source_dir")?,
                None => config_dir.to_path_buf(),
            },
            custom_directives_dir: self
                .custom_directives_dir
                .as_deref()
                .map(|dir| resolve_path(dir, "custom_directives_dir"))
                .transpose()?,
        };

        let interpreter = match self.python.interpreter.as_deref() {
            Some(interpreter) => expand::expand_path(interpreter, "python.interpreter")?,
            None => DEFAULT_INTERPRETER.to_owned(),
        };
        let module_paths = self
            .python
            .module_paths
            .iter()
            .flatten()
            .map(|dir| resolve_path(dir.as_str(), "python.module_paths"))
            .collect::<Result<_, _>>()?;

        self.python_resolved = PythonConfig {
            interpreter,
            module_paths,
        };

        Ok(())
    }
}
