//! Project-supplied directive definitions.
//!
//! A custom directive directory contains one TOML file per directive:
//!
//! ```toml
//! name = "embed-snippet"
//! source = "member"          # "module" or "member"
//! blocks = ["code", "print"] # "code", "print", "plot"; emitted in this order
//! scale = 50                 # optional fixed figure scale
//! ```
//!
//! Without `scale`, a directive with a `plot` block takes the figure scale as
//! an extra trailing argument.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{BlockKind, ComposedDirective, RegistryError, Scale, SourceMode};

/// File extension of directive definition files.
const DEFINITION_EXTENSION: &str = "toml";

/// Parsed directive definition file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectiveDefinition {
    /// Directive name, matched as `.. <name>::`.
    pub name: String,
    /// How arguments reference the code.
    pub source: SourceMode,
    /// Blocks in emission order.
    pub blocks: Vec<BlockKind>,
    /// Fixed figure scale percentage.
    #[serde(default)]
    pub scale: Option<u32>,
}

impl DirectiveDefinition {
    /// Parse a definition from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Check that the definition describes a usable directive.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.is_empty() {
            return Err("name cannot be empty".to_owned());
        }
        if let Some(c) = self
            .name
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, ',' | ':'))
        {
            return Err(format!("name \"{}\" cannot contain {c:?}", self.name));
        }
        if self.blocks.is_empty() {
            return Err("blocks cannot be empty".to_owned());
        }
        for (idx, block) in self.blocks.iter().enumerate() {
            if self.blocks[..idx].contains(block) {
                return Err(format!("block {block:?} listed more than once"));
            }
        }
        if self.scale == Some(0) {
            return Err("scale must be greater than 0".to_owned());
        }
        Ok(())
    }

    /// Build the directive described by this definition.
    #[must_use]
    pub fn into_directive(self) -> ComposedDirective {
        let scale = self.scale.map_or(Scale::Argument, Scale::Fixed);
        ComposedDirective::new(self.name, self.source, self.blocks, scale)
    }
}

/// Load every definition file in `dir`, sorted by file name.
pub(crate) fn load_definitions(dir: &Path) -> Result<Vec<(PathBuf, ComposedDirective)>, RegistryError> {
    let entries = fs::read_dir(dir).map_err(|source| RegistryError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|e| e == DEFINITION_EXTENSION)
        })
        .collect();
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let text = fs::read_to_string(&path).map_err(|source| RegistryError::Io {
                path: path.clone(),
                source,
            })?;
            let definition =
                DirectiveDefinition::from_toml(&text).map_err(|source| RegistryError::Parse {
                    path: path.clone(),
                    source,
                })?;
            definition
                .validate()
                .map_err(|message| RegistryError::Invalid {
                    path: path.clone(),
                    message,
                })?;
            Ok((path, definition.into_directive()))
        })
        .collect()
}
