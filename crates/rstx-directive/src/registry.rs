//! Directive registry.
//!
//! Holds every known directive in registration order. Built-ins are
//! registered first, then custom definitions. Registering a name that is
//! already present replaces the earlier directive in place, so custom
//! directives override built-ins while keeping their lookup position.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::definition::load_definitions;
use crate::grammar::mentions;
use crate::{ComposedDirective, Directive, RegistryError, strip_spaces};

/// Where a registered directive came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Shipped with rstx.
    Builtin,
    /// Loaded from a definition file.
    Custom(PathBuf),
    /// Registered through [`Registry::register`].
    Registered,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => f.write_str("built-in"),
            Self::Custom(path) => write!(f, "custom ({})", path.display()),
            Self::Registered => f.write_str("registered"),
        }
    }
}

struct Entry {
    directive: Box<dyn Directive>,
    origin: Origin,
}

/// Ordered collection of directives with unique names.
///
/// # Example
///
/// ```
/// use rstx_directive::{Directive, Origin, Registry};
///
/// let registry = Registry::builtin();
/// let directive = registry.get("embed-module-print").unwrap();
/// assert_eq!(directive.arity(), 1);
/// assert_eq!(registry.origin("embed-module-print"), Some(&Origin::Builtin));
/// ```
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry containing only the built-in directives.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for directive in ComposedDirective::builtins() {
            registry.insert(Box::new(directive), Origin::Builtin);
        }
        registry
    }

    /// Discover built-in directives and, if given, the custom definitions in
    /// `custom_dir`.
    ///
    /// A missing custom directory is logged and skipped. Unreadable or
    /// malformed definition files are errors.
    pub fn discover(custom_dir: Option<&Path>) -> Result<Self, RegistryError> {
        let mut registry = Self::builtin();

        let Some(dir) = custom_dir else {
            return Ok(registry);
        };

        if !dir.is_dir() {
            tracing::warn!(
                dir = %dir.display(),
                "custom directives directory not found, using built-in directives only"
            );
            return Ok(registry);
        }

        for (path, directive) in load_definitions(dir)? {
            registry.insert(Box::new(directive), Origin::Custom(path));
        }

        tracing::debug!(count = registry.len(), "discovered directives");
        Ok(registry)
    }

    /// Register a directive, replacing any directive with the same name.
    pub fn register<D: Directive + 'static>(&mut self, directive: D) {
        self.insert(Box::new(directive), Origin::Registered);
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with<D: Directive + 'static>(mut self, directive: D) -> Self {
        self.register(directive);
        self
    }

    fn insert(&mut self, directive: Box<dyn Directive>, origin: Origin) {
        let entry = Entry { directive, origin };
        let name = entry.directive.name();

        if let Some(idx) = self.entries.iter().position(|e| e.directive.name() == name) {
            tracing::debug!(
                directive = name,
                replaced = %self.entries[idx].origin,
                by = %entry.origin,
                "overriding directive"
            );
            self.entries[idx] = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// Look up a directive by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Directive> {
        self.entry(name).map(|e| e.directive.as_ref())
    }

    /// Origin of the directive registered under `name`.
    #[must_use]
    pub fn origin(&self, name: &str) -> Option<&Origin> {
        self.entry(name).map(|e| &e.origin)
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.directive.name() == name)
    }

    /// First directive, in registration order, whose `..<name>::` token
    /// appears in `line` once spaces are removed.
    #[must_use]
    pub fn matching(&self, line: &str) -> Option<&dyn Directive> {
        self.matching_stripped(&strip_spaces(line))
    }

    /// Like [`matching`](Self::matching) for a line already passed through
    /// [`strip_spaces`].
    #[must_use]
    pub fn matching_stripped(&self, stripped: &str) -> Option<&dyn Directive> {
        self.entries
            .iter()
            .map(|e| e.directive.as_ref())
            .find(|d| mentions(stripped, d.name()))
    }

    /// Directives with their origins, in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&dyn Directive, &Origin)> {
        self.entries.iter().map(|e| (e.directive.as_ref(), &e.origin))
    }

    /// Directive names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.directive.name())
    }

    /// Number of registered directives.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no directives are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
