//! Line directive engine for `.rstx` sources.
//!
//! A directive line has the form `<spaces>.. <name>:: <arg1>, <arg2>, ...` and
//! is replaced by generated reStructuredText: a code listing, the captured
//! output of running that code, and/or a generated figure.
//!
//! # Architecture
//!
//! - [`parse_invocation`]: validates one raw line against a directive's
//!   `(name, arity)` and extracts indentation and arguments.
//! - [`Directive`]: the call protocol every handler implements. The provided
//!   [`Directive::invoke`] validates syntax, then delegates to
//!   [`Directive::run`].
//! - [`ComposedDirective`]: handlers built from the code, output and figure
//!   [blocks](blocks) in a fixed order. All built-ins are composed directives.
//! - [`Registry`]: ordered name lookup over built-in, custom (TOML-defined) and
//!   programmatically registered handlers.
//! - [`CodeBackend`]: the seam to the language collaborator that resolves
//!   source and executes fragments.
//!
//! # Example
//!
//! ```
//! use rstx_directive::{Directive, DirectiveContext, DirectiveError, Registry};
//!
//! struct Shout;
//!
//! impl Directive for Shout {
//!     fn name(&self) -> &str { "shout" }
//!     fn arity(&self) -> usize { 1 }
//!
//!     fn run(
//!         &self,
//!         _ctx: &DirectiveContext<'_>,
//!         indent: usize,
//!         args: &[String],
//!     ) -> Result<Vec<String>, DirectiveError> {
//!         Ok(vec![format!("{}{}\n", " ".repeat(indent), args[0].to_uppercase())])
//!     }
//! }
//!
//! let registry = Registry::new().with(Shout);
//! let directive = registry.matching("  .. shout:: hello\n").unwrap();
//! assert_eq!(directive.name(), "shout");
//! ```

pub mod blocks;
mod backend;
mod composed;
mod context;
mod definition;
mod directive;
mod error;
mod grammar;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod registry;

pub use backend::{CodeBackend, ExecError, ResolveError};
pub use blocks::BlockKind;
pub use composed::{ComposedDirective, Scale, SourceMode};
pub use context::DirectiveContext;
pub use definition::DirectiveDefinition;
pub use directive::Directive;
pub use error::{DirectiveError, RegistryError};
pub use grammar::{Invocation, MARKER, SEPARATOR, SyntaxError, parse_invocation, strip_spaces};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockBackend;
pub use registry::{Origin, Registry};
