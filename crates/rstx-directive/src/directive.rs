//! Directive handler trait.

use crate::{DirectiveContext, DirectiveError, parse_invocation};

/// Handler for a named, fixed-arity directive: `.. name:: arg1, arg2`
///
/// Implementors declare [`name`](Self::name) and [`arity`](Self::arity) and
/// generate content in [`run`](Self::run). Syntax validation lives in the
/// provided [`invoke`](Self::invoke) and is shared by every handler.
///
/// # Example
///
/// ```
/// use rstx_directive::{Directive, DirectiveContext, DirectiveError};
///
/// struct Note;
///
/// impl Directive for Note {
///     fn name(&self) -> &str { "note-todo" }
///     fn arity(&self) -> usize { 0 }
///
///     fn run(
///         &self,
///         _ctx: &DirectiveContext<'_>,
///         indent: usize,
///         _args: &[String],
///     ) -> Result<Vec<String>, DirectiveError> {
///         let pad = " ".repeat(indent);
///         Ok(vec![format!("{pad}.. note::\n"), "\n".to_owned(), format!("{pad}  TODO\n")])
///     }
/// }
/// ```
pub trait Directive {
    /// Directive name, matched as `.. <name>::`.
    fn name(&self) -> &str;

    /// Exact number of comma-separated arguments.
    fn arity(&self) -> usize;

    /// Generate replacement lines for a validated invocation.
    ///
    /// Every returned line must end with `\n`. `args` has exactly
    /// [`arity`](Self::arity) elements.
    fn run(
        &self,
        ctx: &DirectiveContext<'_>,
        indent: usize,
        args: &[String],
    ) -> Result<Vec<String>, DirectiveError>;

    /// Validate `line` against this directive's name and arity, then run it.
    ///
    /// Syntax errors are reported with the file path and 1-based line number
    /// from `ctx`. Errors returned by [`run`](Self::run) are passed through.
    fn invoke(&self, ctx: &DirectiveContext<'_>, line: &str) -> Result<Vec<String>, DirectiveError> {
        let invocation =
            parse_invocation(self.name(), self.arity(), line).map_err(|source| {
                DirectiveError::Syntax {
                    path: ctx.file_path(),
                    line: ctx.line(),
                    source,
                }
            })?;

        tracing::debug!(
            directive = self.name(),
            file = %ctx.file_path().display(),
            line = ctx.line(),
            args = ?invocation.args,
            "invoking directive"
        );

        self.run(ctx, invocation.indent, &invocation.args)
    }
}
