//! Directive invocation syntax.
//!
//! Validates lines of the form `<spaces>.. <name>:: <arg1>, <arg2>, ...`.

/// Literal prefix that precedes a directive name.
pub const MARKER: &str = "..";

/// Separator between the directive name and its arguments.
pub const SEPARATOR: &str = "::";

/// Parsed directive invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Column of the marker, i.e. the number of leading spaces.
    pub indent: usize,
    /// Comma-separated arguments with all spaces removed.
    pub args: Vec<String>,
}

/// Malformed directive invocation.
///
/// Carries only the cause; file and line are attached by
/// [`Directive::invoke`](crate::Directive::invoke).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// The line does not contain `.. <name>`.
    #[error("expected \".. {name}::\" in the directive line.")]
    MissingMarker { name: String },
    /// Something other than spaces precedes the marker.
    #[error("there should only be white spaces before the directive.")]
    LeadingText,
    /// No `::` after the directive name.
    #[error("\"::\" is missing after the directive name.")]
    MissingSeparator,
    /// More than one `::` in the line.
    #[error("\"::\" should only appear once.")]
    RepeatedSeparator,
    /// Wrong number of arguments.
    #[error("there should be {expected} arguments for directive \"{name}\", separated by commas.")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },
}

/// Remove every space character from a line.
///
/// Directive membership is decided on the stripped line, so `..  name ::`
/// and `..name::` are both recognized.
#[must_use]
pub fn strip_spaces(line: &str) -> String {
    line.replace(' ', "")
}

/// Whether a space-stripped line mentions `..<name>::`.
pub(crate) fn mentions(stripped: &str, name: &str) -> bool {
    stripped.contains(&format!("{MARKER}{name}{SEPARATOR}"))
}

/// Parse a raw line as an invocation of the directive `name` with `arity`
/// arguments.
///
/// # Example
///
/// ```
/// use rstx_directive::parse_invocation;
///
/// let inv = parse_invocation("embed-test", 3, "  .. embed-test:: pkg.mod, Case, test_it\n").unwrap();
/// assert_eq!(inv.indent, 2);
/// assert_eq!(inv.args, vec!["pkg.mod", "Case", "test_it"]);
/// ```
pub fn parse_invocation(name: &str, arity: usize, line: &str) -> Result<Invocation, SyntaxError> {
    let indent = line
        .find(&format!("{MARKER} {name}"))
        .ok_or_else(|| SyntaxError::MissingMarker {
            name: name.to_owned(),
        })?;

    if !line[..indent].bytes().all(|b| b == b' ') {
        return Err(SyntaxError::LeadingText);
    }

    let stripped: String = line
        .chars()
        .filter(|c| !matches!(c, ' ' | '\n' | '\r'))
        .collect();

    let mut parts = stripped.split(SEPARATOR).skip(1);
    let tail = parts.next().ok_or(SyntaxError::MissingSeparator)?;
    if parts.next().is_some() {
        return Err(SyntaxError::RepeatedSeparator);
    }

    let args: Vec<String> = if tail.is_empty() {
        Vec::new()
    } else {
        tail.split(',').map(str::to_owned).collect()
    };

    if args.len() != arity {
        return Err(SyntaxError::Arity {
            name: name.to_owned(),
            expected: arity,
            found: args.len(),
        });
    }

    Ok(Invocation { indent, args })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_argument() {
        let inv = parse_invocation("embed-module", 1, "  .. embed-module:: pkg.mod\n").unwrap();
        assert_eq!(inv.indent, 2);
        assert_eq!(inv.args, vec!["pkg.mod"]);
    }

    #[test]
    fn test_no_indent() {
        let inv = parse_invocation("embed-module", 1, ".. embed-module:: pkg.mod\n").unwrap();
        assert_eq!(inv.indent, 0);
    }

    #[test]
    fn test_spaces_inside_arguments_are_removed() {
        let inv = parse_invocation("embed-module-plot", 2, ".. embed-module-plot::  pkg. mod ,  50 \n")
            .unwrap();
        assert_eq!(inv.args, vec!["pkg.mod", "50"]);
    }

    #[test]
    fn test_zero_arity_with_empty_arguments() {
        let inv = parse_invocation("toc", 0, "    .. toc::\n").unwrap();
        assert_eq!(inv.indent, 4);
        assert!(inv.args.is_empty());
    }

    #[test]
    fn test_zero_arity_with_trailing_spaces() {
        let inv = parse_invocation("toc", 0, ".. toc::   \r\n").unwrap();
        assert!(inv.args.is_empty());
    }

    #[test]
    fn test_text_before_marker() {
        let err = parse_invocation("embed-module", 1, "x .. embed-module:: pkg.mod\n").unwrap_err();
        assert_eq!(err, SyntaxError::LeadingText);
    }

    #[test]
    fn test_tab_before_marker() {
        let err = parse_invocation("embed-module", 1, "\t.. embed-module:: pkg.mod\n").unwrap_err();
        assert_eq!(err, SyntaxError::LeadingText);
    }

    #[test]
    fn test_repeated_separator() {
        let err = parse_invocation("embed-module", 1, ".. embed-module:: a::b\n").unwrap_err();
        assert_eq!(err, SyntaxError::RepeatedSeparator);
    }

    #[test]
    fn test_missing_separator() {
        let err = parse_invocation("embed-module", 1, ".. embed-module pkg.mod\n").unwrap_err();
        assert_eq!(err, SyntaxError::MissingSeparator);
    }

    #[test]
    fn test_missing_marker() {
        let err = parse_invocation("embed-module", 1, "..embed-module:: pkg.mod\n").unwrap_err();
        assert!(matches!(err, SyntaxError::MissingMarker { .. }));
    }

    #[test]
    fn test_too_few_arguments() {
        let err = parse_invocation("embed-test", 3, ".. embed-test:: pkg.mod, Case\n").unwrap_err();
        assert_eq!(
            err,
            SyntaxError::Arity {
                name: "embed-test".to_owned(),
                expected: 3,
                found: 2,
            }
        );
        assert_eq!(
            err.to_string(),
            "there should be 3 arguments for directive \"embed-test\", separated by commas."
        );
    }

    #[test]
    fn test_too_many_arguments() {
        let err = parse_invocation("embed-module", 1, ".. embed-module:: a, b\n").unwrap_err();
        assert!(matches!(err, SyntaxError::Arity { expected: 1, found: 2, .. }));
    }

    #[test]
    fn test_empty_arguments_for_nonzero_arity() {
        let err = parse_invocation("embed-module", 1, ".. embed-module::\n").unwrap_err();
        assert!(matches!(err, SyntaxError::Arity { expected: 1, found: 0, .. }));
    }

    #[test]
    fn test_trailing_comma_counts_as_argument() {
        let err = parse_invocation("embed-module", 1, ".. embed-module:: pkg.mod,\n").unwrap_err();
        assert!(matches!(err, SyntaxError::Arity { expected: 1, found: 2, .. }));
    }

    #[test]
    fn test_mentions() {
        assert!(mentions("..embed-module::pkg.mod\n", "embed-module"));
        assert!(!mentions("..embed-module-print::pkg.mod\n", "embed-module"));
        assert!(!mentions("Seeembed-module::here\n", "embed-module"));
    }

    #[test]
    fn test_strip_spaces() {
        assert_eq!(strip_spaces("  .. a:: b, c\n"), "..a::b,c\n");
    }
}
