//! Content blocks emitted in place of a directive line.
//!
//! Every block is a list of lines, each terminated by `\n`, indented by the
//! directive's column. Block bodies are indented two further spaces.

use serde::Deserialize;

/// Kind of generated content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum BlockKind {
    /// Source listing.
    #[serde(rename = "code")]
    Code,
    /// Captured standard output of the fragment.
    #[serde(rename = "print", alias = "output")]
    Output,
    /// Figure drawn by the fragment.
    #[serde(rename = "plot", alias = "figure")]
    Figure,
}

/// Split source text into lines on `\n`.
///
/// A trailing newline yields a final empty line, which becomes an indented
/// blank line in the listing.
#[must_use]
pub fn source_lines(source: &str) -> Vec<String> {
    source.split('\n').map(str::to_owned).collect()
}

/// Extract the body of `member` from its full source.
///
/// Drops everything up to and including the first line that contains both
/// `def` and the member name, then removes the indentation of the first
/// remaining line from every line.
#[must_use]
pub fn member_body(source: &str, member: &str) -> Vec<String> {
    let lines: Vec<&str> = source.split('\n').collect();
    let start = lines
        .iter()
        .position(|line| line.contains("def") && line.contains(member))
        .map_or(0, |idx| idx + 1);
    let body = &lines[start..];

    let Some(first) = body.first() else {
        return Vec::new();
    };
    let indent = first.len() - first.trim_start().len();

    body.iter().map(|line| dedent(line, indent)).collect()
}

/// Remove up to `width` leading whitespace characters.
fn dedent(line: &str, width: usize) -> String {
    let skip: usize = line
        .chars()
        .take(width)
        .take_while(|c| c.is_whitespace())
        .map(char::len_utf8)
        .sum();
    line[skip..].to_owned()
}

/// `code-block` listing of `source_lines`.
#[must_use]
pub fn code_block(indent: usize, language: &str, source_lines: &[String]) -> Vec<String> {
    let pad = " ".repeat(indent);
    let mut lines = Vec::with_capacity(source_lines.len() + 2);
    lines.push(format!("{pad}.. code-block:: {language}\n"));
    lines.push("\n".to_owned());
    lines.extend(source_lines.iter().map(|line| format!("{pad}  {line}\n")));
    lines
}

/// Literal block of captured output.
///
/// Empty when the output is empty after removing a single trailing newline.
#[must_use]
pub fn output_block(indent: usize, captured: &str) -> Vec<String> {
    if captured.strip_suffix('\n').unwrap_or(captured).is_empty() {
        return Vec::new();
    }

    let pad = " ".repeat(indent);
    let mut lines = vec![format!("{pad}::\n"), "\n".to_owned()];
    lines.extend(captured.split('\n').map(|line| format!("{pad}  {line}\n")));
    lines
}

/// Centered `figure` directive referencing `figure_name`.
#[must_use]
pub fn figure_block(indent: usize, figure_name: &str, scale: u32) -> Vec<String> {
    let pad = " ".repeat(indent);
    vec![
        format!("{pad}.. figure:: {figure_name}\n"),
        format!("{pad}  :scale: {scale} %\n"),
        format!("{pad}  :align: center\n"),
    ]
}
