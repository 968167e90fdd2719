//! Module lookup and member extraction.
//!
//! Works on source text only; nothing is imported or executed.

use std::path::PathBuf;

/// Which part of a member reference was not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Missing {
    Container,
    Member,
}

/// Find the file of a dotted module path under the first matching root.
///
/// `a.b` resolves to `<root>/a/b.py`, or to `<root>/a/b/__init__.py` for a
/// package.
pub(crate) fn find_module(module: &str, roots: &[PathBuf]) -> Option<PathBuf> {
    let parts: Vec<&str> = module.split('.').collect();
    if !parts.iter().all(|part| is_identifier(part)) {
        return None;
    }
    let relative: PathBuf = parts.iter().collect();

    roots.iter().find_map(|root| {
        let candidates = [
            root.join(&relative).with_extension("py"),
            root.join(&relative).join("__init__.py"),
        ];
        candidates.into_iter().find(|path| path.is_file())
    })
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Source of `member` defined in `class container`.
///
/// Includes decorators directly above the `def` line and ends before the
/// first non-blank line indented no deeper than the `def`. Trailing blank
/// lines are dropped; the result ends with a newline.
pub(crate) fn extract_member(source: &str, container: &str, member: &str) -> Result<String, Missing> {
    let lines: Vec<&str> = source.lines().collect();

    let (class_idx, class_indent) = lines
        .iter()
        .enumerate()
        .find(|(_, line)| starts_definition(line, "class", container))
        .map(|(idx, line)| (idx, indent_of(line)))
        .ok_or(Missing::Container)?;

    let class_end = block_end(&lines, class_idx, class_indent);

    let def_idx = (class_idx + 1..class_end)
        .find(|&idx| {
            starts_definition(lines[idx], "def", member)
                || starts_definition(lines[idx], "async def", member)
        })
        .ok_or(Missing::Member)?;
    let def_indent = indent_of(lines[def_idx]);

    let mut start = def_idx;
    while start > class_idx + 1 {
        let prev = lines[start - 1];
        if prev.trim_start().starts_with('@') && indent_of(prev) == def_indent {
            start -= 1;
        } else {
            break;
        }
    }

    let mut end = block_end(&lines, def_idx, def_indent);
    while end > def_idx + 1 && lines[end - 1].trim().is_empty() {
        end -= 1;
    }

    let mut member_source = lines[start..end].join("\n");
    member_source.push('\n');
    Ok(member_source)
}

/// Whether `line` opens `keyword name` (e.g. `class Case(Base):`).
fn starts_definition(line: &str, keyword: &str, name: &str) -> bool {
    line.trim_start()
        .strip_prefix(keyword)
        .and_then(|rest| rest.strip_prefix(' '))
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix(name))
        .is_some_and(|rest| rest.starts_with(['(', ':', ' ']))
}

/// Index one past the last line of the block opened at `header`.
fn block_end(lines: &[&str], header: usize, header_indent: usize) -> usize {
    (header + 1..lines.len())
        .find(|&idx| !lines[idx].trim().is_empty() && indent_of(lines[idx]) <= header_indent)
        .unwrap_or(lines.len())
}

fn indent_of(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}
