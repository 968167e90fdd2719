//! Source discovery by filesystem walking.

use std::fs;
use std::path::{Path, PathBuf};

/// Extension of files containing directives.
pub const SOURCE_EXTENSION: &str = "rstx";

/// Extension of generated reStructuredText files.
pub const OUTPUT_EXTENSION: &str = "rst";

/// Find every `.rstx` file below `root`, sorted by path.
///
/// Hidden files and directories (name starting with `.`) are skipped.
/// Returns an empty Vec if `root` doesn't exist. Unreadable subdirectories
/// are skipped.
#[must_use]
pub fn find_sources(root: &Path) -> Vec<PathBuf> {
    let mut sources = Vec::new();
    if root.is_dir() {
        scan_directory(root, &mut sources);
    }
    sources.sort();
    sources
}

fn scan_directory(dir: &Path, sources: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::warn!(dir = %dir.display(), "cannot read directory, skipping");
        return;
    };

    for entry in entries.filter_map(Result::ok) {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());

        if is_dir {
            scan_directory(&path, sources);
        } else if path.extension().is_some_and(|e| e == SOURCE_EXTENSION) {
            sources.push(path);
        }
    }
}

/// Output path for a source file: `guide.rstx` becomes `guide.rst`.
#[must_use]
pub fn output_path(source: &Path) -> PathBuf {
    source.with_extension(OUTPUT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_find_sources_empty_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(find_sources(temp_dir.path()).is_empty());
    }

    #[test]
    fn test_find_sources_missing_dir() {
        assert!(find_sources(Path::new("/nonexistent/rstx/docs")).is_empty());
    }

    #[test]
    fn test_find_sources_recursive_sorted() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("b/nested")).unwrap();
        fs::create_dir_all(root.join("a")).unwrap();
        fs::write(root.join("b/nested/deep.rstx"), "").unwrap();
        fs::write(root.join("a/first.rstx"), "").unwrap();
        fs::write(root.join("top.rstx"), "").unwrap();
        fs::write(root.join("top.rst"), "").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();

        assert_eq!(
            find_sources(root),
            vec![
                root.join("a/first.rstx"),
                root.join("b/nested/deep.rstx"),
                root.join("top.rstx"),
            ]
        );
    }

    #[test]
    fn test_find_sources_skips_hidden() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join(".cache/stale.rstx"), "").unwrap();
        fs::write(root.join(".draft.rstx"), "").unwrap();
        fs::write(root.join("page.rstx"), "").unwrap();

        assert_eq!(find_sources(root), vec![root.join("page.rstx")]);
    }

    #[test]
    fn test_output_path() {
        assert_eq!(
            output_path(Path::new("docs/guide.rstx")),
            PathBuf::from("docs/guide.rst")
        );
    }
}
