//! Per-file state handed to rules.

use std::path::{Path, PathBuf};

/// The file a rule is looking at.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path as discovered on disk.
    pub path: &'a Path,
    /// Full source text; allow directives are read from it.
    pub content: &'a str,
    /// Path reported in violations, relative to the analyzed root.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Context for a file found under `root`.
    ///
    /// Files outside `root` keep their full path.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        Self {
            path,
            content,
            relative_path,
        }
    }

    /// Context for source that never touched the filesystem.
    #[must_use]
    pub fn for_source(path: &'a Path, content: &'a str) -> Self {
        Self::new(path, content, Path::new(""))
    }
}
