//! Filesystem listing for the path widget.
//!
//! One directory level at a time via the [`ignore`] walker. Hidden entries
//! are skipped unless asked for, and files are filtered by a glob pattern.

use std::path::{Path, PathBuf};

use glob::Pattern;
use ignore::WalkBuilder;

/// Configuration knobs for one listing.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    /// Show hidden (dot-prefixed) entries.
    pub show_hidden: bool,
    /// Glob applied to file names. Directories are always listed.
    pub filter: Pattern,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            show_hidden: false,
            filter: Pattern::new("*").unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// List the immediate children of `dir`.
///
/// Directories are sorted before files; within each group entries are sorted
/// alphabetically (case-insensitive).
pub fn list_dir(dir: &Path, config: &ListingConfig) -> anyhow::Result<Vec<DirEntry>> {
    if !dir.is_dir() {
        anyhow::bail!("{} is not a directory", dir.display());
    }

    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1)) // only immediate children
        .hidden(!config.show_hidden)
        .git_ignore(false)
        .ignore(false)
        .parents(false)
        .build();

    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        // WalkBuilder yields the root as its first entry.
        if path == dir {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
        if !is_dir && !config.filter.matches(&name) {
            continue;
        }
        let item = DirEntry {
            name,
            path: path.to_path_buf(),
            is_dir,
        };
        if is_dir {
            dirs.push(item);
        } else {
            files.push(item);
        }
    }

    dirs.sort_by_key(|e| e.name.to_lowercase());
    files.sort_by_key(|e| e.name.to_lowercase());
    dirs.extend(files);
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dirs_first_and_filtered() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("zeta")).unwrap();
        std::fs::write(tmp.path().join("B.yaml"), "").unwrap();
        std::fs::write(tmp.path().join("a.yaml"), "").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "").unwrap();
        std::fs::write(tmp.path().join(".hidden.yaml"), "").unwrap();

        let config = ListingConfig {
            show_hidden: false,
            filter: Pattern::new("*.yaml").unwrap(),
        };
        let names: Vec<_> = list_dir(tmp.path(), &config)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["zeta", "a.yaml", "B.yaml"]);
    }

    #[test]
    fn test_hidden_shown_on_request() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(".env"), "").unwrap();
        let config = ListingConfig {
            show_hidden: true,
            ..ListingConfig::default()
        };
        let entries = list_dir(tmp.path(), &config).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, ".env");
    }

    #[test]
    fn test_missing_dir_is_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(list_dir(&tmp.path().join("nope"), &ListingConfig::default()).is_err());
    }
}
