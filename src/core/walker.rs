//! Source tree enumeration.

use glob_match::glob_match;
use std::path::{Path, PathBuf};

/// Directories to always skip at any depth (dependency/VCS directories).
const ALWAYS_SKIP_DIRS: &[&str] = &["node_modules", "vendor", ".git", ".svn", ".hg"];

/// Directories to skip only directly under a scan root (build output).
const ROOT_ONLY_SKIP_DIRS: &[&str] = &["build", "target", "out"];

/// A file yielded by the walker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    pub path: PathBuf,
    /// Path relative to the project root, `/`-separated.
    pub relative: String,
}

/// Walks configured scan roots for files with one extension.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    project_root: PathBuf,
    scan_roots: Vec<PathBuf>,
    extension: String,
    exclude: Vec<String>,
}

impl TreeWalker {
    pub fn new(
        project_root: impl Into<PathBuf>,
        scan_roots: Vec<PathBuf>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            scan_roots,
            extension: extension.into(),
            exclude: Vec::new(),
        }
    }

    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns;
        self
    }

    /// Every matching file under every scan root, sorted by relative path.
    /// Absent roots are skipped.
    pub fn walk(&self) -> Vec<WalkedFile> {
        let mut files = Vec::new();

        for root in &self.scan_roots {
            if !root.is_dir() {
                crate::log_status!("walk", "Skipping missing scan root {}", root.display());
                continue;
            }
            walk_recursive(root, root, &self.extension, &mut files);
        }

        let mut walked: Vec<WalkedFile> = files
            .into_iter()
            .map(|path| {
                let relative = relative_display(&self.project_root, &path);
                WalkedFile { path, relative }
            })
            .filter(|f| !self.is_excluded(&f.relative))
            .collect();

        walked.sort_by(|a, b| a.relative.cmp(&b.relative));
        walked.dedup_by(|a, b| a.relative == b.relative);
        walked
    }

    fn is_excluded(&self, relative: &str) -> bool {
        self.exclude.iter().any(|p| glob_match(p, relative))
    }
}

fn walk_recursive(dir: &Path, root: &Path, extension: &str, files: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    let is_root = dir == root;

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if ALWAYS_SKIP_DIRS.contains(&name.as_str()) {
                continue;
            }
            if is_root && ROOT_ONLY_SKIP_DIRS.contains(&name.as_str()) {
                continue;
            }
            walk_recursive(&path, root, extension, files);
        } else if path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path);
        }
    }
}

/// Relative `/`-separated display path, falling back to the full path.
pub(crate) fn relative_display(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "class X {}\n").unwrap();
    }

    #[test]
    fn walks_only_matching_extension_sorted() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/b/B.java");
        touch(root, "src/a/A.java");
        touch(root, "src/a/notes.md");

        let walker = TreeWalker::new(root, vec![root.join("src")], "java");
        let relative: Vec<String> = walker.walk().into_iter().map(|f| f.relative).collect();

        assert_eq!(relative, vec!["src/a/A.java", "src/b/B.java"]);
    }

    #[test]
    fn skips_vcs_dirs_everywhere_and_build_dirs_at_root() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/.git/Hidden.java");
        touch(root, "src/build/Generated.java");
        touch(root, "src/pkg/build/Kept.java");

        let walker = TreeWalker::new(root, vec![root.join("src")], "java");
        let relative: Vec<String> = walker.walk().into_iter().map(|f| f.relative).collect();

        assert_eq!(relative, vec!["src/pkg/build/Kept.java"]);
    }

    #[test]
    fn missing_roots_are_ignored_and_excludes_apply() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/keep/Keep.java");
        touch(root, "src/gen/Gen.java");

        let walker = TreeWalker::new(
            root,
            vec![root.join("src"), root.join("does-not-exist")],
            "java",
        )
        .with_exclude(vec!["src/gen/**".to_string()]);
        let relative: Vec<String> = walker.walk().into_iter().map(|f| f.relative).collect();

        assert_eq!(relative, vec!["src/keep/Keep.java"]);
    }

    #[test]
    fn overlapping_roots_yield_each_file_once() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "src/a/A.java");

        let walker = TreeWalker::new(root, vec![root.join("src"), root.join("src/a")], "java");
        assert_eq!(walker.walk().len(), 1);
    }
}
