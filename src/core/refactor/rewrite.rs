//! Reference rewriter: point import statements at relocated symbols.
//!
//! Walks the scan roots, matches single-line `<keyword> <name><terminator>`
//! statements, and swaps names that are exact keys of the rename map.
//! Everything else in the file is preserved byte-for-byte.

use regex::{Captures, Regex};
use serde::Serialize;

use crate::error::Result;
use crate::layout::SourceSyntax;
use crate::rename_map::RenameMap;
use crate::utils::io;
use crate::walker::{TreeWalker, WalkedFile};

/// Rewrite counts for one file.
#[derive(Debug, Clone, Serialize)]
pub struct FileRewrite {
    /// File path relative to the project root.
    pub file: String,
    pub replacements: usize,
}

/// A file the rewriter could not process.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteReport {
    pub map_version: String,
    pub files_scanned: usize,
    pub files_changed: usize,
    pub references_rewritten: usize,
    pub changes: Vec<FileRewrite>,
    pub failures: Vec<FileFailure>,
    pub applied: bool,
}

/// Rewrites references in memory; [`ReferenceRewriter::run`] walks and writes.
pub struct ReferenceRewriter<'a> {
    map: &'a RenameMap,
    pattern: Regex,
}

impl<'a> ReferenceRewriter<'a> {
    pub fn new(map: &'a RenameMap, syntax: &SourceSyntax) -> Result<Self> {
        Ok(Self {
            map,
            pattern: syntax.reference_pattern()?,
        })
    }

    /// Rewrite one file's text. Returns the new text and replacement count.
    pub fn rewrite_text(&self, content: &str) -> (String, usize) {
        let mut count = 0usize;

        let rewritten = self.pattern.replace_all(content, |caps: &Captures| {
            let whole = &caps[0];
            match self.map.target_for(&caps[2]) {
                Some(target) => {
                    count += 1;
                    // whole = keyword+space, name, terminator
                    let tail = caps[1].len() + caps[2].len();
                    format!("{}{}{}", &caps[1], target, &whole[tail..])
                }
                None => whole.to_string(),
            }
        });

        (rewritten.into_owned(), count)
    }

    /// Rewrite every file the walker yields.
    ///
    /// Per-file failures are recorded and logged; they never abort the pass.
    /// With `write = false` the report is computed without touching disk.
    pub fn run(&self, walker: &TreeWalker, write: bool) -> RewriteReport {
        let mut report = RewriteReport {
            map_version: self.map.version().to_string(),
            ..RewriteReport::default()
        };

        for file in walker.walk() {
            report.files_scanned += 1;

            match self.rewrite_file(&file, write) {
                Ok(Some(change)) => {
                    report.files_changed += 1;
                    report.references_rewritten += change.replacements;
                    report.changes.push(change);
                }
                Ok(None) => {}
                Err(err) => {
                    crate::log_status!("rewrite", "Failed {}: {}", file.relative, err.message);
                    report.failures.push(FileFailure {
                        file: file.relative.clone(),
                        code: err.code.as_str().to_string(),
                        message: err.message,
                    });
                }
            }
        }

        report.applied = write;
        report
    }

    fn rewrite_file(&self, file: &WalkedFile, write: bool) -> Result<Option<FileRewrite>> {
        let content = io::read_text(&file.path, &file.relative)?;
        let (new_content, replacements) = self.rewrite_text(&content);

        if replacements == 0 || new_content == content {
            return Ok(None);
        }

        if write {
            io::write_file(
                &file.path,
                &new_content,
                &format!("write {}", file.relative),
            )?;
            crate::log_status!(
                "rewrite",
                "{}: {} reference(s)",
                file.relative,
                replacements
            );
        }

        Ok(Some(FileRewrite {
            file: file.relative.clone(),
            replacements,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn map() -> RenameMap {
        RenameMap::from_pairs(
            "test",
            [
                ("a.b.FooBar", "x.y.FooBar"),
                ("com.acme.ui.ChartPanel", "com.acme.platform.swing.ChartPanel"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rewrites_exact_matches_only() {
        let map = map();
        let rewriter = ReferenceRewriter::new(&map, &SourceSyntax::default()).unwrap();
        let input = "package demo;\n\nimport a.b.FooBar;\nimport a.b.Foo;\nimport a.b.FooBarBaz;\n";

        let (out, count) = rewriter.rewrite_text(input);

        assert_eq!(count, 1);
        assert_eq!(
            out,
            "package demo;\n\nimport x.y.FooBar;\nimport a.b.Foo;\nimport a.b.FooBarBaz;\n"
        );
    }

    #[test]
    fn prefix_of_mapped_symbol_is_untouched() {
        let map = RenameMap::from_pairs("t", [("a.b.FooBar", "z.FooBar")]).unwrap();
        let rewriter = ReferenceRewriter::new(&map, &SourceSyntax::default()).unwrap();
        let (out, count) = rewriter.rewrite_text("import a.b.Foo;\n");
        assert_eq!(count, 0);
        assert_eq!(out, "import a.b.Foo;\n");
    }

    #[test]
    fn preserves_surrounding_whitespace_and_text() {
        let map = map();
        let rewriter = ReferenceRewriter::new(&map, &SourceSyntax::default()).unwrap();
        let input = "import\t com.acme.ui.ChartPanel;  // legacy\r\nclass A {}";
        let (out, _) = rewriter.rewrite_text(input);
        assert_eq!(
            out,
            "import\t com.acme.platform.swing.ChartPanel;  // legacy\r\nclass A {}"
        );
    }

    #[test]
    fn run_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        let src = root.join("src/demo");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("App.java"), "import a.b.FooBar;\nclass App {}\n").unwrap();
        fs::write(src.join("Other.java"), "import java.util.List;\n").unwrap();

        let map = map();
        let rewriter = ReferenceRewriter::new(&map, &SourceSyntax::default()).unwrap();
        let walker = TreeWalker::new(root, vec![root.join("src")], "java");

        let first = rewriter.run(&walker, true);
        assert_eq!(first.files_scanned, 2);
        assert_eq!(first.files_changed, 1);
        assert_eq!(first.references_rewritten, 1);
        assert_eq!(
            serde_json::to_value(&first.changes[0]).unwrap(),
            serde_json::json!({ "file": "src/demo/App.java", "replacements": 1 })
        );

        let second = rewriter.run(&walker, true);
        assert_eq!(second.files_changed, 0);
        assert_eq!(
            fs::read_to_string(src.join("App.java")).unwrap(),
            "import x.y.FooBar;\nclass App {}\n"
        );
    }

    #[test]
    fn dry_run_leaves_files_alone() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/App.java"), "import a.b.FooBar;\n").unwrap();

        let map = map();
        let rewriter = ReferenceRewriter::new(&map, &SourceSyntax::default()).unwrap();
        let walker = TreeWalker::new(root, vec![root.join("src")], "java");

        let report = rewriter.run(&walker, false);
        assert!(!report.applied);
        assert_eq!(report.files_changed, 1);
        assert_eq!(
            fs::read_to_string(root.join("src/App.java")).unwrap(),
            "import a.b.FooBar;\n"
        );
    }

    #[test]
    fn undecodable_file_fails_alone() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join("src/Bad.java"), [0xffu8, 0xfe, 0x00]).unwrap();
        fs::write(root.join("src/Good.java"), "import a.b.FooBar;\n").unwrap();

        let map = map();
        let rewriter = ReferenceRewriter::new(&map, &SourceSyntax::default()).unwrap();
        let walker = TreeWalker::new(root, vec![root.join("src")], "java");

        let report = rewriter.run(&walker, true);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].file, "src/Bad.java");
        assert_eq!(report.failures[0].code, "source.decode_failed");
        assert_eq!(report.files_changed, 1);
        assert_eq!(
            fs::read_to_string(root.join("src/Good.java")).unwrap(),
            "import x.y.FooBar;\n"
        );
    }
}
