//! File relocator: materialize moved files from a trusted snapshot.
//!
//! Content is read from committed history rather than the working tree, so a
//! tree that has already been partly rewritten cannot leak into the copies.
//! The source path is never touched here; the stub generator owns it.

use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{ErrorCode, Result};
use crate::layout::SourceLayout;
use crate::output::BatchResult;
use crate::rename_map::{RenameEntry, RenameMap};
use crate::utils::io::{self, WriteOutcome};
use crate::walker::relative_display;

/// Point-in-time file content, keyed by repository-relative `/` paths.
///
/// Implementations return `source.not_found` for paths that did not exist
/// at the reference point.
pub trait CommittedContent {
    fn get_committed_content(&self, relative_path: &str) -> Result<Vec<u8>>;
}

/// Fixed in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemorySnapshot {
    files: HashMap<String, Vec<u8>>,
}

impl InMemorySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), content.into());
    }
}

impl CommittedContent for InMemorySnapshot {
    fn get_committed_content(&self, relative_path: &str) -> Result<Vec<u8>> {
        self.files
            .get(relative_path)
            .cloned()
            .ok_or_else(|| crate::error::Error::source_not_found(relative_path, None))
    }
}

/// Where the relocator reads from and reports against.
#[derive(Debug, Clone)]
pub struct RelocateOptions {
    /// The layout base directory expressed relative to the snapshot's root.
    pub snapshot_prefix: String,
    /// Root used for display paths in the report.
    pub project_root: PathBuf,
}

pub struct FileRelocator<'a> {
    map: &'a RenameMap,
    layout: &'a SourceLayout,
    options: RelocateOptions,
    namespace_pattern: Regex,
}

impl<'a> FileRelocator<'a> {
    pub fn new(
        map: &'a RenameMap,
        layout: &'a SourceLayout,
        options: RelocateOptions,
    ) -> Result<Self> {
        Ok(Self {
            map,
            layout,
            options,
            namespace_pattern: layout.syntax.namespace_pattern()?,
        })
    }

    /// Repository-relative path the snapshot is asked for.
    pub fn snapshot_path(&self, entry: &RenameEntry) -> String {
        let relative = self.layout.relative_path(&entry.source);
        let prefix = self.options.snapshot_prefix.trim_matches('/');
        if prefix.is_empty() || prefix == "." {
            relative
        } else {
            format!("{}/{}", prefix, relative)
        }
    }

    /// Copy every entry forward. One entry's failure never stops the rest.
    pub fn run(&self, snapshot: &dyn CommittedContent, write: bool) -> BatchResult {
        let mut batch = BatchResult::new();

        for entry in self.map.entries() {
            self.relocate_entry(entry, snapshot, write, &mut batch);
        }

        batch
    }

    fn relocate_entry(
        &self,
        entry: &RenameEntry,
        snapshot: &dyn CommittedContent,
        write: bool,
        batch: &mut BatchResult,
    ) {
        let id = entry.source.to_string();
        let source_path = self.snapshot_path(entry);

        let bytes = match snapshot.get_committed_content(&source_path) {
            Ok(bytes) => bytes,
            Err(err) if err.code == ErrorCode::SourceNotFound => {
                crate::log_status!("relocate", "Skipping {}: {}", id, err.message);
                batch.record_skipped(id, err.message);
                return;
            }
            Err(err) => {
                crate::log_status!("relocate", "Failed {}: {}", id, err.message);
                batch.record_error(id, err.message);
                return;
            }
        };

        let content = match io::decode_text(bytes, &source_path) {
            Ok(content) => content,
            Err(err) => {
                crate::log_status!("relocate", "Failed {}: {}", id, err.message);
                batch.record_error(id, err.message);
                return;
            }
        };

        let (relocated, had_header) = match rewrite_namespace_header(
            &content,
            &self.namespace_pattern,
            entry.target.namespace(),
        ) {
            Some(rewritten) => (rewritten, true),
            None => (content, false),
        };

        let target_path = self.layout.path_for(&entry.target);
        let display = relative_display(&self.options.project_root, &target_path);

        let outcome = if write {
            match io::write_if_changed(&target_path, &relocated, &format!("write {}", display)) {
                Ok(outcome) => outcome,
                Err(err) => {
                    crate::log_status!("relocate", "Failed {}: {}", id, err.message);
                    batch.record_error(id, err.message);
                    return;
                }
            }
        } else {
            io::planned_outcome(&target_path, &relocated)
        };

        if write && outcome != WriteOutcome::Unchanged {
            crate::log_status!("relocate", "{} -> {}", id, display);
        }

        batch.record_write(id, display, outcome);
        if !had_header {
            batch.annotate_last("no namespace header; copied verbatim");
        }
    }
}

/// Replace the first namespace declaration's name with `namespace`.
///
/// Returns `None` when the text has no declaration.
pub fn rewrite_namespace_header(
    content: &str,
    pattern: &Regex,
    namespace: &str,
) -> Option<String> {
    let caps = pattern.captures(content)?;
    let name = caps.get(2)?;

    let mut out = String::with_capacity(content.len() + namespace.len());
    out.push_str(&content[..name.start()]);
    out.push_str(namespace);
    out.push_str(&content[name.end()..]);
    Some(out)
}
