use std::path::PathBuf;

use pkgshift::config::Project;

pub type CmdResult<T> = pkgshift::Result<(T, i32)>;

pub(crate) struct GlobalArgs {
    /// Explicit config file; `./pkgshift.json` otherwise.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    pub(crate) fn project(&self) -> pkgshift::Result<Project> {
        Project::load(self.config.as_deref())
    }
}

/// `1 file` / `3 files`.
pub(crate) fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{} {}", count, if count == 1 { one } else { many })
}

pub mod grid_docs;
pub mod migrate;
pub mod relocate;
