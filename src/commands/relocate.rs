use clap::Args;
use serde::Serialize;

use pkgshift::git::GitSnapshot;
use pkgshift::refactor::FileRelocator;
use pkgshift::BatchResult;

use super::{plural, CmdResult, GlobalArgs};
use crate::output::Summary;

#[derive(Args)]
pub struct RelocateArgs {
    /// Report what would be written without writing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelocateOutput {
    pub command: &'static str,
    pub map_version: String,
    pub revision: String,
    pub dry_run: bool,
    pub batch: BatchResult,
}

/// Copy every mapped file forward from the configured git revision.
pub fn run(args: RelocateArgs, global: &GlobalArgs) -> CmdResult<RelocateOutput> {
    let project = global.project()?;
    let map = project.rename_map()?;
    let layout = project.layout()?;
    let options = project.relocate_options(&layout)?;
    let snapshot = GitSnapshot::open(project.snapshot_repo()?, project.snapshot_revision())?;

    let batch = FileRelocator::new(&map, &layout, options)?.run(&snapshot, !args.dry_run);

    Ok((
        RelocateOutput {
            command: "relocate",
            map_version: map.version().to_string(),
            revision: snapshot.revision().to_string(),
            dry_run: args.dry_run,
            batch,
        },
        0,
    ))
}

impl Summary for RelocateOutput {
    fn summary(&self) -> String {
        let b = &self.batch;
        let verb = if self.dry_run { "Would relocate" } else { "Relocated" };
        let mut line = format!(
            "{} {} from {}: {} created, {} updated, {} unchanged, {} skipped",
            verb,
            plural(b.items.len(), "entry", "entries"),
            self.revision,
            b.created,
            b.updated,
            b.unchanged,
            b.skipped,
        );
        if b.errors > 0 {
            line.push_str(&format!(", {} failed", b.errors));
        }
        line
    }

    fn failures(&self) -> Vec<String> {
        self.batch
            .error_lines()
            .into_iter()
            .map(|line| format!("relocate failed for {}", line))
            .collect()
    }
}
