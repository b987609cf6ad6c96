use clap::Args;

use pkgshift::grid_docs::{self, DocsReport};
use pkgshift::utils::io::WriteOutcome;

use super::{plural, CmdResult, GlobalArgs};
use crate::output::Summary;

#[derive(Args)]
pub struct GridDocsArgs {}

/// Regenerate the configured grid mapping document.
pub fn run(_args: GridDocsArgs, global: &GlobalArgs) -> CmdResult<DocsReport> {
    let project = global.project()?;
    let settings = project.docs()?;

    let report = grid_docs::generate(
        settings.strategy.as_ref(),
        &settings.options,
        &settings.output,
        &settings.output_display,
        true,
    )?;

    Ok((report, 0))
}

impl Summary for DocsReport {
    fn summary(&self) -> String {
        let verb = match self.outcome {
            WriteOutcome::Created => "Wrote",
            WriteOutcome::Updated => "Updated",
            WriteOutcome::Unchanged => "Unchanged:",
        };
        format!(
            "{} {} ({} in {})",
            verb,
            self.output,
            plural(self.entries, "entry", "entries"),
            plural(self.categories.len(), "grid layer", "grid layers"),
        )
    }
}
