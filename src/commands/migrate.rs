use clap::Args;
use serde::Serialize;

use pkgshift::refactor::{ReferenceRewriter, RewriteReport, StubGenerator, StubReport};

use super::{plural, CmdResult, GlobalArgs};
use crate::output::Summary;

#[derive(Args)]
pub struct MigrateArgs {
    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrateOutput {
    pub command: &'static str,
    pub map_version: String,
    pub dry_run: bool,
    pub rewrite: RewriteReport,
    pub stubs: StubReport,
}

/// Rewrite references, then regenerate stubs.
///
/// The stub precondition check runs first so that a strict failure leaves
/// the tree untouched.
pub fn run(args: MigrateArgs, global: &GlobalArgs) -> CmdResult<MigrateOutput> {
    let project = global.project()?;
    let map = project.rename_map()?;
    let layout = project.layout()?;
    let walker = project.walker()?;
    let write = !args.dry_run;

    let stubs = StubGenerator::new(&map, &layout, project.stub_options());
    let warnings = stubs.check()?;

    let rewrite = ReferenceRewriter::new(&map, &layout.syntax)?.run(&walker, write);
    let stubs = stubs.write_all(warnings, write);

    Ok((
        MigrateOutput {
            command: "migrate",
            map_version: map.version().to_string(),
            dry_run: args.dry_run,
            rewrite,
            stubs,
        },
        0,
    ))
}

impl Summary for MigrateOutput {
    fn summary(&self) -> String {
        let verb = if self.dry_run { "Would rewrite" } else { "Rewrote" };
        let batch = &self.stubs.batch;
        let failures = self.rewrite.failures.len() + batch.errors as usize;

        let mut line = format!(
            "{} {} in {} of {} scanned; stubs: {} created, {} updated, {} unchanged",
            verb,
            plural(self.rewrite.references_rewritten, "reference", "references"),
            plural(self.rewrite.files_changed, "file", "files"),
            self.rewrite.files_scanned,
            batch.created,
            batch.updated,
            batch.unchanged,
        );
        if failures > 0 {
            line.push_str(&format!("; {}", plural(failures, "failure", "failures")));
        }
        if !self.stubs.warnings.is_empty() {
            let warnings = plural(self.stubs.warnings.len(), "warning", "warnings");
            line.push_str(&format!("; {}", warnings));
        }
        line.push_str(&format!(" (map {})", self.map_version));
        line
    }

    fn failures(&self) -> Vec<String> {
        self.rewrite
            .failures
            .iter()
            .map(|f| format!("rewrite failed for {}: {} [{}]", f.file, f.message, f.code))
            .chain(
                self.stubs
                    .batch
                    .error_lines()
                    .into_iter()
                    .map(|line| format!("stub failed for {}", line)),
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgshift::refactor::FileFailure;

    #[test]
    fn every_failed_file_is_named() {
        let mut output = MigrateOutput {
            command: "migrate",
            map_version: "v1".to_string(),
            dry_run: false,
            rewrite: RewriteReport::default(),
            stubs: StubReport::default(),
        };
        output.rewrite.files_scanned = 2;
        output.rewrite.failures.push(FileFailure {
            file: "src/Bad.java".to_string(),
            code: "source.decode_failed".to_string(),
            message: "invalid UTF-8".to_string(),
        });
        output
            .stubs
            .batch
            .record_error("a.b.Foo".to_string(), "permission denied".to_string());

        assert!(output.summary().contains("2 failures"));
        assert_eq!(
            output.failures(),
            vec![
                "rewrite failed for src/Bad.java: invalid UTF-8 [source.decode_failed]".to_string(),
                "stub failed for a.b.Foo: permission denied".to_string(),
            ]
        );
    }
}
