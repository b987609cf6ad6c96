use serde::Serialize;
use std::path::Path;

use super::{ClassificationStrategy, GridMapping};
use crate::error::Result;
use crate::utils::io::{self, WriteOutcome};
use crate::utils::template::{self, ReportVars};

const BANNER_TEMPLATE: &str = "\
> **Auto-generated** from {{input}}. Do not edit manually.
> Run `{{command}}` to refresh.";

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub title: String,
    /// Command named in the banner as the way to refresh the file.
    pub regenerate_command: String,
    pub description: Option<String>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            title: "Grid Mapping".to_string(),
            regenerate_command: "pkgshift grid-docs".to_string(),
            description: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryCount {
    pub grid: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsReport {
    pub output: String,
    pub entries: usize,
    pub categories: Vec<CategoryCount>,
    pub outcome: WriteOutcome,
}

/// Markdown for `mapping`. Same input always yields the same bytes.
pub fn render_report(mapping: &GridMapping, source_label: &str, options: &ReportOptions) -> String {
    let banner = template::render(
        BANNER_TEMPLATE,
        &[
            (ReportVars::INPUT, source_label),
            (ReportVars::COMMAND, options.regenerate_command.as_str()),
        ],
    );
    let mut lines = vec![format!("# {}", options.title), String::new(), banner, String::new()];

    if let Some(description) = options.description.as_deref().map(str::trim) {
        if !description.is_empty() {
            lines.push(description.to_string());
            lines.push(String::new());
        }
    }

    for (grid, names) in mapping.groups() {
        lines.push(format!("## {}", grid.name()));
        lines.extend(names.iter().map(|name| format!("- {}", name)));
        lines.push(String::new());
    }

    let mut out = lines.join("\n").trim_end().to_string();
    out.push('\n');
    out
}

/// Classify, render, then write `output`. Nothing is written unless
/// classification succeeds.
pub fn generate(
    strategy: &dyn ClassificationStrategy,
    options: &ReportOptions,
    output: &Path,
    display: &str,
    write: bool,
) -> Result<DocsReport> {
    let mapping = strategy.classify()?;
    let content = render_report(&mapping, &strategy.source_label(), options);

    let outcome = if write {
        io::write_if_changed(output, &content, &format!("write {}", display))?
    } else {
        io::planned_outcome(output, &content)
    };

    let categories = mapping
        .groups()
        .into_iter()
        .map(|(grid, names)| CategoryCount {
            grid: grid.name().to_string(),
            count: names.len(),
        })
        .collect();

    Ok(DocsReport {
        output: display.to_string(),
        entries: mapping.len(),
        categories,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::grid_docs::FlatCatalog;
    use std::fs;
    use tempfile::TempDir;

    const CATALOG: &str = "\
# renderer catalog
medical|com.x.EcgRenderer
other|com.x.VSWRCircleRenderer
basic|com.x.LineRenderer
basic|com.x.AreaRenderer
bogusline
";

    #[test]
    fn renders_banner_and_sorted_sections() {
        let catalog = FlatCatalog::new("renderer-catalog.txt", CATALOG);
        let mapping = catalog.classify().unwrap();
        let options = ReportOptions {
            title: "Demo Grid Mapping".into(),
            regenerate_command: "pkgshift grid-docs".into(),
            description: Some("Grid layers used by the demo.".into()),
        };

        let text = render_report(&mapping, &catalog.source_label(), &options);
        assert_eq!(
            text,
            "# Demo Grid Mapping\n\
             \n\
             > **Auto-generated** from `renderer-catalog.txt`. Do not edit manually.\n\
             > Run `pkgshift grid-docs` to refresh.\n\
             \n\
             Grid layers used by the demo.\n\
             \n\
             ## MedicalGridLayer\n\
             - EcgRenderer\n\
             \n\
             ## SmithChartGridLayer\n\
             - VSWRCircleRenderer\n\
             \n\
             ## DefaultGridLayer\n\
             - AreaRenderer\n\
             - LineRenderer\n"
        );
    }

    #[test]
    fn regeneration_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("docs/GRID.md");
        let catalog = FlatCatalog::new("catalog.txt", CATALOG);
        let options = ReportOptions::default();

        let first = generate(&catalog, &options, &output, "docs/GRID.md", true).unwrap();
        assert_eq!(first.outcome, WriteOutcome::Created);
        let bytes = fs::read(&output).unwrap();

        let second = generate(&catalog, &options, &output, "docs/GRID.md", true).unwrap();
        assert_eq!(second.outcome, WriteOutcome::Unchanged);
        assert_eq!(fs::read(&output).unwrap(), bytes);

        assert_eq!(first.entries, 4);
        assert_eq!(first.categories.len(), 3);
        assert_eq!(first.categories[2].grid, "DefaultGridLayer");
        assert_eq!(first.categories[2].count, 2);
    }

    #[test]
    fn failed_classification_leaves_previous_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("GRID.md");
        fs::write(&output, "previous\n").unwrap();

        let empty = FlatCatalog::new("catalog.txt", "# only comments\n");
        let err = generate(&empty, &ReportOptions::default(), &output, "GRID.md", true)
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ArtifactEmpty);
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous\n");
    }
}
