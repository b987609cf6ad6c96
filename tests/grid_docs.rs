use std::fs;

use pkgshift::config::Project;
use pkgshift::grid_docs::{generate, ClassificationStrategy, GridLayer, PredicateSource};
use pkgshift::utils::io::WriteOutcome;
use pkgshift::ErrorCode;
use tempfile::TempDir;

const FACTORY: &str = r#"
final class DemoPanelFactory {
    static ChartPanel create(String title) {
        return switch (title) {
            case "Polar Chart" -> PolarPanel.create();
            case "ECG" -> EcgPanel.create();
            case "Candlestick" -> CandlestickPanel.create();
            case "Smith Chart" -> SmithPanel.create();
            case "Line" -> LinePanel.create();
            default -> LinePanel.create();
        };
    }

    private static boolean isMedicalChart(String title) {
        return "ECG".equals(title) || "Polar Chart".equals(title);
    }

    private static boolean isFinancialChart(String title) {
        return "Candlestick".equals(title);
    }
}
"#;

#[test]
fn predicate_docs_regenerate_identically() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("DemoPanelFactory.java"), FACTORY).unwrap();
    fs::write(
        root.join("pkgshift.json"),
        r#"{
            "docs": {
                "strategy": "predicates",
                "input": "DemoPanelFactory.java",
                "output": "docs/DEMO_GRID_MAPPING.md",
                "title": "Demo Grid Mapping",
                "description": "Grid layers applied by the demo panel factory."
            }
        }"#,
    )
    .unwrap();

    let project = Project::load(Some(&root.join("pkgshift.json"))).unwrap();
    let settings = project.docs().unwrap();

    let first = generate(
        settings.strategy.as_ref(),
        &settings.options,
        &settings.output,
        &settings.output_display,
        true,
    )
    .unwrap();
    assert_eq!(first.outcome, WriteOutcome::Created);
    let bytes = fs::read(root.join("docs/DEMO_GRID_MAPPING.md")).unwrap();

    let second = generate(
        settings.strategy.as_ref(),
        &settings.options,
        &settings.output,
        &settings.output_display,
        true,
    )
    .unwrap();
    assert_eq!(second.outcome, WriteOutcome::Unchanged);
    assert_eq!(fs::read(root.join("docs/DEMO_GRID_MAPPING.md")).unwrap(), bytes);

    let text = String::from_utf8(bytes).unwrap();
    assert!(text.starts_with("# Demo Grid Mapping\n\n> **Auto-generated** from `DemoPanelFactory.java`"));
    assert!(text.ends_with("## DefaultGridLayer\n- Line\n"));

    let medical = text.find("## MedicalGridLayer").unwrap();
    let financial = text.find("## FinancialGridLayer").unwrap();
    let polar = text.find("## PolarGridLayer").unwrap();
    let smith = text.find("## SmithChartGridLayer").unwrap();
    assert!(medical < financial && financial < polar && polar < smith);
}

#[test]
fn polar_literal_outranks_medical_predicate() {
    let mapping = PredicateSource::new("DemoPanelFactory.java", FACTORY)
        .classify()
        .unwrap();
    assert_eq!(mapping.get("Polar Chart"), Some(GridLayer::Polar));
    assert_eq!(mapping.get("ECG"), Some(GridLayer::Medical));
    assert_eq!(mapping.get("Smith Chart"), Some(GridLayer::SmithChart));
}

#[test]
fn empty_catalog_aborts_without_output() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("catalog.txt"), "# generated\n\n# nothing yet\n").unwrap();
    fs::write(
        root.join("pkgshift.json"),
        r#"{ "docs": { "strategy": "catalog", "input": "catalog.txt", "output": "GRID.md" } }"#,
    )
    .unwrap();

    let settings = Project::load(Some(&root.join("pkgshift.json")))
        .unwrap()
        .docs()
        .unwrap();
    let err = generate(
        settings.strategy.as_ref(),
        &settings.options,
        &settings.output,
        &settings.output_display,
        true,
    )
    .unwrap_err();

    assert_eq!(err.code, ErrorCode::ArtifactEmpty);
    assert!(!root.join("GRID.md").exists());
}
