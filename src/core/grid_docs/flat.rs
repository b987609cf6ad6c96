//! Flat catalog strategy: `category|qualified.ClassName` per line.

use std::path::Path;

use super::{ClassificationStrategy, GridLayer, GridMapping};
use crate::error::{Error, Result};
use crate::utils::io;

/// Local names always drawn on the Smith chart grid.
pub const SMITH_CHART_RENDERERS: &[&str] = &["SmithChartRenderer", "VSWRCircleRenderer"];

const DELIMITER: char = '|';

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Lowercased declared category.
    pub category: String,
    /// Qualified name as written.
    pub qualified_name: String,
}

impl CatalogEntry {
    pub fn display_name(&self) -> &str {
        local_name(&self.qualified_name)
    }
}

/// Parse one catalog line.
///
/// Blank and `#` comment lines are `Ok(None)`; lines that are not exactly
/// two non-empty fields are `input.malformed`.
pub fn parse_catalog_line(raw: &str, line_no: usize) -> Result<Option<CatalogEntry>> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let parts: Vec<&str> = line.split(DELIMITER).collect();
    if parts.len() != 2 {
        return Err(Error::input_malformed(
            "catalog",
            Some(line_no),
            format!("expected 2 fields, found {}", parts.len()),
        ));
    }

    let category = parts[0].trim().to_lowercase();
    let qualified_name = parts[1].trim().to_string();
    if category.is_empty() || qualified_name.is_empty() {
        return Err(Error::input_malformed(
            "catalog",
            Some(line_no),
            "empty category or name",
        ));
    }

    Ok(Some(CatalogEntry {
        category,
        qualified_name,
    }))
}

/// Parse a catalog, dropping malformed lines.
pub fn parse_catalog(text: &str) -> Vec<CatalogEntry> {
    text.lines()
        .enumerate()
        .filter_map(|(i, raw)| match parse_catalog_line(raw, i + 1) {
            Ok(entry) => entry,
            Err(err) => {
                crate::log_status!("grid-docs", "Line {} dropped: {}", i + 1, err.message);
                None
            }
        })
        .collect()
}

/// Substring after the last `.`, or the whole name.
pub fn local_name(qualified: &str) -> &str {
    match qualified.rfind('.') {
        Some(i) => &qualified[i + 1..],
        None => qualified,
    }
}

fn classify_entry(entry: &CatalogEntry) -> GridLayer {
    if entry.category == "medical" {
        GridLayer::Medical
    } else if SMITH_CHART_RENDERERS.contains(&entry.display_name()) {
        GridLayer::SmithChart
    } else {
        GridLayer::Default
    }
}

/// Catalog text plus where it came from.
#[derive(Debug, Clone)]
pub struct FlatCatalog {
    source: String,
    text: String,
}

impl FlatCatalog {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    /// Load a catalog file; a missing file is `artifact.missing`.
    pub fn load(path: &Path, display: &str) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::artifact_missing(display));
        }
        let text = io::read_text(path, display)?;
        Ok(Self::new(display, text))
    }
}

impl ClassificationStrategy for FlatCatalog {
    fn source_label(&self) -> String {
        format!("`{}`", self.source)
    }

    fn classify(&self) -> Result<GridMapping> {
        let entries = parse_catalog(&self.text);
        if entries.is_empty() {
            return Err(Error::artifact_empty(
                &self.source,
                "catalog has no category|name lines",
            ));
        }

        let mut mapping = GridMapping::new();
        for entry in &entries {
            mapping.insert(entry.display_name(), classify_entry(entry));
        }
        Ok(mapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn parses_and_normalizes_category() {
        let entry = parse_catalog_line("  Medical | com.x.EcgRenderer ", 1)
            .unwrap()
            .unwrap();
        assert_eq!(entry.category, "medical");
        assert_eq!(entry.qualified_name, "com.x.EcgRenderer");
        assert_eq!(entry.display_name(), "EcgRenderer");
    }

    #[test]
    fn comments_and_blanks_are_not_entries() {
        assert_eq!(parse_catalog_line("# header", 1).unwrap(), None);
        assert_eq!(parse_catalog_line("   ", 2).unwrap(), None);
    }

    #[test]
    fn malformed_lines_are_rejected() {
        for line in ["bogusline", "a|b|c", "|com.x.Foo", "medical| "] {
            let err = parse_catalog_line(line, 7).unwrap_err();
            assert_eq!(err.code, ErrorCode::InputMalformed, "line {:?}", line);
        }
    }

    #[test]
    fn local_name_handles_unqualified_names() {
        assert_eq!(local_name("com.x.y.Foo"), "Foo");
        assert_eq!(local_name("Foo"), "Foo");
    }

    #[test]
    fn classification_examples() {
        let catalog = FlatCatalog::new(
            "catalog.txt",
            "medical|com.x.EcgRenderer\nother|com.x.VSWRCircleRenderer\nbogusline\nbasic|com.x.LineRenderer\n",
        );
        let mapping = catalog.classify().unwrap();

        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.get("EcgRenderer"), Some(GridLayer::Medical));
        assert_eq!(mapping.get("VSWRCircleRenderer"), Some(GridLayer::SmithChart));
        assert_eq!(mapping.get("LineRenderer"), Some(GridLayer::Default));
        assert_eq!(mapping.get("bogusline"), None);
    }

    #[test]
    fn medical_category_outranks_smith_override() {
        let catalog = FlatCatalog::new("c", "MEDICAL|com.x.SmithChartRenderer\n");
        let mapping = catalog.classify().unwrap();
        assert_eq!(mapping.get("SmithChartRenderer"), Some(GridLayer::Medical));
    }

    #[test]
    fn comment_only_catalog_is_empty_artifact() {
        let catalog = FlatCatalog::new("data/catalog.txt", "# nothing\n\n   \n# still nothing\n");
        let err = catalog.classify().unwrap_err();
        assert_eq!(err.code, ErrorCode::ArtifactEmpty);
        assert!(err.message.contains("data/catalog.txt"));
    }

    #[test]
    fn missing_catalog_file_is_missing_artifact() {
        let err = FlatCatalog::load(Path::new("/nonexistent/catalog.txt"), "catalog.txt")
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ArtifactMissing);
    }
}
