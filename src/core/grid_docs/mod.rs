//! Grid mapping documentation: classify named entries into grid layers and
//! render a grouped markdown report.
//!
//! Two classification strategies feed the same report:
//! - [`FlatCatalog`]: a pipe-delimited `category|qualified.Name` catalog
//! - [`PredicateSource`]: dispatch cases plus boolean classifier routines
//!   extracted from source text

mod flat;
mod predicates;
mod report;

pub use flat::{
    local_name, parse_catalog, parse_catalog_line, CatalogEntry, FlatCatalog, SMITH_CHART_RENDERERS,
};
pub use predicates::{
    extract_dispatch_names, extract_predicates, PredicateSource, FIXED_CATEGORY_SETS,
    PREDICATE_ROUTINES,
};
pub use report::{generate, render_report, CategoryCount, DocsReport, ReportOptions};

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;

/// Grid layer categories in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum GridLayer {
    Medical,
    Financial,
    Analysis,
    Statistical,
    Logarithmic,
    Polar,
    SmithChart,
    Geo,
    Isometric,
    Ternary,
    Default,
}

impl GridLayer {
    pub const DISPLAY_ORDER: [GridLayer; 11] = [
        GridLayer::Medical,
        GridLayer::Financial,
        GridLayer::Analysis,
        GridLayer::Statistical,
        GridLayer::Logarithmic,
        GridLayer::Polar,
        GridLayer::SmithChart,
        GridLayer::Geo,
        GridLayer::Isometric,
        GridLayer::Ternary,
        GridLayer::Default,
    ];

    /// Heading used in the report.
    pub fn name(&self) -> &'static str {
        match self {
            GridLayer::Medical => "MedicalGridLayer",
            GridLayer::Financial => "FinancialGridLayer",
            GridLayer::Analysis => "AnalysisGridLayer",
            GridLayer::Statistical => "StatisticalGridLayer",
            GridLayer::Logarithmic => "LogarithmicGridLayer",
            GridLayer::Polar => "PolarGridLayer",
            GridLayer::SmithChart => "SmithChartGridLayer",
            GridLayer::Geo => "GeoGridLayer",
            GridLayer::Isometric => "IsometricGridLayer",
            GridLayer::Ternary => "TernaryGridLayer",
            GridLayer::Default => "DefaultGridLayer",
        }
    }
}

/// `display name → grid layer`. Re-inserting a name replaces its layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridMapping {
    entries: BTreeMap<String, GridLayer>,
}

impl GridMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, grid: GridLayer) {
        self.entries.insert(name.into(), grid);
    }

    pub fn get(&self, name: &str) -> Option<GridLayer> {
        self.entries.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Non-empty groups in display order, names sorted within each group.
    pub fn groups(&self) -> Vec<(GridLayer, Vec<&str>)> {
        let mut grouped: BTreeMap<GridLayer, BTreeSet<&str>> = BTreeMap::new();
        for (name, grid) in &self.entries {
            grouped.entry(*grid).or_default().insert(name.as_str());
        }

        GridLayer::DISPLAY_ORDER
            .iter()
            .filter_map(|grid| {
                grouped
                    .remove(grid)
                    .map(|names| (*grid, names.into_iter().collect()))
            })
            .collect()
    }
}

/// A way of deriving grid layers for a set of names.
pub trait ClassificationStrategy {
    /// Short description of the input, used in the report banner.
    fn source_label(&self) -> String;

    fn classify(&self) -> Result<GridMapping>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_follow_display_order_and_sort_names() {
        let mut mapping = GridMapping::new();
        mapping.insert("Zeta", GridLayer::Default);
        mapping.insert("Alpha", GridLayer::Default);
        mapping.insert("ECG", GridLayer::Medical);
        mapping.insert("Smith Chart", GridLayer::SmithChart);

        let groups = mapping.groups();
        let order: Vec<GridLayer> = groups.iter().map(|(g, _)| *g).collect();
        assert_eq!(
            order,
            vec![GridLayer::Medical, GridLayer::SmithChart, GridLayer::Default]
        );
        assert_eq!(groups[2].1, vec!["Alpha", "Zeta"]);
    }

    #[test]
    fn reinserting_moves_a_name() {
        let mut mapping = GridMapping::new();
        mapping.insert("EcgRenderer", GridLayer::Default);
        mapping.insert("EcgRenderer", GridLayer::Medical);
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.get("EcgRenderer"), Some(GridLayer::Medical));
    }

    #[test]
    fn display_order_covers_every_layer_once() {
        let unique: BTreeSet<GridLayer> = GridLayer::DISPLAY_ORDER.iter().copied().collect();
        assert_eq!(unique.len(), GridLayer::DISPLAY_ORDER.len());
        assert_eq!(GridLayer::DISPLAY_ORDER[0].name(), "MedicalGridLayer");
    }
}
