//! Predicate-extraction strategy.
//!
//! Candidate names come from `case "<name>" -> <Ctor>.create();` dispatch
//! lines. Membership comes from two places, evaluated in order: fixed literal
//! sets, then the quoted literals inside `private static boolean
//! <routine>(String title) { ... }` blocks.

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::{ClassificationStrategy, GridLayer, GridMapping};
use crate::error::{Error, Result};
use crate::utils::io;

/// Fixed literal sets. Checked first, top to bottom.
pub const FIXED_CATEGORY_SETS: &[(GridLayer, &[&str])] = &[
    (
        GridLayer::Logarithmic,
        &["Log Scale", "Logarithmic", "Semi-Log", "Log-Log"],
    ),
    (
        GridLayer::Polar,
        &[
            "Polar Chart",
            "Polar Line",
            "Radar Chart",
            "Nightingale Rose",
            "Wind Rose",
        ],
    ),
    (GridLayer::SmithChart, &["Smith Chart", "VSWR Circle"]),
    (GridLayer::Geo, &["Geo Map", "Choropleth", "Geo Scatter"]),
    (GridLayer::Isometric, &["Isometric", "Isometric Bar", "3D Bar"]),
    (
        GridLayer::Ternary,
        &["Ternary Phase", "Ternary Contour", "Ternary Plot"],
    ),
];

/// Extracted routines in priority order.
pub const PREDICATE_ROUTINES: &[(&str, GridLayer)] = &[
    ("isMedicalChart", GridLayer::Medical),
    ("isFinancialChart", GridLayer::Financial),
    ("isAnalysisChart", GridLayer::Analysis),
    ("isStatisticalChart", GridLayer::Statistical),
];

const DISPATCH_PATTERN: &str = r#"case\s+"([^"]+)"\s*->\s*[\w.$]+\.create\(\)\s*;"#;
const ROUTINE_PATTERN: &str =
    r"private\s+static\s+boolean\s+(\w+)\s*\(\s*String\s+title\s*\)\s*\{";
const LITERAL_PATTERN: &str = r#""((?:[^"\\]|\\.)*)""#;

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::internal_unexpected(format!("bad pattern: {}", e)))
}

/// Candidate names in first-seen order, duplicates collapsed.
pub fn extract_dispatch_names(text: &str) -> Result<Vec<String>> {
    let pattern = compile(DISPATCH_PATTERN)?;
    let mut seen = BTreeSet::new();
    let mut names = Vec::new();

    for caps in pattern.captures_iter(text) {
        let name = caps[1].to_string();
        if seen.insert(name.clone()) {
            names.push(name);
        }
    }

    Ok(names)
}

/// Every boolean routine found, keyed by routine name, with the string
/// literals of its body. Blocks whose closing brace is never found are
/// dropped and logged.
pub fn extract_predicates(text: &str) -> Result<BTreeMap<String, BTreeSet<String>>> {
    let header = compile(ROUTINE_PATTERN)?;
    let literal = compile(LITERAL_PATTERN)?;
    let mut routines = BTreeMap::new();

    for caps in header.captures_iter(text) {
        let name = caps[1].to_string();
        let Some(whole) = caps.get(0) else { continue };

        match block_body(text, whole.end()) {
            Ok(body) => {
                let literals = literal
                    .captures_iter(&body)
                    .map(|c| c[1].to_string())
                    .collect();
                routines.insert(name, literals);
            }
            Err(err) => {
                crate::log_status!("grid-docs", "Skipping routine {}: {}", name, err.message);
            }
        }
    }

    Ok(routines)
}

/// Text between an opening brace (already consumed, ending at `start`) and
/// its matching close, with comments removed. Braces inside string and char
/// literals or comments do not count.
fn block_body(text: &str, start: usize) -> Result<String> {
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut body = String::new();
    let mut kept = start;
    let mut i = start;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                body.push_str(&text[kept..i]);
                i = text[i..].find('\n').map_or(bytes.len(), |n| i + n);
                kept = i;
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                body.push_str(&text[kept..i]);
                i = text[i + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |n| i + 2 + n + 2);
                kept = i;
                continue;
            }
            q @ (b'"' | b'\'') => {
                i += 1;
                // Literals end at their quote or, unterminated, at the line end.
                while i < bytes.len() && bytes[i] != q && bytes[i] != b'\n' {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    body.push_str(&text[kept..i]);
                    return Ok(body);
                }
            }
            _ => {}
        }
        i += 1;
    }

    let line = text[..start].lines().count();
    Err(Error::input_malformed(
        "predicate source",
        Some(line),
        "routine body is never closed",
    ))
}

/// Dispatch source text plus where it came from.
#[derive(Debug, Clone)]
pub struct PredicateSource {
    source: String,
    text: String,
}

impl PredicateSource {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            text: text.into(),
        }
    }

    /// Load a source file; a missing file is `artifact.missing`.
    pub fn load(path: &Path, display: &str) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::artifact_missing(display));
        }
        let text = io::read_text(path, display)?;
        Ok(Self::new(display, text))
    }
}

fn classify_name(name: &str, predicates: &[(GridLayer, BTreeSet<String>)]) -> GridLayer {
    for (grid, members) in FIXED_CATEGORY_SETS {
        if members.contains(&name) {
            return *grid;
        }
    }

    for (grid, members) in predicates {
        if members.contains(name) {
            return *grid;
        }
    }

    GridLayer::Default
}

impl ClassificationStrategy for PredicateSource {
    fn source_label(&self) -> String {
        format!("`{}` (dispatch cases + classifier routines)", self.source)
    }

    fn classify(&self) -> Result<GridMapping> {
        let names = extract_dispatch_names(&self.text)?;
        if names.is_empty() {
            return Err(Error::artifact_empty(
                &self.source,
                "no `case \"<name>\" -> <Ctor>.create();` dispatch lines",
            ));
        }

        let mut extracted = extract_predicates(&self.text)?;
        let predicates: Vec<(GridLayer, BTreeSet<String>)> = PREDICATE_ROUTINES
            .iter()
            .map(|(routine, grid)| {
                let members = extracted.remove(*routine).unwrap_or_else(|| {
                    crate::log_status!(
                        "grid-docs",
                        "Routine {} not found in {}; treating as empty",
                        routine,
                        self.source
                    );
                    BTreeSet::new()
                });
                (*grid, members)
            })
            .collect();

        let mut mapping = GridMapping::new();
        for name in &names {
            mapping.insert(name.as_str(), classify_name(name, &predicates));
        }
        Ok(mapping)
    }
}
