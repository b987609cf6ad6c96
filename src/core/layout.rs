//! Language surface the migration operates on: statement keywords and the
//! namespace → path convention.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::rename_map::QualifiedName;

/// Textual shape of the statements the passes match.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSyntax {
    #[serde(default = "default_reference_keyword")]
    pub reference_keyword: String,
    #[serde(default = "default_terminator")]
    pub terminator: String,
    #[serde(default = "default_namespace_keyword")]
    pub namespace_keyword: String,
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_reference_keyword() -> String {
    "import".to_string()
}

fn default_terminator() -> String {
    ";".to_string()
}

fn default_namespace_keyword() -> String {
    "package".to_string()
}

fn default_extension() -> String {
    "java".to_string()
}

impl Default for SourceSyntax {
    fn default() -> Self {
        Self {
            reference_keyword: default_reference_keyword(),
            terminator: default_terminator(),
            namespace_keyword: default_namespace_keyword(),
            extension: default_extension(),
        }
    }
}

impl SourceSyntax {
    /// `<keyword> <QualifiedName><terminator>` on a single line.
    ///
    /// Group 1 is the keyword plus separating whitespace, group 2 the name.
    pub fn reference_pattern(&self) -> Result<Regex> {
        compile(
            &format!(
                r"({}[ \t]+)([\w.$]+){}",
                keyword_pattern(&self.reference_keyword),
                regex::escape(&self.terminator)
            ),
            "syntax.referenceKeyword",
        )
    }

    /// Namespace declaration at the start of a line.
    ///
    /// Group 1 is everything up to the name, group 2 the namespace.
    pub fn namespace_pattern(&self) -> Result<Regex> {
        compile(
            &format!(
                r"(?m)^([ \t]*{}[ \t]+)([\w.$]+)[ \t]*{}",
                keyword_pattern(&self.namespace_keyword),
                regex::escape(&self.terminator)
            ),
            "syntax.namespaceKeyword",
        )
    }

    pub fn namespace_declaration(&self, namespace: &str) -> String {
        format!("{} {}{}", self.namespace_keyword, namespace, self.terminator)
    }
}

/// Word boundaries only on sides where the keyword has a word character,
/// so `@import` or `#include` still match at the start of a line.
fn keyword_pattern(keyword: &str) -> String {
    let keyword = keyword.trim();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = if keyword.starts_with(is_word) { r"\b" } else { "" };
    let trail = if keyword.ends_with(is_word) { r"\b" } else { "" };
    format!("{}{}{}", lead, regex::escape(keyword), trail)
}

fn compile(pattern: &str, field: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| {
        Error::config_invalid_value(field, Some(pattern.to_string()), e.to_string())
    })
}

/// Maps symbols to files under a base directory.
#[derive(Debug, Clone)]
pub struct SourceLayout {
    pub base_dir: PathBuf,
    pub syntax: SourceSyntax,
}

impl SourceLayout {
    pub fn new(base_dir: impl Into<PathBuf>, syntax: SourceSyntax) -> Self {
        Self {
            base_dir: base_dir.into(),
            syntax,
        }
    }

    /// Path relative to the base directory, always `/`-separated.
    pub fn relative_path(&self, symbol: &QualifiedName) -> String {
        let mut parts: Vec<&str> = symbol.namespace_segments().collect();
        let file_name = format!("{}.{}", symbol.local_name(), self.syntax.extension);
        parts.push(&file_name);
        parts.join("/")
    }

    pub fn path_for(&self, symbol: &QualifiedName) -> PathBuf {
        join_relative(&self.base_dir, &self.relative_path(symbol))
    }
}

pub(crate) fn join_relative(base: &Path, relative: &str) -> PathBuf {
    relative
        .split('/')
        .fold(base.to_path_buf(), |acc, segment| acc.join(segment))
}
