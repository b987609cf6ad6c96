//! Rename map: the declarative old → new symbol table driving a migration.
//!
//! A map is built once per run, validated, and then passed by reference into
//! each pass. Nothing reads it from global state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};

/// Dot-separated symbol name such as `com.acme.ui.Panel`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    full: String,
    split: usize,
}

impl QualifiedName {
    /// Parse a qualified name. Requires at least one namespace segment and
    /// identifier-shaped segments throughout.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        let Some(split) = value.rfind('.') else {
            return Err(Error::validation_invalid_argument(
                "symbol",
                format!("'{}' has no namespace (expected pkg.Name)", value),
                None,
                None,
            ));
        };

        if let Some(bad) = value.split('.').find(|s| !is_identifier(s)) {
            return Err(Error::validation_invalid_argument(
                "symbol",
                format!("'{}' contains an invalid segment '{}'", value, bad),
                None,
                None,
            ));
        }

        Ok(Self {
            full: value.to_string(),
            split,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.full
    }

    /// Namespace portion (everything before the last dot).
    pub fn namespace(&self) -> &str {
        &self.full[..self.split]
    }

    /// Local name (the last segment).
    pub fn local_name(&self) -> &str {
        &self.full[self.split + 1..]
    }

    pub fn namespace_segments(&self) -> impl Iterator<Item = &str> {
        self.namespace().split('.')
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full)
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// One old → new pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEntry {
    pub source: QualifiedName,
    pub target: QualifiedName,
}

/// Raw serialized form used in `pkgshift.json` and standalone map files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameMapFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub entries: Vec<RawRenameEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRenameEntry {
    pub from: String,
    pub to: String,
}

/// Validated, immutable rename table. Entries keep authoring order.
#[derive(Debug, Clone)]
pub struct RenameMap {
    version: String,
    entries: Vec<RenameEntry>,
    index: HashMap<String, usize>,
}

impl RenameMap {
    pub fn new(version: impl Into<String>, entries: Vec<RenameEntry>) -> Result<Self> {
        let mut index = HashMap::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            if entry.source == entry.target {
                return Err(Error::config_invalid_value(
                    "renameMap.entries",
                    Some(entry.source.to_string()),
                    "entry maps a symbol onto itself",
                ));
            }
            if index.insert(entry.source.as_str().to_string(), i).is_some() {
                return Err(Error::config_invalid_value(
                    "renameMap.entries",
                    Some(entry.source.to_string()),
                    "duplicate source symbol",
                ));
            }
        }

        Ok(Self {
            version: version.into(),
            entries,
            index,
        })
    }

    /// Build from `(from, to)` string pairs.
    pub fn from_pairs<'a, I>(version: impl Into<String>, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let entries = pairs
            .into_iter()
            .map(|(from, to)| {
                Ok(RenameEntry {
                    source: QualifiedName::parse(from)?,
                    target: QualifiedName::parse(to)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(version, entries)
    }

    pub fn from_file(file: &RenameMapFile) -> Result<Self> {
        let version = file.version.clone().unwrap_or_else(|| "unversioned".to_string());
        Self::from_pairs(
            version,
            file.entries.iter().map(|e| (e.from.as_str(), e.to.as_str())),
        )
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn entries(&self) -> &[RenameEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact-match lookup of a source symbol.
    pub fn target_for(&self, source: &str) -> Option<&QualifiedName> {
        self.index.get(source).map(|&i| &self.entries[i].target)
    }
}
