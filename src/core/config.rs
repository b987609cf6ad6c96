//! Project configuration (`pkgshift.json`).
//!
//! Every path is `~`/`$VAR` expanded and then resolved against the directory
//! holding the config file, so a run behaves the same from any working
//! directory.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::grid_docs::{ClassificationStrategy, FlatCatalog, PredicateSource, ReportOptions};
use crate::layout::{join_relative, SourceLayout, SourceSyntax};
use crate::refactor::{RelocateOptions, StubOptions};
use crate::rename_map::{RenameMap, RenameMapFile};
use crate::utils::io;
use crate::walker::{relative_display, TreeWalker};

pub const CONFIG_FILE_NAME: &str = "pkgshift.json";

/// Parse JSON read from `path` into a typed value.
pub(crate) fn from_str<T: DeserializeOwned>(s: &str, path: &str) -> Result<T> {
    serde_json::from_str(s).map_err(|e| Error::config_invalid_json(path, e))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub rename_map: Option<RenameMapFile>,
    #[serde(default)]
    pub rename_map_file: Option<String>,
    #[serde(default)]
    pub syntax: SourceSyntax,
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Directories scanned for references. Defaults to the layout base.
    #[serde(default)]
    pub scan_roots: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub stub: StubConfig,
    #[serde(default)]
    pub docs: Option<DocsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: String,
}

fn default_base_dir() -> String {
    ".".to_string()
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotConfig {
    /// Directory inside the repository; snapshot paths are relative to it.
    #[serde(default = "default_repo")]
    pub repo: String,
    #[serde(default = "default_revision")]
    pub revision: String,
}

fn default_repo() -> String {
    ".".to_string()
}

fn default_revision() -> String {
    "HEAD".to_string()
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            repo: default_repo(),
            revision: default_revision(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StubConfig {
    #[serde(default)]
    pub deprecation_notice: Option<String>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub strict_constructors: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocsStrategy {
    Catalog,
    Predicates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsConfig {
    pub strategy: DocsStrategy,
    pub input: String,
    pub output: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub regenerate_command: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Everything the grid-docs pass needs, with paths resolved.
pub struct DocsSettings {
    pub strategy: Box<dyn ClassificationStrategy>,
    pub options: ReportOptions,
    pub output: PathBuf,
    pub output_display: String,
}

/// A loaded config bound to the directory it came from.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config_path: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Load `path`, or `./pkgshift.json` when `None`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => expand(&p.to_string_lossy(), "config")?,
            None => PathBuf::from(CONFIG_FILE_NAME),
        };

        if !config_path.is_file() {
            return Err(Error::artifact_missing(config_path.display().to_string())
                .with_hint("Create pkgshift.json or pass --config <path>"));
        }

        let display = config_path.display().to_string();
        let raw = io::read_file(&config_path, &format!("read {}", display))?;
        let config: ProjectConfig = from_str(&raw, &display)?;

        let root = config_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self::new(root, config_path, config))
    }

    pub fn new(
        root: impl Into<PathBuf>,
        config_path: impl Into<PathBuf>,
        config: ProjectConfig,
    ) -> Self {
        Self {
            root: root.into(),
            config_path: config_path.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Expand and anchor a configured path.
    pub fn resolve(&self, raw: &str, key: &str) -> Result<PathBuf> {
        let expanded = expand(raw, key)?;
        if expanded.is_absolute() {
            Ok(expanded)
        } else {
            Ok(join_relative(&self.root, &expanded.to_string_lossy()))
        }
    }

    pub fn display(&self, path: &Path) -> String {
        relative_display(&self.root, path)
    }

    /// Inline `renameMap` or the file named by `renameMapFile`; exactly one.
    /// A map with no entries is `artifact.empty`.
    pub fn rename_map(&self) -> Result<RenameMap> {
        let (map, source) = match (&self.config.rename_map, &self.config.rename_map_file) {
            (Some(_), Some(_)) => {
                return Err(Error::config_invalid_value(
                    "renameMapFile",
                    None,
                    "set either renameMap or renameMapFile, not both",
                ))
            }
            (Some(inline), None) => (
                RenameMap::from_file(inline)?,
                format!("renameMap in {}", self.display(&self.config_path)),
            ),
            (None, Some(file)) => {
                let path = self.resolve(file, "renameMapFile")?;
                let display = self.display(&path);
                if !path.is_file() {
                    return Err(Error::artifact_missing(display));
                }
                let raw = io::read_file(&path, &format!("read {}", display))?;
                let parsed: RenameMapFile = from_str(&raw, &display)?;
                (RenameMap::from_file(&parsed)?, display)
            }
            (None, None) => {
                return Err(Error::config_missing_key(
                    "renameMap",
                    Some(self.config_path.display().to_string()),
                ))
            }
        };

        if map.is_empty() {
            return Err(Error::artifact_empty(source, "rename map has no entries")
                .with_hint("Add at least one { \"from\", \"to\" } entry"));
        }
        Ok(map)
    }

    pub fn layout(&self) -> Result<SourceLayout> {
        let base = self.resolve(&self.config.layout.base_dir, "layout.baseDir")?;
        Ok(SourceLayout::new(base, self.config.syntax.clone()))
    }

    pub fn walker(&self) -> Result<TreeWalker> {
        let roots = if self.config.scan_roots.is_empty() {
            vec![self.resolve(&self.config.layout.base_dir, "layout.baseDir")?]
        } else {
            self.config
                .scan_roots
                .iter()
                .map(|r| self.resolve(r, "scanRoots"))
                .collect::<Result<Vec<_>>>()?
        };

        Ok(
            TreeWalker::new(&self.root, roots, self.config.syntax.extension.clone())
                .with_exclude(self.config.exclude.clone()),
        )
    }

    pub fn snapshot_repo(&self) -> Result<PathBuf> {
        self.resolve(&self.config.snapshot.repo, "snapshot.repo")
    }

    pub fn snapshot_revision(&self) -> &str {
        &self.config.snapshot.revision
    }

    /// The layout base must live inside the snapshot repository.
    pub fn relocate_options(&self, layout: &SourceLayout) -> Result<RelocateOptions> {
        let repo = self.snapshot_repo()?;
        let base = &layout.base_dir;

        let prefix = base.strip_prefix(&repo).map_err(|_| {
            Error::config_invalid_value(
                "layout.baseDir",
                Some(base.display().to_string()),
                format!("not inside snapshot.repo ({})", repo.display()),
            )
        })?;

        Ok(RelocateOptions {
            snapshot_prefix: relative_display(Path::new(""), prefix),
            project_root: self.root.clone(),
        })
    }

    pub fn stub_options(&self) -> StubOptions {
        StubOptions {
            template: self.config.stub.template.clone(),
            deprecation_notice: self.config.stub.deprecation_notice.clone(),
            strict_constructors: self.config.stub.strict_constructors,
            project_root: self.root.clone(),
        }
    }

    /// Load the configured docs input. Missing `docs` is a config error.
    pub fn docs(&self) -> Result<DocsSettings> {
        let docs = self.config.docs.as_ref().ok_or_else(|| {
            Error::config_missing_key("docs", Some(self.config_path.display().to_string()))
        })?;

        let input = self.resolve(&docs.input, "docs.input")?;
        let input_display = self.display(&input);
        let strategy: Box<dyn ClassificationStrategy> = match docs.strategy {
            DocsStrategy::Catalog => Box::new(FlatCatalog::load(&input, &input_display)?),
            DocsStrategy::Predicates => Box::new(PredicateSource::load(&input, &input_display)?),
        };

        let defaults = ReportOptions::default();
        let options = ReportOptions {
            title: docs.title.clone().unwrap_or(defaults.title),
            regenerate_command: docs
                .regenerate_command
                .clone()
                .unwrap_or(defaults.regenerate_command),
            description: docs.description.clone(),
        };

        let output = self.resolve(&docs.output, "docs.output")?;
        Ok(DocsSettings {
            strategy,
            options,
            output_display: self.display(&output),
            output,
        })
    }
}

fn expand(raw: &str, key: &str) -> Result<PathBuf> {
    shellexpand::full(raw)
        .map(|s| PathBuf::from(s.as_ref()))
        .map_err(|e| Error::config_invalid_value(key, Some(raw.to_string()), e.to_string()))
}
