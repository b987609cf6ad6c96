//! Stub generator: compatibility shims left at old symbol locations.
//!
//! Each stub declares the old name under the old namespace as a deprecated
//! subtype of the new symbol with a forwarding no-argument constructor. Stubs
//! are generated artifacts: every run replaces the whole file.

use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::layout::SourceLayout;
use crate::output::BatchResult;
use crate::rename_map::{RenameEntry, RenameMap};
use crate::utils::io;
use crate::utils::template::{self, StubVars};
use crate::walker::relative_display;

pub const DEFAULT_DEPRECATION_NOTICE: &str = "\
/**
 * @deprecated Moved to {{targetSymbol}}.
 * This compatibility stub is generated by pkgshift and will be removed
 * once the deprecation window closes. Do not edit.
 */
@Deprecated";

pub const DEFAULT_STUB_TEMPLATE: &str = "\
{{namespaceDeclaration}}

{{deprecationNotice}}
public class {{sourceName}} extends {{targetSymbol}} {
    public {{sourceName}}() {
        super();
    }
}
";

#[derive(Debug, Clone)]
pub struct StubOptions {
    pub template: Option<String>,
    pub deprecation_notice: Option<String>,
    /// Fail before writing when a target cannot back a no-argument stub.
    pub strict_constructors: bool,
    pub project_root: PathBuf,
}

/// A target whose shape makes the generated stub suspect.
#[derive(Debug, Clone, Serialize)]
pub struct StubWarning {
    pub symbol: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StubReport {
    pub batch: BatchResult,
    pub warnings: Vec<StubWarning>,
}

pub struct StubGenerator<'a> {
    map: &'a RenameMap,
    layout: &'a SourceLayout,
    options: StubOptions,
}

impl<'a> StubGenerator<'a> {
    pub fn new(map: &'a RenameMap, layout: &'a SourceLayout, options: StubOptions) -> Self {
        Self {
            map,
            layout,
            options,
        }
    }

    /// Full stub text for one entry.
    pub fn render(&self, entry: &RenameEntry) -> String {
        let namespace_declaration = self
            .layout
            .syntax
            .namespace_declaration(entry.source.namespace());

        let base = [
            (StubVars::NAMESPACE_DECLARATION, namespace_declaration.as_str()),
            (StubVars::SOURCE_NAMESPACE, entry.source.namespace()),
            (StubVars::SOURCE_NAME, entry.source.local_name()),
            (StubVars::TARGET_SYMBOL, entry.target.as_str()),
            (StubVars::TARGET_NAMESPACE, entry.target.namespace()),
            (StubVars::TARGET_NAME, entry.target.local_name()),
        ];

        let notice_template = self
            .options
            .deprecation_notice
            .as_deref()
            .unwrap_or(DEFAULT_DEPRECATION_NOTICE);
        let notice = template::render(notice_template.trim_end(), &base);

        let mut vars = base.to_vec();
        vars.push((StubVars::DEPRECATION_NOTICE, notice.as_str()));

        let body = self
            .options
            .template
            .as_deref()
            .unwrap_or(DEFAULT_STUB_TEMPLATE);
        template::render(body, &vars)
    }

    /// Best-effort look at the target's current source.
    pub fn check_target(&self, entry: &RenameEntry) -> Option<StubWarning> {
        let path = self.layout.path_for(&entry.target);
        let content = std::fs::read_to_string(path).ok()?;
        inspect_target(&content, entry.target.local_name()).map(|message| StubWarning {
            symbol: entry.target.to_string(),
            message,
        })
    }

    /// Inspect every target. In strict mode any finding is an error, so
    /// callers can stop before touching the tree.
    pub fn check(&self) -> Result<Vec<StubWarning>> {
        let warnings: Vec<StubWarning> = self
            .map
            .entries()
            .iter()
            .filter_map(|e| self.check_target(e))
            .collect();

        for warning in &warnings {
            crate::log_status!("stubs", "{}: {}", warning.symbol, warning.message);
        }

        if self.options.strict_constructors && !warnings.is_empty() {
            let problem = warnings
                .iter()
                .map(|w| format!("{} ({})", w.symbol, w.message))
                .collect::<Vec<_>>()
                .join("; ");
            return Err(Error::validation_invalid_argument(
                "strictConstructors",
                format!("targets cannot back a no-argument stub: {}", problem),
                None,
                None,
            )
            .with_hint("Fix the targets or set stub.strictConstructors to false"));
        }

        Ok(warnings)
    }

    /// Check, then (re)write every stub.
    pub fn run(&self, write: bool) -> Result<StubReport> {
        let warnings = self.check()?;
        Ok(self.write_all(warnings, write))
    }

    /// (Re)write every stub without checking. One failed write never stops
    /// the rest.
    pub fn write_all(&self, warnings: Vec<StubWarning>, write: bool) -> StubReport {
        let mut batch = BatchResult::new();
        for entry in self.map.entries() {
            let id = entry.source.to_string();
            let path = self.layout.path_for(&entry.source);
            let display = relative_display(&self.options.project_root, &path);
            let content = self.render(entry);

            let outcome = if write {
                match io::write_if_changed(&path, &content, &format!("write stub {}", display)) {
                    Ok(outcome) => outcome,
                    Err(err) => {
                        crate::log_status!("stubs", "Failed {}: {}", id, err.message);
                        batch.record_error(id, err.message);
                        continue;
                    }
                }
            } else {
                io::planned_outcome(&path, &content)
            };

            batch.record_write(id, display, outcome);
        }

        StubReport { batch, warnings }
    }
}

/// Problems that keep `name` from being extended through a no-arg constructor.
fn inspect_target(content: &str, name: &str) -> Option<String> {
    let name = regex::escape(name);

    let kind = Regex::new(&format!(r"\b(interface|enum|record)\s+{}\b", name)).ok()?;
    if let Some(caps) = kind.captures(content) {
        return Some(format!("target is declared as {}, not a class", &caps[1]));
    }

    let sealed = Regex::new(&format!(r"\bfinal\s+class\s+{}\b", name)).ok()?;
    if sealed.is_match(content) {
        return Some("target class is final".to_string());
    }

    let ctor = Regex::new(&format!(
        r"(?m)^\s*(?:(public|protected|private)\s+)?{}\s*\(([^)]*)\)",
        name
    ))
    .ok()?;

    let mut constructors = 0usize;
    let mut usable_default = false;
    for caps in ctor.captures_iter(content) {
        constructors += 1;
        let private = caps.get(1).map(|m| m.as_str()) == Some("private");
        if caps[2].trim().is_empty() && !private {
            usable_default = true;
        }
    }

    if constructors > 0 && !usable_default {
        Some("target declares no accessible no-argument constructor".to_string())
    } else {
        None
    }
}
