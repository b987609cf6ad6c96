//! Public output types for per-entry passes.
//!
//! The relocator and stub generator both report one item per rename-map
//! entry through [`BatchResult`].

use serde::{Deserialize, Serialize};

use crate::utils::io::WriteOutcome;

/// Summary of a per-entry batch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub created: u32,
    pub updated: u32,
    pub unchanged: u32,
    pub skipped: u32,
    pub errors: u32,
    pub items: Vec<BatchResultItem>,
}

/// Individual item result within a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResultItem {
    pub id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a write outcome for `id` at `path`.
    pub fn record_write(&mut self, id: String, path: String, outcome: WriteOutcome) {
        let status = match outcome {
            WriteOutcome::Created => {
                self.created += 1;
                "created"
            }
            WriteOutcome::Updated => {
                self.updated += 1;
                "updated"
            }
            WriteOutcome::Unchanged => {
                self.unchanged += 1;
                "unchanged"
            }
        };
        self.items.push(BatchResultItem {
            id,
            status: status.to_string(),
            path: Some(path),
            note: None,
            error: None,
        });
    }

    pub fn record_skipped(&mut self, id: String, reason: String) {
        self.skipped += 1;
        self.items.push(BatchResultItem {
            id,
            status: "skipped".to_string(),
            path: None,
            note: Some(reason),
            error: None,
        });
    }

    pub fn record_error(&mut self, id: String, error: String) {
        self.errors += 1;
        self.items.push(BatchResultItem {
            id,
            status: "error".to_string(),
            path: None,
            note: None,
            error: Some(error),
        });
    }

    /// Attach a note to the most recently recorded item.
    pub fn annotate_last(&mut self, note: impl Into<String>) {
        if let Some(item) = self.items.last_mut() {
            item.note = Some(note.into());
        }
    }

    /// Files that were (or would be) written.
    pub fn written(&self) -> u32 {
        self.created + self.updated
    }

    /// `<id>: <error>` for every failed item, in record order.
    pub fn error_lines(&self) -> Vec<String> {
        self.items
            .iter()
            .filter_map(|item| {
                item.error
                    .as_ref()
                    .map(|error| format!("{}: {}", item.id, error))
            })
            .collect()
    }

    pub fn item(&self, id: &str) -> Option<&BatchResultItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_follow_outcomes() {
        let mut batch = BatchResult::new();
        batch.record_write("a.A".into(), "a/A.java".into(), WriteOutcome::Created);
        batch.record_write("a.B".into(), "a/B.java".into(), WriteOutcome::Unchanged);
        batch.record_skipped("a.C".into(), "not in snapshot".into());
        batch.record_error("a.D".into(), "disk full".into());

        assert_eq!(batch.created, 1);
        assert_eq!(batch.unchanged, 1);
        assert_eq!(batch.skipped, 1);
        assert_eq!(batch.errors, 1);
        assert_eq!(batch.written(), 1);
        assert_eq!(batch.item("a.C").unwrap().status, "skipped");
        assert_eq!(batch.error_lines(), vec!["a.D: disk full".to_string()]);
    }

    #[test]
    fn serializes_camel_case_without_empty_fields() {
        let mut batch = BatchResult::new();
        batch.record_write("a.A".into(), "a/A.java".into(), WriteOutcome::Updated);
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["updated"], 1);
        assert!(json["items"][0].get("error").is_none());
        assert_eq!(json["items"][0]["path"], "a/A.java");
    }
}
