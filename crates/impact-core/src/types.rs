use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Tracker input model
// ---------------------------------------------------------------------------

/// One sprint association on a work item, as reported by the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintCandidate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
}

/// A raw status-change entry from the item changelog. Timestamps and
/// labels stay untyped here; parsing happens during assembly so that a
/// malformed entry can fail just its own item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    /// ISO-8601 timestamp with offset, e.g. `2024-03-11T10:30:00.000+0000`.
    pub at: String,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

/// A work item snapshot fetched from the tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    pub key: String,
    pub issue_type: String,
    #[serde(default)]
    pub story_points: Option<f64>,
    pub created: String,
    pub status: String,
    #[serde(default)]
    pub sprints: Vec<SprintCandidate>,
    #[serde(default)]
    pub events: Vec<StatusChange>,
}

// ---------------------------------------------------------------------------
// Parsed event
// ---------------------------------------------------------------------------

/// A status-change event with parsed timestamp and normalized labels.
#[derive(Debug, Clone)]
pub struct StatusEvent {
    pub at: DateTime<FixedOffset>,
    pub from: String,
    pub to: String,
}

// ---------------------------------------------------------------------------
// ItemRecord (assembler output)
// ---------------------------------------------------------------------------

/// One normalized per-item metrics record. Immutable once assembled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemRecord {
    pub key: String,
    pub issue_type: String,
    pub story_points: f64,
    pub sprint_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sprint_start: Option<NaiveDate>,
    pub created: NaiveDateTime,
    pub days_in_progress: f64,
    pub dev_days: f64,
    pub review_days: f64,
    pub acceptance_days: f64,
    pub rejection_count: u32,
    pub was_rejected: bool,
    pub reached_delivered: bool,
    pub is_done: bool,
    /// Title-cased display form of the normalized current status.
    pub status: String,
}

// ---------------------------------------------------------------------------
// Status label normalization
// ---------------------------------------------------------------------------

/// Normalize an event status label: trim leading/trailing dashes and
/// spaces, lowercase. `"- Peer Review "` becomes `"peer review"`.
pub fn normalize_event_status(raw: &str) -> String {
    raw.trim_matches(|c| c == '-' || c == ' ').to_lowercase()
}

/// Normalize a current-status label for classification: lowercase,
/// remove every dash, trim. `"Closed-Completed"` becomes `"closedcompleted"`.
pub fn normalize_status(raw: &str) -> String {
    raw.to_lowercase().replace('-', "").trim().to_string()
}

/// Title-case a normalized status for display.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_status_trims_dashes_and_spaces() {
        assert_eq!(normalize_event_status("- Peer Review "), "peer review");
        assert_eq!(normalize_event_status("Delivered"), "delivered");
        assert_eq!(normalize_event_status("--done--"), "done");
    }

    #[test]
    fn status_normalization_strips_all_dashes() {
        assert_eq!(normalize_status("Closed-Completed"), "closedcompleted");
        assert_eq!(normalize_status(" Ready for Release "), "ready for release");
    }

    #[test]
    fn title_case_capitalizes_each_word() {
        assert_eq!(title_case("ready for release"), "Ready For Release");
        assert_eq!(title_case("delivered"), "Delivered");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn work_item_deserializes_with_defaults() {
        let json = r#"{
            "key": "PROJ-1",
            "issue_type": "Story",
            "created": "2024-03-11T09:00:00.000+0000",
            "status": "To Do"
        }"#;
        let item: WorkItem = serde_json::from_str(json).unwrap();
        assert!(item.story_points.is_none());
        assert!(item.sprints.is_empty());
        assert!(item.events.is_empty());
    }
}
