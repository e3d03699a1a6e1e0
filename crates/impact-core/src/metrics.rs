//! Per-item metrics assembly: sprint resolution, history replay, and
//! status classification combined into one `ItemRecord`.

use crate::config::DashboardConfig;
use crate::error::{ImpactError, Result};
use crate::history;
use crate::sprint;
use crate::types::{normalize_event_status, normalize_status, title_case};
use crate::types::{ItemRecord, StatusEvent, WorkItem};
use chrono::{DateTime, FixedOffset};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

fn parse_timestamp(key: &str, value: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|_| ImpactError::Timestamp {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Assemble one item into a normalized record.
///
/// Returns `Ok(None)` when the team filter rejects the item. A
/// timestamp that fails to parse is an error for this item only; the
/// pipeline skips it without aborting the batch.
pub fn assemble(
    item: &WorkItem,
    now: DateTime<FixedOffset>,
    config: &DashboardConfig,
) -> Result<Option<ItemRecord>> {
    // Cheap short-circuit before any timestamp work.
    let resolved = sprint::resolve(&item.sprints);
    if !sprint::team_owns(resolved.as_ref(), &config.team_filter) {
        return Ok(None);
    }

    let created = parse_timestamp(&item.key, &item.created)?;

    let mut events = Vec::with_capacity(item.events.len());
    for change in &item.events {
        events.push(StatusEvent {
            at: parse_timestamp(&item.key, &change.at)?,
            from: normalize_event_status(change.from.as_deref().unwrap_or("")),
            to: normalize_event_status(change.to.as_deref().unwrap_or("")),
        });
    }
    // Stable sort: ties keep original changelog order.
    events.sort_by_key(|e| e.at);

    let summary = history::replay(created, &events, now);

    let status_clean = normalize_status(&item.status);
    let is_done = config
        .completion_statuses
        .iter()
        .any(|s| s == &status_clean);
    let reached_delivered = config.delivery_statuses.iter().any(|s| s == &status_clean);

    let (sprint_name, sprint_start) = match resolved {
        Some(s) => (s.name, s.start),
        None => (sprint::UNKNOWN_SPRINT.to_string(), None),
    };

    Ok(Some(ItemRecord {
        key: item.key.clone(),
        issue_type: item.issue_type.clone(),
        story_points: item.story_points.unwrap_or(0.0),
        sprint_name,
        sprint_start,
        created: created.naive_local(),
        days_in_progress: round2(summary.total_days),
        dev_days: round2(summary.dev_days),
        review_days: round2(summary.review_days),
        acceptance_days: round2(summary.acceptance_days),
        rejection_count: summary.rejection_count,
        was_rejected: summary.was_rejected,
        reached_delivered,
        is_done,
        status: title_case(&status_clean),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SprintCandidate, StatusChange};
    use chrono::NaiveDate;

    fn config() -> DashboardConfig {
        DashboardConfig::default()
    }

    fn now() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-03-20T10:00:00+00:00").unwrap()
    }

    fn item() -> WorkItem {
        WorkItem {
            key: "PROJ-7".to_string(),
            issue_type: "Story".to_string(),
            story_points: Some(3.0),
            created: "2024-03-11T09:00:00.000+0000".to_string(),
            status: "Accepted".to_string(),
            sprints: vec![SprintCandidate {
                name: "Iteration 03.11.24".to_string(),
                goal: Some("Foundation platform work".to_string()),
            }],
            events: vec![
                StatusChange {
                    at: "2024-03-11T10:00:00.000+0000".to_string(),
                    from: Some("To Do".to_string()),
                    to: Some("Started".to_string()),
                },
                StatusChange {
                    at: "2024-03-11T16:00:00.000+0000".to_string(),
                    from: Some("Started".to_string()),
                    to: Some("Delivered".to_string()),
                },
                StatusChange {
                    at: "2024-03-13T16:00:00.000+0000".to_string(),
                    from: Some("Delivered".to_string()),
                    to: Some("Accepted".to_string()),
                },
            ],
        }
    }

    #[test]
    fn assembles_full_record() {
        let record = assemble(&item(), now(), &config()).unwrap().unwrap();
        assert_eq!(record.key, "PROJ-7");
        assert_eq!(record.story_points, 3.0);
        assert_eq!(record.sprint_name, "Iteration 03.11.24");
        assert_eq!(record.sprint_start, NaiveDate::from_ymd_opt(2024, 3, 11));
        assert_eq!(record.dev_days, 0.25);
        assert_eq!(record.acceptance_days, 1.0);
        assert_eq!(record.review_days, 0.0);
        assert!(record.is_done);
        assert!(record.reached_delivered);
        assert_eq!(record.status, "Accepted");
    }

    #[test]
    fn total_partitions_into_phases() {
        let record = assemble(&item(), now(), &config()).unwrap().unwrap();
        let sum = record.dev_days + record.review_days + record.acceptance_days;
        assert!((record.days_in_progress - sum).abs() < 0.02);
    }

    #[test]
    fn team_filter_rejects_foreign_sprint_goal() {
        let mut foreign = item();
        foreign.sprints[0].goal = Some("Velocity team cleanup".to_string());
        assert!(assemble(&foreign, now(), &config()).unwrap().is_none());
    }

    #[test]
    fn missing_goal_rejects_when_sprints_present() {
        let mut no_goal = item();
        no_goal.sprints[0].goal = None;
        assert!(assemble(&no_goal, now(), &config()).unwrap().is_none());
    }

    #[test]
    fn no_sprints_passes_with_unknown_sprint() {
        let mut unsprinted = item();
        unsprinted.sprints.clear();
        let record = assemble(&unsprinted, now(), &config()).unwrap().unwrap();
        assert_eq!(record.sprint_name, "Unknown Sprint");
        assert_eq!(record.sprint_start, None);
    }

    #[test]
    fn missing_story_points_default_to_zero() {
        let mut pointless = item();
        pointless.story_points = None;
        let record = assemble(&pointless, now(), &config()).unwrap().unwrap();
        assert_eq!(record.story_points, 0.0);
    }

    #[test]
    fn malformed_created_timestamp_is_item_error() {
        let mut bad = item();
        bad.created = "last tuesday".to_string();
        let err = assemble(&bad, now(), &config()).unwrap_err();
        assert!(matches!(err, ImpactError::Timestamp { .. }));
    }

    #[test]
    fn malformed_event_timestamp_is_item_error() {
        let mut bad = item();
        bad.events[1].at = "not-a-time".to_string();
        assert!(assemble(&bad, now(), &config()).is_err());
    }

    #[test]
    fn created_offset_preserved_in_local_date() {
        let mut offset = item();
        offset.created = "2024-03-11T01:00:00.000+0500".to_string();
        let record = assemble(&offset, now(), &config()).unwrap().unwrap();
        assert_eq!(
            record.created.date(),
            NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()
        );
    }

    #[test]
    fn dashed_status_classified_as_done() {
        let mut dashed = item();
        dashed.status = "Closed-Completed".to_string();
        let record = assemble(&dashed, now(), &config()).unwrap().unwrap();
        assert!(record.is_done);
        assert_eq!(record.status, "Closedcompleted");
    }
}
