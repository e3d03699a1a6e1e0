//! Sprint-level aggregation: groups item records by sprint, excludes
//! the active sprint, and counts defects created inside each sprint
//! window.

use crate::config::DashboardConfig;
use crate::types::ItemRecord;
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

const DEFECT_TYPE: &str = "Bug";
const AUTO_ACCEPTED_TYPE: &str = "Task";

// ---------------------------------------------------------------------------
// SprintAggregate
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct SprintAggregate {
    pub sprint_name: String,
    pub start: Option<NaiveDate>,
    pub completed_tickets: u32,
    pub total_story_points: f64,
    pub days_in_progress: f64,
    pub dev_days: f64,
    pub review_days: f64,
    pub acceptance_days: f64,
    pub delivered_count: u32,
    pub rejection_count: u32,
    pub defects_created: u32,
    pub avg_cycle_per_ticket: f64,
    pub avg_dev_per_ticket: f64,
    pub avg_review_per_ticket: f64,
    pub avg_acceptance_per_ticket: f64,
    pub avg_cycle_per_point: f64,
    pub rejection_ratio_pct: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

fn sort_key(record: &ItemRecord) -> NaiveDate {
    record.sprint_start.unwrap_or(NaiveDate::MIN)
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Aggregate item records into per-sprint rows.
///
/// Defect counting (pass A) runs over the *full* record set: a defect
/// is attributed to every sprint whose `[start, start + length]` window
/// contains its creation date, regardless of which sprint the defect
/// was assigned to. Everything else (pass B) runs over records whose
/// sprint start is strictly before the most recent one — the active
/// sprint has incomplete data and never appears in output, though its
/// defects still land in overlapping windows of earlier sprints.
///
/// Rows come back sorted descending by sprint start date.
pub fn aggregate(records: &[ItemRecord], config: &DashboardConfig) -> Vec<SprintAggregate> {
    if records.is_empty() {
        return Vec::new();
    }

    let active_date = records.iter().map(sort_key).max().unwrap_or(NaiveDate::MIN);

    let defect_counts = count_defects_in_windows(records, config.sprint_length_days);

    let mut rows: BTreeMap<String, SprintAggregate> = BTreeMap::new();

    // Pass B: per-sprint sums over non-active records.
    for record in records.iter().filter(|r| sort_key(r) < active_date) {
        let row = rows
            .entry(record.sprint_name.clone())
            .or_insert_with(|| SprintAggregate {
                sprint_name: record.sprint_name.clone(),
                start: record.sprint_start,
                ..Default::default()
            });

        if record.is_done {
            row.completed_tickets += 1;
            row.total_story_points += record.story_points;
            row.days_in_progress += record.days_in_progress;
            row.dev_days += record.dev_days;
            row.review_days += record.review_days;
            row.acceptance_days += record.acceptance_days;
        }

        // Tasks are auto-accepted: they never enter the
        // delivery/rejection denominator.
        if record.issue_type != AUTO_ACCEPTED_TYPE {
            if record.reached_delivered {
                row.delivered_count += 1;
            }
            row.rejection_count += record.rejection_count;
        }
    }

    // Merge pass A. Windowed sprints without any non-active record
    // still get a row, except the active sprint itself.
    for (name, (start, defects)) in defect_counts {
        if start >= active_date {
            continue;
        }
        let row = rows.entry(name.clone()).or_insert_with(|| SprintAggregate {
            sprint_name: name,
            start: Some(start),
            ..Default::default()
        });
        row.defects_created = defects;
    }

    let mut rows: Vec<SprintAggregate> = rows.into_values().collect();
    for row in &mut rows {
        let tickets = f64::from(row.completed_tickets);
        row.avg_cycle_per_ticket = round2(ratio(row.days_in_progress, tickets));
        row.avg_dev_per_ticket = round2(ratio(row.dev_days, tickets));
        row.avg_review_per_ticket = round2(ratio(row.review_days, tickets));
        row.avg_acceptance_per_ticket = round2(ratio(row.acceptance_days, tickets));
        row.avg_cycle_per_point = round2(ratio(row.days_in_progress, row.total_story_points));
        row.rejection_ratio_pct = round1(
            ratio(
                f64::from(row.rejection_count),
                f64::from(row.delivered_count),
            ) * 100.0,
        );
    }

    rows.sort_by(|a, b| {
        b.start
            .unwrap_or(NaiveDate::MIN)
            .cmp(&a.start.unwrap_or(NaiveDate::MIN))
    });
    rows
}

/// Pass A: count `Bug`-type items created inside each sprint's window,
/// inclusive at both ends, over the full record set.
fn count_defects_in_windows(
    records: &[ItemRecord],
    sprint_length_days: i64,
) -> BTreeMap<String, (NaiveDate, u32)> {
    let mut windows: BTreeMap<String, NaiveDate> = BTreeMap::new();
    for record in records {
        if let Some(start) = record.sprint_start {
            windows.entry(record.sprint_name.clone()).or_insert(start);
        }
    }

    windows
        .into_iter()
        .map(|(name, start)| {
            let window_start = start.and_time(chrono::NaiveTime::MIN);
            let window_end = window_start + Duration::days(sprint_length_days);
            let defects = records
                .iter()
                .filter(|r| {
                    r.issue_type == DEFECT_TYPE
                        && r.created >= window_start
                        && r.created <= window_end
                })
                .count() as u32;
            (name, (start, defects))
        })
        .collect()
}
