//! Pipeline orchestration: items in, scorecards out.

use crate::aggregate;
use crate::config::DashboardConfig;
use crate::flow::FlowTable;
use crate::metrics;
use crate::scoring::{self, SprintScorecard};
use crate::types::{ItemRecord, WorkItem};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// An item the pipeline dropped, with the reason. One bad item never
/// aborts the batch; callers decide how loudly to report these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedItem {
    pub key: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub scorecards: Vec<SprintScorecard>,
    pub records: Vec<ItemRecord>,
    pub skipped: Vec<SkippedItem>,
}

impl Dashboard {
    /// The simplified executive view: sprint name plus the composite
    /// scores, in the same row order as the full table.
    pub fn executive_rows(&self) -> Vec<ExecutiveRow> {
        self.scorecards
            .iter()
            .map(|card| ExecutiveRow {
                iteration_name: card.sprint_name.clone(),
                velocity_score: card.velocity_score,
                quality_score: card.quality_score,
                flow_score: card.flow_score,
                overall_score: card.impact_index,
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutiveRow {
    pub iteration_name: String,
    pub velocity_score: f64,
    pub quality_score: f64,
    pub flow_score: f64,
    pub overall_score: f64,
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Run the full pipeline over an already-fetched item snapshot.
///
/// `now` is captured once by the caller and reused for every open item,
/// keeping a single run deterministic. Items the team filter rejects
/// disappear silently; items with malformed timestamps land in
/// `skipped`.
pub fn build_dashboard(
    items: &[WorkItem],
    flow: &FlowTable,
    now: DateTime<FixedOffset>,
    config: &DashboardConfig,
) -> Dashboard {
    let mut records = Vec::with_capacity(items.len());
    let mut skipped = Vec::new();

    for item in items {
        match metrics::assemble(item, now, config) {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {}
            Err(err) => skipped.push(SkippedItem {
                key: item.key.clone(),
                reason: err.to_string(),
            }),
        }
    }

    let aggregates = aggregate::aggregate(&records, config);
    let scorecards = scoring::score(&aggregates, flow, &config.scoring);

    Dashboard {
        scorecards,
        records,
        skipped,
    }
}
