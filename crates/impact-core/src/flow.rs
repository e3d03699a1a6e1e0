//! Flow-survey data: one raw score per sprint, maintained by hand in a
//! CSV next to the dashboard.

use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;

/// Per-sprint raw flow-survey scores. May be completely empty — the
/// scoring engine imputes missing sprints.
#[derive(Debug, Clone, Default)]
pub struct FlowTable {
    scores: HashMap<String, f64>,
}

impl FlowTable {
    pub fn get(&self, sprint_name: &str) -> Option<f64> {
        self.scores.get(sprint_name).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.scores.iter()
    }

    pub fn insert(&mut self, sprint_name: impl Into<String>, score: f64) {
        self.scores.insert(sprint_name.into(), score);
    }

    /// Load from a `sprint_name,flow_score_raw` CSV. An absent file is
    /// an empty table, not an error. Rows with unparsable scores are
    /// skipped.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let mut table = Self::default();
        let mut reader = csv::Reader::from_path(path)?;
        for row in reader.records() {
            let row = row?;
            let Some(name) = row.get(0) else { continue };
            let Some(raw) = row.get(1) else { continue };
            if let Ok(score) = raw.trim().parse::<f64>() {
                table.insert(name.trim(), score);
            }
        }
        Ok(table)
    }
}
