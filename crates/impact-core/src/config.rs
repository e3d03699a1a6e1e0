//! Injected policy for the whole pipeline. Every tunable the engines
//! read lives here and is threaded through calls explicitly, so
//! multiple team runs can execute side by side without interference.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ScoringConfig
// ---------------------------------------------------------------------------

/// Scoring policy constants. Each weight pair/triple must sum to 1.0;
/// the engine does not validate this and a misconfigured set silently
/// skews the index — operator responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "default_median_baseline")]
    pub median_baseline: f64,
    #[serde(default = "default_excellence")]
    pub excellence: f64,
    #[serde(default = "default_defect_penalty")]
    pub defect_penalty: f64,
    #[serde(default = "default_defect_cap")]
    pub defect_cap: u32,
    #[serde(default = "default_flow_score")]
    pub default_flow_score: f64,
    #[serde(default = "default_weight_velocity")]
    pub weight_velocity: f64,
    #[serde(default = "default_weight_quality")]
    pub weight_quality: f64,
    #[serde(default = "default_weight_flow")]
    pub weight_flow: f64,
    #[serde(default = "default_weight_throughput")]
    pub weight_throughput: f64,
    #[serde(default = "default_weight_efficiency")]
    pub weight_efficiency: f64,
    #[serde(default = "default_weight_defects")]
    pub weight_defects: f64,
    #[serde(default = "default_weight_rejections")]
    pub weight_rejections: f64,
}

fn default_median_baseline() -> f64 {
    70.0
}

fn default_excellence() -> f64 {
    100.0
}

fn default_defect_penalty() -> f64 {
    20.0
}

fn default_defect_cap() -> u32 {
    5
}

fn default_flow_score() -> f64 {
    70.0
}

fn default_weight_velocity() -> f64 {
    0.60
}

fn default_weight_quality() -> f64 {
    0.25
}

fn default_weight_flow() -> f64 {
    0.15
}

fn default_weight_throughput() -> f64 {
    0.60
}

fn default_weight_efficiency() -> f64 {
    0.40
}

fn default_weight_defects() -> f64 {
    0.60
}

fn default_weight_rejections() -> f64 {
    0.40
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            median_baseline: default_median_baseline(),
            excellence: default_excellence(),
            defect_penalty: default_defect_penalty(),
            defect_cap: default_defect_cap(),
            default_flow_score: default_flow_score(),
            weight_velocity: default_weight_velocity(),
            weight_quality: default_weight_quality(),
            weight_flow: default_weight_flow(),
            weight_throughput: default_weight_throughput(),
            weight_efficiency: default_weight_efficiency(),
            weight_defects: default_weight_defects(),
            weight_rejections: default_weight_rejections(),
        }
    }
}

// ---------------------------------------------------------------------------
// TrackerConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Base URL of the tracker instance, e.g. `https://example.atlassian.net`.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    /// API token. Falls back to the `IMPACT_TRACKER_TOKEN` env var.
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_project_key")]
    pub project_key: String,
    #[serde(default = "default_field_story_points")]
    pub field_story_points: String,
    #[serde(default = "default_field_sprint")]
    pub field_sprint: String,
    #[serde(default = "default_field_team")]
    pub field_team: String,
}

fn default_project_key() -> String {
    "PROJ".to_string()
}

fn default_field_story_points() -> String {
    "customfield_10006".to_string()
}

fn default_field_sprint() -> String {
    "customfield_10001".to_string()
}

fn default_field_team() -> String {
    "customfield_10400".to_string()
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user: None,
            token: None,
            project_key: default_project_key(),
            field_story_points: default_field_story_points(),
            field_sprint: default_field_sprint(),
            field_team: default_field_team(),
        }
    }
}

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Team name matched (case-sensitive substring) against sprint goals.
    #[serde(default = "default_team_filter")]
    pub team_filter: String,
    #[serde(default = "default_sprint_length_days")]
    pub sprint_length_days: i64,
    /// Normalized statuses that count an item as completed.
    #[serde(default = "default_completion_statuses")]
    pub completion_statuses: Vec<String>,
    /// Normalized statuses that count an item as having reached
    /// delivery. Superset of the completion set.
    #[serde(default = "default_delivery_statuses")]
    pub delivery_statuses: Vec<String>,
    #[serde(default = "default_flow_data_file")]
    pub flow_data_file: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

fn default_team_filter() -> String {
    "Foundation".to_string()
}

fn default_sprint_length_days() -> i64 {
    7
}

fn default_completion_statuses() -> Vec<String> {
    [
        "accepted",
        "uat",
        "ready for release",
        "closedcompleted",
        "closed completed",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_delivery_statuses() -> Vec<String> {
    let mut statuses = default_completion_statuses();
    statuses.push("delivered".to_string());
    statuses
}

fn default_flow_data_file() -> String {
    "flow_survey_data.csv".to_string()
}

fn default_output_dir() -> String {
    "output".to_string()
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            team_filter: default_team_filter(),
            sprint_length_days: default_sprint_length_days(),
            completion_statuses: default_completion_statuses(),
            delivery_statuses: default_delivery_statuses(),
            flow_data_file: default_flow_data_file(),
            output_dir: default_output_dir(),
            scoring: ScoringConfig::default(),
            tracker: TrackerConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from a YAML file; an absent file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }
}
