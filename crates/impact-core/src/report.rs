//! CSV report files: the full scorecard table, the executive summary,
//! and the raw per-item records behind them.

use crate::dashboard::Dashboard;
use crate::error::Result;
use std::path::{Path, PathBuf};

pub const SCORECARD_FILE: &str = "sprint_scorecards.csv";
pub const EXECUTIVE_FILE: &str = "executive_summary.csv";
pub const RECORDS_FILE: &str = "item_records.csv";

/// Paths of the files a report run produced.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub scorecards: PathBuf,
    pub executive: PathBuf,
    pub records: PathBuf,
}

/// Write all three report files under `output_dir`, creating the
/// directory if needed. Existing files are overwritten.
pub fn write_reports(dashboard: &Dashboard, output_dir: &Path) -> Result<ReportPaths> {
    std::fs::create_dir_all(output_dir)?;

    let paths = ReportPaths {
        scorecards: output_dir.join(SCORECARD_FILE),
        executive: output_dir.join(EXECUTIVE_FILE),
        records: output_dir.join(RECORDS_FILE),
    };

    write_scorecards(dashboard, &paths.scorecards)?;
    write_executive(dashboard, &paths.executive)?;
    write_records(dashboard, &paths.records)?;

    Ok(paths)
}

fn write_scorecards(dashboard: &Dashboard, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Iteration Name",
        "Sprint Start",
        "Completed Tickets",
        "Total Story Points",
        "Avg Cycle Days/Ticket",
        "Avg Dev Days/Ticket",
        "Avg Review Days/Ticket",
        "Avg Acceptance Days/Ticket",
        "Avg Cycle Days/Point",
        "Defects Created",
        "Defect Score",
        "Rejection Ratio %",
        "Rejection Score",
        "Flow Survey Score",
        "Flow Imputed",
        "Throughput Score",
        "Efficiency Score",
        "Velocity Score",
        "Quality Score",
        "Flow Score",
        "Overall Score",
    ])?;
    for card in &dashboard.scorecards {
        writer.write_record([
            card.sprint_name.clone(),
            card.sprint_start
                .map(|d| d.to_string())
                .unwrap_or_default(),
            card.completed_tickets.to_string(),
            card.total_story_points.to_string(),
            card.avg_cycle_per_ticket.to_string(),
            card.avg_dev_per_ticket.to_string(),
            card.avg_review_per_ticket.to_string(),
            card.avg_acceptance_per_ticket.to_string(),
            card.avg_cycle_per_point.to_string(),
            card.defects_created.to_string(),
            card.defect_score.to_string(),
            card.rejection_ratio_pct.to_string(),
            card.rejection_score.to_string(),
            card.flow_survey_score.to_string(),
            card.flow_imputed.to_string(),
            card.throughput_score.to_string(),
            card.efficiency_score.to_string(),
            card.velocity_score.to_string(),
            card.quality_score.to_string(),
            card.flow_score.to_string(),
            card.impact_index.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_executive(dashboard: &Dashboard, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Iteration Name",
        "Velocity Score",
        "Quality Score",
        "Flow Score",
        "Overall Score",
    ])?;
    for row in dashboard.executive_rows() {
        writer.write_record([
            row.iteration_name,
            row.velocity_score.to_string(),
            row.quality_score.to_string(),
            row.flow_score.to_string(),
            row.overall_score.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_records(dashboard: &Dashboard, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "Key",
        "Type",
        "Story Points",
        "Sprint",
        "Sprint Start",
        "Created",
        "Days In Progress",
        "Dev Days",
        "Review Days",
        "Acceptance Days",
        "Rejections",
        "Reached Delivered",
        "Done",
        "Status",
    ])?;
    for record in &dashboard.records {
        writer.write_record([
            record.key.clone(),
            record.issue_type.clone(),
            record.story_points.to_string(),
            record.sprint_name.clone(),
            record
                .sprint_start
                .map(|d| d.to_string())
                .unwrap_or_default(),
            record.created.to_string(),
            record.days_in_progress.to_string(),
            record.dev_days.to_string(),
            record.review_days.to_string(),
            record.acceptance_days.to_string(),
            record.rejection_count.to_string(),
            record.reached_delivered.to_string(),
            record.is_done.to_string(),
            record.status.clone(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
