pub mod flow;
pub mod run;
pub mod score;

use crate::output::{fmt_score, print_json, print_table};
use anyhow::Context;
use impact_core::config::DashboardConfig;
use impact_core::dashboard::{build_dashboard, Dashboard};
use impact_core::flow::FlowTable;
use impact_core::report;
use impact_core::types::WorkItem;
use std::path::Path;

pub(crate) fn load_config(path: &Path, team: Option<&str>) -> anyhow::Result<DashboardConfig> {
    let mut config = DashboardConfig::load(path)
        .with_context(|| format!("failed to load config from {}", path.display()))?;
    if let Some(team) = team {
        config.team_filter = team.to_string();
    }
    Ok(config)
}

/// Shared back half of `run` and `score`: build the dashboard from a
/// fetched or loaded item set, write the report files, print.
pub(crate) fn score_and_report(
    items: &[WorkItem],
    config: &DashboardConfig,
    json: bool,
) -> anyhow::Result<()> {
    let flow_path = Path::new(&config.flow_data_file);
    if !flow_path.exists() {
        tracing::warn!(file = %config.flow_data_file, "flow survey file missing, scores will be imputed");
    }
    let flow = FlowTable::load(flow_path)
        .with_context(|| format!("failed to load flow data from {}", config.flow_data_file))?;

    let now = chrono::Local::now().fixed_offset();
    let dashboard = build_dashboard(items, &flow, now, config);

    for skipped in &dashboard.skipped {
        tracing::warn!(key = %skipped.key, reason = %skipped.reason, "item skipped");
    }

    let paths = report::write_reports(&dashboard, Path::new(&config.output_dir))
        .context("failed to write report files")?;

    if json {
        print_json(&dashboard)?;
    } else {
        print_scorecards(&dashboard);
        println!();
        println!("reports written to {}", paths.scorecards.parent().unwrap_or(Path::new(".")).display());
    }
    Ok(())
}

fn print_scorecards(dashboard: &Dashboard) {
    if dashboard.scorecards.is_empty() {
        println!("no closed sprints to score");
        return;
    }
    let rows = dashboard
        .scorecards
        .iter()
        .map(|card| {
            vec![
                card.sprint_name.clone(),
                card.completed_tickets.to_string(),
                fmt_score(card.velocity_score),
                fmt_score(card.quality_score),
                fmt_score(card.flow_score),
                fmt_score(card.impact_index),
            ]
        })
        .collect();
    print_table(
        &["Sprint", "Tickets", "Velocity", "Quality", "Flow", "Overall"],
        rows,
    );
}
