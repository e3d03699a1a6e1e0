use anyhow::Context;
use impact_core::tracker::TrackerClient;
use std::path::Path;

pub fn run(config_path: &Path, team: Option<&str>, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path, team)?;

    let client = TrackerClient::new(&config.tracker).context("tracker is not configured")?;
    tracing::info!(team = %config.team_filter, "fetching items from tracker");
    let items = client
        .fetch_items(&config.team_filter)
        .context("failed to fetch items from tracker")?;
    tracing::info!(count = items.len(), "fetched items");

    super::score_and_report(&items, &config, json)
}
