use anyhow::Context;
use impact_core::types::WorkItem;
use std::path::Path;

pub fn run(
    config_path: &Path,
    items_path: &Path,
    team: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let config = super::load_config(config_path, team)?;

    let content = std::fs::read_to_string(items_path)
        .with_context(|| format!("failed to read snapshot {}", items_path.display()))?;
    let items: Vec<WorkItem> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse snapshot {}", items_path.display()))?;

    super::score_and_report(&items, &config, json)
}
