use crate::output::{print_json, print_table};
use anyhow::Context;
use impact_core::flow::FlowTable;
use std::collections::BTreeMap;
use std::path::Path;

pub fn run(config_path: &Path, json: bool) -> anyhow::Result<()> {
    let config = super::load_config(config_path, None)?;
    let flow = FlowTable::load(Path::new(&config.flow_data_file))
        .with_context(|| format!("failed to load flow data from {}", config.flow_data_file))?;

    // Sort by sprint name for a stable listing.
    let sorted: BTreeMap<&String, &f64> = flow.iter().collect();

    if json {
        return print_json(&sorted);
    }

    if sorted.is_empty() {
        println!("no flow survey data ({})", config.flow_data_file);
        return Ok(());
    }
    let rows = sorted
        .iter()
        .map(|(name, score)| vec![name.to_string(), format!("{score:.1}")])
        .collect();
    print_table(&["Sprint", "Flow Score"], rows);
    Ok(())
}
