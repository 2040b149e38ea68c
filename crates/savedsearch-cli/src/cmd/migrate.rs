use crate::output::{print_json, print_table};
use anyhow::Context;
use savedsearch_core::migrations::CURRENT_SCHEMA_VERSION;
use savedsearch_core::store::ResourceState;
use savedsearch_core::{io, paths};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let files = io::yaml_files(&paths::state_dir(root)).context("failed to list state files")?;

    let mut rows = Vec::new();
    for path in &files {
        let (state, migrated) = ResourceState::load_file(path)
            .with_context(|| format!("failed to migrate {}", path.display()))?;
        if migrated {
            state
                .save_to(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        rows.push((state.name, migrated));
    }

    if json {
        let entries: Vec<_> = rows
            .iter()
            .map(|(name, migrated)| serde_json::json!({ "name": name, "migrated": migrated }))
            .collect();
        return print_json(&serde_json::json!({
            "schema_version": CURRENT_SCHEMA_VERSION,
            "states": entries,
        }));
    }

    if rows.is_empty() {
        println!("No local state to migrate.");
        return Ok(());
    }
    let migrated = rows.iter().filter(|(_, m)| *m).count();
    print_table(
        &["NAME", "RESULT"],
        rows.into_iter()
            .map(|(name, m)| vec![name, if m { "migrated" } else { "current" }.to_string()])
            .collect(),
    );
    println!("\n{migrated} state file(s) upgraded to schema version {CURRENT_SCHEMA_VERSION}.");
    Ok(())
}
