use crate::output::{print_fields, print_json};
use anyhow::Context;
use savedsearch_core::reconciler;
use savedsearch_core::store::{DesiredSearch, ResourceState};
use savedsearch_core::validate;
use std::path::Path;

pub fn run(root: &Path, file: &Path, json: bool) -> anyhow::Result<()> {
    let desired = DesiredSearch::load(file)
        .with_context(|| format!("failed to load {}", file.display()))?;
    validate::validate_desired(&desired).context("invalid desired config")?;

    let tracked = ResourceState::exists(root, &desired.name);
    let mut state = if tracked {
        ResourceState::load(root, &desired.name)
            .with_context(|| format!("failed to load state for '{}'", desired.name))?
    } else {
        ResourceState::new(&desired.name)
    };

    let changes = reconciler::plan(&desired, &mut state)?;
    if tracked {
        state.save(root).context("failed to save state")?;
    }

    let verb = if tracked { "update" } else { "create" };
    if json {
        return print_json(&serde_json::json!({
            "name": desired.name,
            "action": verb,
            "status": state.status,
            "changes": changes,
        }));
    }

    if changes.is_empty() {
        println!("'{}' is up to date.", desired.name);
        return Ok(());
    }
    println!("'{}' will {verb} {} field(s):", desired.name, changes.len());
    print_fields(&changes);
    Ok(())
}
