use super::{connect, ProviderOverrides};
use crate::output::print_json;
use anyhow::Context;
use savedsearch_core::permissions::{AclScope, DEFAULT_APP, DEFAULT_OWNER};
use savedsearch_core::store::ResourceState;
use std::path::Path;

pub fn run(
    root: &Path,
    name: &str,
    owner: Option<String>,
    app: Option<String>,
    provider: &ProviderOverrides,
    json: bool,
) -> anyhow::Result<()> {
    let reconciler = connect(root, provider)?;

    if ResourceState::exists(root, name) {
        let mut state = ResourceState::load(root, name)
            .with_context(|| format!("failed to load state for '{name}'"))?;
        reconciler
            .delete_state(&mut state)
            .with_context(|| format!("failed to delete '{name}'"))?;
        ResourceState::remove(root, name).context("failed to remove local state")?;
    } else {
        let scope = AclScope::new(
            owner.unwrap_or_else(|| DEFAULT_OWNER.to_string()),
            app.unwrap_or_else(|| DEFAULT_APP.to_string()),
            None,
        );
        reconciler
            .delete(name, &scope)
            .with_context(|| format!("failed to delete '{name}'"))?;
    }

    if json {
        print_json(&serde_json::json!({ "name": name, "deleted": true }))?;
    } else {
        println!("Deleted '{name}'.");
    }
    Ok(())
}
