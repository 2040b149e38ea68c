use super::{connect, ProviderOverrides};
use crate::output::print_state;
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
    if ResourceState::exists(root, name) {
        anyhow::bail!("'{name}' is already tracked; use `savedsearch read {name}` to refresh it");
    }

    let scope = AclScope::new(
        owner.unwrap_or_else(|| DEFAULT_OWNER.to_string()),
        app.unwrap_or_else(|| DEFAULT_APP.to_string()),
        None,
    );
    let reconciler = connect(root, provider)?;
    let state = reconciler
        .import(name, Some(&scope))
        .with_context(|| format!("failed to import '{name}'"))?;
    state.save(root).context("failed to save state")?;
    print_state(&state, json)
}
