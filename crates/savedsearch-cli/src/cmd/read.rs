use super::{connect, ProviderOverrides};
use crate::output::print_state;
use anyhow::Context;
use savedsearch_core::store::ResourceState;
use std::path::Path;

pub fn run(root: &Path, name: &str, provider: &ProviderOverrides, json: bool) -> anyhow::Result<()> {
    let mut state = ResourceState::load(root, name)
        .with_context(|| format!("'{name}' is not tracked; use `savedsearch import {name}`"))?;
    let reconciler = connect(root, provider)?;
    reconciler
        .refresh(&mut state)
        .with_context(|| format!("failed to read '{name}'"))?;
    state.save(root).context("failed to save state")?;
    print_state(&state, json)
}
