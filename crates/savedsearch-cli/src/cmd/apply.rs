use super::{connect, ProviderOverrides};
use crate::output::print_state;
use anyhow::Context;
use savedsearch_core::store::{DesiredSearch, ResourceState};
use std::path::Path;

pub fn run(root: &Path, file: &Path, provider: &ProviderOverrides, json: bool) -> anyhow::Result<()> {
    let desired = DesiredSearch::load(file)
        .with_context(|| format!("failed to load {}", file.display()))?;
    let reconciler = connect(root, provider)?;

    let state = if ResourceState::exists(root, &desired.name) {
        let mut state = ResourceState::load(root, &desired.name)
            .with_context(|| format!("failed to load state for '{}'", desired.name))?;
        reconciler
            .update(&desired, &mut state)
            .with_context(|| format!("failed to update '{}'", desired.name))?;
        state
    } else {
        reconciler
            .create(&desired)
            .with_context(|| format!("failed to create '{}'", desired.name))?
    };

    state
        .save(root)
        .with_context(|| format!("failed to save state for '{}'", state.name))?;
    print_state(&state, json)
}
