use super::ProviderOverrides;
use crate::output::print_json;
use clap::Subcommand;
use savedsearch_core::config::WarnLevel;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Validate the provider config for common mistakes
    Validate,
}

pub fn run(
    root: &Path,
    subcmd: ConfigSubcommand,
    provider: &ProviderOverrides,
    json: bool,
) -> anyhow::Result<()> {
    match subcmd {
        ConfigSubcommand::Validate => validate(root, provider, json),
    }
}

fn validate(root: &Path, provider: &ProviderOverrides, json: bool) -> anyhow::Result<()> {
    let config = provider.load(root)?;
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Provider config is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    if warnings.iter().any(|w| w.level == WarnLevel::Error) {
        anyhow::bail!("provider config validation found errors");
    }

    Ok(())
}
