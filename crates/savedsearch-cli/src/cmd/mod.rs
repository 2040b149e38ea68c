pub mod actions;
pub mod apply;
pub mod config;
pub mod delete;
pub mod import;
pub mod migrate;
pub mod plan;
pub mod priority;
pub mod read;

use anyhow::Context;
use clap::Args;
use savedsearch_core::config::ProviderConfig;
use savedsearch_core::reconciler::Reconciler;
use splunk_rest::SplunkClient;
use std::path::Path;

/// Connection settings that take precedence over `.savedsearch/provider.yaml`.
#[derive(Args, Debug, Default, Clone)]
pub struct ProviderOverrides {
    /// Management API URL, e.g. https://splunk.example.com:8089
    #[arg(long, global = true, env = "SAVEDSEARCH_URL")]
    pub url: Option<String>,

    #[arg(long, global = true, env = "SAVEDSEARCH_USERNAME")]
    pub username: Option<String>,

    #[arg(long, global = true, env = "SAVEDSEARCH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl ProviderOverrides {
    pub fn load(&self, root: &Path) -> anyhow::Result<ProviderConfig> {
        let mut config = ProviderConfig::load(root).context("failed to load provider config")?;
        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(username) = &self.username {
            config.username = Some(username.clone());
        }
        if let Some(password) = &self.password {
            config.password = Some(password.clone());
        }
        Ok(config)
    }
}

pub fn connect(root: &Path, provider: &ProviderOverrides) -> anyhow::Result<Reconciler<SplunkClient>> {
    let config = provider.load(root)?;
    let client = SplunkClient::new(&config).context("failed to configure management client")?;
    Ok(Reconciler::new(client))
}
