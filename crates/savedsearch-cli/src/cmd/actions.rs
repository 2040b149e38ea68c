use crate::output::print_json;
use clap::Subcommand;
use savedsearch_core::actions;

#[derive(Subcommand)]
pub enum ActionsSubcommand {
    /// Print the canonical form of a comma-separated action list
    Normalize { list: String },
}

pub fn run(subcmd: ActionsSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ActionsSubcommand::Normalize { list } => normalize(&list, json),
    }
}

fn normalize(list: &str, json: bool) -> anyhow::Result<()> {
    let normalized = actions::normalize(list);
    if json {
        let members: Vec<&str> = normalized.split(',').filter(|a| !a.is_empty()).collect();
        print_json(&serde_json::json!({
            "actions": normalized,
            "members": members,
        }))
    } else {
        println!("{normalized}");
        Ok(())
    }
}
