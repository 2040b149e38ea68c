mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{actions::ActionsSubcommand, config::ConfigSubcommand, ProviderOverrides};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "savedsearch",
    about = "Reconcile declaratively configured saved searches against a Splunk management endpoint",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .savedsearch/)
    #[arg(long, global = true, env = "SAVEDSEARCH_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log each remote step
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(flatten)]
    provider: ProviderOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the saved search, or update it when it is already tracked
    Apply {
        /// Desired resource YAML
        file: PathBuf,
    },

    /// Show significant differences between a desired file and local state
    Plan {
        /// Desired resource YAML
        file: PathBuf,
    },

    /// Refresh the local view of a tracked saved search
    Read { name: String },

    /// Adopt an existing remote saved search
    Import {
        name: String,
        /// Owner to address the entity under (default: nobody)
        #[arg(long)]
        owner: Option<String>,
        /// App context (default: search)
        #[arg(long)]
        app: Option<String>,
    },

    /// Delete the saved search and drop its local state
    Delete {
        name: String,
        /// Owner for an untracked entity (default: nobody)
        #[arg(long)]
        owner: Option<String>,
        /// App for an untracked entity (default: search)
        #[arg(long)]
        app: Option<String>,
    },

    /// Upgrade local state files to the current schema
    Migrate,

    /// Print the webhook priority for a severity and precision
    Priority {
        #[arg(long, default_value = "")]
        severity: String,
        #[arg(long, default_value = "")]
        precision: String,
        /// Explicit priority; wins over the derived value
        #[arg(long = "override", value_name = "N", allow_hyphen_values = true)]
        explicit: Option<i64>,
    },

    /// Action list utilities
    Actions {
        #[command(subcommand)]
        subcommand: ActionsSubcommand,
    },

    /// Provider configuration
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    let provider = &cli.provider;

    let result = match cli.command {
        Commands::Apply { file } => cmd::apply::run(&root, &file, provider, cli.json),
        Commands::Plan { file } => cmd::plan::run(&root, &file, cli.json),
        Commands::Read { name } => cmd::read::run(&root, &name, provider, cli.json),
        Commands::Import { name, owner, app } => {
            cmd::import::run(&root, &name, owner, app, provider, cli.json)
        }
        Commands::Delete { name, owner, app } => {
            cmd::delete::run(&root, &name, owner, app, provider, cli.json)
        }
        Commands::Migrate => cmd::migrate::run(&root, cli.json),
        Commands::Priority {
            severity,
            precision,
            explicit,
        } => cmd::priority::run(&severity, &precision, explicit, cli.json),
        Commands::Actions { subcommand } => cmd::actions::run(subcommand, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, provider, cli.json),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
