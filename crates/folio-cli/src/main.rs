//! folio: inspect the capability catalog and templates, or run the API.
//!
//! # Usage
//!
//! ```text
//! folio init --name "My Portfolio"
//! folio resolve --key projects.visible.v1 --params '{"limit": 3}'
//! folio serve --config folio.toml
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Folio: capability-driven page composition",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to folio.toml. Defaults apply when the file does not exist.
    #[arg(short, long, global = true, default_value = "folio.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered capabilities
    Capabilities {
        /// Include capabilities not flagged public
        #[arg(long)]
        all: bool,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Resolve one capability and print its payload
    Resolve {
        #[arg(short, long)]
        key: String,
        /// Parameters as a JSON object
        #[arg(short, long, default_value = "{}")]
        params: String,
        /// Locale passed through the capability context
        #[arg(long)]
        locale: Option<String>,
    },
    /// List section templates
    Templates {
        /// Only templates allowed in this slot
        #[arg(short, long)]
        slot: Option<String>,
        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,
    },
    /// Print the validation rules of a template
    Rules {
        #[arg(short, long)]
        template: String,
        /// Data root prefix for rule keys
        #[arg(short, long, default_value = "data")]
        root: String,
    },
    /// Generate folio.toml and an empty content file
    Init {
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        #[arg(short, long, default_value = "Folio")]
        name: String,
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
    /// Run the REST API
    Serve {
        /// Override [server].bind
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = commands::load_config(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.logging.filter))?,
        )
        .init();

    match cli.command {
        Commands::Capabilities { all, format } => commands::catalog::capabilities(&config, all, &format),
        Commands::Resolve { key, params, locale } => {
            commands::catalog::resolve(&config, &key, &params, locale.as_deref())
        }
        Commands::Templates { slot, format } => commands::catalog::templates(slot.as_deref(), &format),
        Commands::Rules { template, root } => commands::catalog::rules(&template, &root),
        Commands::Init { path, name, force } => commands::init::init(&path, &name, force),
        Commands::Serve { bind } => commands::serve::serve(config, bind).await,
    }
}
