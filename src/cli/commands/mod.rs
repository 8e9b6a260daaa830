//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod collect;
mod render;
mod serve;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions, Settings};
use crate::http_client::HttpClient;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "GitHub activity widgets for a static portfolio site")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Resolve relative paths from current working directory instead of config file location
    #[arg(long, global = true)]
    cwd: bool,

    /// Site root: a directory or an http(s) URL (overrides config file)
    #[arg(short, long, global = true, env = "FOLIO_SITE_ROOT")]
    site: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Render the activity widgets into host pages
    Render {
        /// Pages to render (default: index.html under the site root)
        pages: Vec<PathBuf>,
        /// Write rendered pages here instead of overwriting them
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
    },

    /// Collect recent GitHub activity into the activity document
    Collect {
        /// GitHub username (overrides config and GITHUB_USERNAME)
        #[arg(short, long)]
        username: Option<String>,
        /// Number of days to look back
        #[arg(short, long)]
        days: Option<u64>,
        /// Output file (default: data/github_activity.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Serve the site with the widgets rendered on every page load
    Serve {
        /// Bind address: port, host, or host:port
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
    },
}

fn http_client(settings: &Settings) -> anyhow::Result<HttpClient> {
    Ok(HttpClient::with_user_agent(
        Duration::from_secs(settings.request_timeout),
        settings.user_agent.as_deref(),
    )?)
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        use_cwd: cli.cwd,
        site_root: cli.site,
    };
    let (settings, config) = load_settings_with_options(options).await;
    if let Some(ref path) = config.source_path {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let client = http_client(&settings)?;

    match cli.command {
        Commands::Render { pages, out_dir } => {
            render::cmd_render(&settings, &client, &pages, out_dir.as_deref()).await
        }
        Commands::Collect {
            username,
            days,
            output,
        } => collect::cmd_collect(&settings, &client, username, days, output).await,
        Commands::Serve { bind } => serve::cmd_serve(&settings, &client, &bind).await,
    }
}
