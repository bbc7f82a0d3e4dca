//! droplua: run Lua automation scripts against the DigitalOcean API
//!
//! The script thread stays outside the async runtime so host-callable
//! functions can block on it; the runtime only serves API calls and
//! streaming producers.

mod api;
mod config;
mod script;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use api::CloudClient;
use config::Config;
use script::ScriptHost;

/// Run a Lua automation script with the `cloud` API modules bound.
#[derive(Debug, Parser)]
#[command(name = "droplua", version, about)]
struct Cli {
    /// Path to the Lua script to execute
    script: PathBuf,

    /// API token (overrides environment and config file)
    #[arg(long)]
    token: Option<String>,

    /// API base URL (mainly for testing against a stub server)
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();
    let cli = Cli::parse();

    let config = Config::load()?;
    let token = config.resolve_token(cli.token)?;
    let api_url = config.resolve_api_url(cli.api_url);

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let client = Arc::new(CloudClient::new(token, api_url));
    let host = ScriptHost::new(client.clone(), client, runtime.handle().clone())?;

    let source = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("reading {}", cli.script.display()))?;
    log::info!("running {}", cli.script.display());
    host.run(&source)
}
