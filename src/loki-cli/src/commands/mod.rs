pub mod query;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use loki_sdk::{Client, ClientConfig};

/// Loki CLI — run log queries against a Loki server
#[derive(Parser)]
#[command(name = "loki-cli", version, about)]
pub struct Cli {
    /// Loki base URL, overrides the configuration file
    #[arg(long, env = "LOKI_URL")]
    url: Option<String>,

    /// Configuration file
    #[arg(long, default_value = "loki.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query logs within a range of time
    QueryRange(query::QueryRangeArgs),
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = ClientConfig::load_from_path(&self.config)
            .with_context(|| format!("Failed to load {}", self.config.display()))?;
        if let Some(url) = self.url {
            config.url = url;
        }
        tracing::debug!(url = %config.url, "Using Loki server");

        let client = Client::from_config(&config);

        match self.command {
            Commands::QueryRange(args) => args.run(&client).await,
        }
    }
}
