//! docstore CLI: initialize a SQLite document repository and read or write documents.
//! Config from env (.env supported) with CLI overrides; output is JSON on stdout.

use anyhow::{Context, Result};
use clap::Parser;
use repo_cli::{execute, load_config, Cli};
use repository_core::{init_tracing, Repository};
use repository_sqlite::DocumentRepository;
use serde_json::Value;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let log_file = cli.log_file.clone().or_else(|| std::env::var("LOG_FILE").ok());
    init_tracing(log_file.as_deref())?;

    let config = load_config(cli.database_url.clone(), cli.collection.clone())?;
    info!(
        "Opening repository: url={}, collection={}",
        config.database_url, config.collection
    );

    let repo = DocumentRepository::<Value>::open(config)
        .await
        .context("Failed to initialize repository")?;

    let result = execute(&repo, &cli.command).await;
    repo.close().await;

    let output = result?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
