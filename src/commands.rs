//! Subcommand execution.

use std::io::Write;

use anyhow::{Context, Result, bail};
use insight_hub_sdk::{Client, FileType};
use serde_json::json;
use tracing::info;

use crate::config::{ApiConfig, AppConfig, Cli, Command};
use crate::{render, session};

/// Build an SDK client from the `api` section.
pub fn build_client(config: &ApiConfig) -> Result<Client> {
    Client::builder(&config.base_url)
        .strict(config.strict)
        .build()
        .with_context(|| format!("invalid base URL '{}'", config.base_url))
}

/// Run the parsed command, writing results to `out`.
///
/// `chat` reads questions from stdin and does not accept `--json`.
pub async fn run<W: Write>(cli: &Cli, config: &AppConfig, out: &mut W) -> Result<()> {
    match &cli.command {
        Command::Chat { .. } if cli.json => bail!("--json is not supported by chat"),
        Command::Chat { top_k } => {
            let client = build_client(&config.api)?;
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            session::chat::run(&client, top_k.unwrap_or(config.api.top_k), stdin, out).await?;
            Ok(())
        }
        command => execute(command, cli.json, config, out).await,
    }
}

/// Run a one-shot command.
pub async fn execute<W: Write>(
    command: &Command,
    as_json: bool,
    config: &AppConfig,
    out: &mut W,
) -> Result<()> {
    match command {
        Command::Classify { names } => {
            if as_json {
                let rows: Vec<_> = names
                    .iter()
                    .map(|n| json!({"filename": n, "file_type": FileType::from_filename(n)}))
                    .collect();
                writeln!(out, "{}", render::json(&rows)?)?;
            } else {
                for name in names {
                    writeln!(
                        out,
                        "{}",
                        render::classification(name, FileType::from_filename(name))
                    )?;
                }
            }
        }
        Command::Health { require_healthy } => {
            let client = build_client(&config.api)?;
            let health = client.health().await.context("health check failed")?;
            if as_json {
                writeln!(out, "{}", render::json(&health)?)?;
            } else {
                writeln!(out, "{}", render::health(&health))?;
            }
            if *require_healthy && !health.is_healthy() {
                bail!("service reported status '{}'", health.status);
            }
        }
        Command::Status => {
            let client = build_client(&config.api)?;
            let status = client.status().await.context("status request failed")?;
            writeln!(out, "{}", render::json(&status)?)?;
        }
        Command::Query { question, top_k } => {
            let client = build_client(&config.api)?;
            let question = question.join(" ");
            let top_k = top_k.unwrap_or(config.api.top_k);
            let response = client
                .query_with_top_k(question, top_k)
                .await
                .context("query failed")?;
            info!(
                citations = response.citations.len(),
                confidence = response.confidence,
                "Query answered"
            );
            if as_json {
                writeln!(out, "{}", render::json(&response)?)?;
            } else {
                writeln!(out, "{}", render::query(&response))?;
            }
        }
        Command::Ingest {
            path,
            file_type,
            infer_type,
        } => {
            let client = build_client(&config.api)?;
            let file_type = if *infer_type {
                path.file_name()
                    .map(|n| FileType::from_filename(&n.to_string_lossy()))
            } else {
                *file_type
            };
            let response = client
                .ingest_path(path, file_type)
                .await
                .with_context(|| format!("upload of {} failed", path.display()))?;
            info!(
                filename = %response.filename,
                chunks_added = response.chunks_added,
                duplicates_skipped = response.duplicates_skipped,
                "File ingested"
            );
            if as_json {
                writeln!(out, "{}", render::json(&response)?)?;
            } else {
                writeln!(out, "{}", render::ingest(&response))?;
            }
        }
        Command::Chat { .. } => bail!("chat is interactive; use `run`"),
    }
    Ok(())
}
