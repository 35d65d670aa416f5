//! TutorChat CLI entry point

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use std::io::Write;
use tokio::sync::mpsc;
use tracing::debug;

use tutorchat::cli::{Cli, Command};
use tutorchat::{ChatClient, ChatConfig, ChatRequest, KnowledgeNode, Message, build_context};

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let config = ChatConfig::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let client = ChatClient::new(config).context("Failed to create chat client")?;

    match cli.command {
        Command::Ask {
            question,
            mode,
            stream,
            nodes_file,
            node,
        } => {
            let context = match (&nodes_file, &node) {
                (Some(path), Some(node_id)) => {
                    let content = std::fs::read_to_string(path)
                        .context(format!("Failed to read nodes file {}", path.display()))?;
                    let nodes: Vec<KnowledgeNode> =
                        serde_json::from_str(&content).context("Failed to parse nodes file")?;
                    let selected = nodes.iter().find(|n| &n.id == node_id);
                    if selected.is_none() {
                        eprintln!("{} node '{}' not found in {}", "warning:".yellow(), node_id, path.display());
                    }
                    let ctx = build_context(selected, &nodes);
                    if ctx.is_empty() { None } else { Some(ctx) }
                }
                (None, Some(_)) => {
                    return Err(eyre::eyre!("--node requires --nodes-file"));
                }
                _ => None,
            };

            let mut request = ChatRequest::new(vec![Message::user(question)]).with_mode(mode.into());
            if let Some(ctx) = context {
                request = request.with_context(ctx);
            }

            if stream {
                let (tx, mut rx) = mpsc::channel::<String>(32);
                let printer = tokio::spawn(async move {
                    while let Some(fragment) = rx.recv().await {
                        print!("{}", fragment);
                        let _ = std::io::stdout().flush();
                    }
                });

                let reply = client.complete_streaming(&request, tx).await?;
                printer.await.ok();
                println!();
                debug!(reply_len = reply.len(), "streamed reply complete");
            } else {
                let reply = client.complete(&request).await?;
                println!("{}", reply);
            }
        }
    }

    Ok(())
}
