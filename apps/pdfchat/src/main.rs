use std::path::PathBuf;

mod commands;
mod config;
mod orchestration;
mod renderer;

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{MessageInput, PdfChatClient};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use crate::orchestration::Dispatch;

#[derive(Parser, Debug)]
#[command(about = "Upload a PDF and ask questions about it")]
struct Args {
    /// Backend base URL, e.g. http://127.0.0.1:5000
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    request_timeout_secs: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref());
    if let Some(v) = args.server_url {
        settings.server_url = v;
    }
    if let Some(v) = args.request_timeout_secs {
        settings.request_timeout_secs = v;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let client = PdfChatClient::connect(&settings.server_url, settings.request_timeout())
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    let renderer = tokio::spawn(renderer::run(client.subscribe_transcript()));

    println!("{}", commands::HELP_TEXT);
    let mut input = MessageInput::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let cmd = commands::parse_command(&line);
        if let Dispatch::Exit = orchestration::dispatch_command(&client, &mut input, cmd).await {
            break;
        }
    }

    renderer.abort();
    Ok(())
}
