//! Dispatches parsed commands to the client without blocking input.

use std::{path::PathBuf, sync::Arc};

use client_core::{CandidateFile, MessageInput, PdfChatClient};
use tracing::{debug, warn};

use crate::commands::{UserCommand, HELP_TEXT};

pub enum Dispatch {
    Continue,
    Exit,
}

pub async fn dispatch_command(
    client: &Arc<PdfChatClient>,
    input: &mut MessageInput,
    cmd: UserCommand,
) -> Dispatch {
    let cmd_name = match &cmd {
        UserCommand::SelectFiles { .. } => "select_files",
        UserCommand::Ask(_) => "ask",
        UserCommand::Status => "status",
        UserCommand::Help => "help",
        UserCommand::Quit => "quit",
        UserCommand::Unknown(_) => "unknown",
        UserCommand::Empty => "empty",
    };
    debug!(command = cmd_name, "dispatching user command");

    match cmd {
        UserCommand::SelectFiles { source, paths } => {
            let client = client.clone();
            tokio::spawn(async move {
                let files = read_candidates(&paths).await;
                client.select_files(source, files).await;
            });
        }
        UserCommand::Ask(text) => {
            input.set(text);
            if let Some(text) = input.take() {
                let client = client.clone();
                tokio::spawn(async move {
                    client.ask(&text).await;
                });
            }
        }
        UserCommand::Status => {
            let session = client.snapshot().await;
            let status = session.upload_status.display_text();
            println!(
                "[status] {} | document ready: {}{}",
                if status.is_empty() { "no upload yet" } else { status.as_str() },
                if session.document_ready { "yes" } else { "no" },
                if session.pending_exchange {
                    " | waiting for an answer"
                } else {
                    ""
                }
            );
        }
        UserCommand::Help => println!("{HELP_TEXT}"),
        UserCommand::Quit => return Dispatch::Exit,
        UserCommand::Unknown(name) => {
            println!("Unknown command '/{name}'. Type /help for the list of commands.")
        }
        UserCommand::Empty => {}
    }
    Dispatch::Continue
}

/// Reads the selected paths in order, skipping unreadable ones.
async fn read_candidates(paths: &[PathBuf]) -> Vec<CandidateFile> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match CandidateFile::from_path(path).await {
            Ok(file) => files.push(file),
            Err(err) => warn!(path = %path.display(), "cannot read selected file: {err}"),
        }
    }
    files
}
