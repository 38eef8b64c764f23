//! User input lines mapped to front-end commands.

use std::path::PathBuf;

use shared::domain::SelectionSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    SelectFiles {
        source: SelectionSource,
        paths: Vec<PathBuf>,
    },
    Ask(String),
    Status,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub const HELP_TEXT: &str = "\
Commands:
  /upload <path> [path...]  pick a PDF (only the first file is used)
  /drop <path> [path...]    drop a PDF onto the upload area
  /status                   show the upload status line
  /help                     show this help
  /quit                     exit
Anything else is sent as a question about the uploaded PDF.";

pub fn parse_command(line: &str) -> UserCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return UserCommand::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return UserCommand::Ask(trimmed.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let paths: Vec<PathBuf> = parts.map(PathBuf::from).collect();
    match name {
        "upload" | "open" => UserCommand::SelectFiles {
            source: SelectionSource::Picker,
            paths,
        },
        "drop" => UserCommand::SelectFiles {
            source: SelectionSource::Drop,
            paths,
        },
        "status" => UserCommand::Status,
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" | "q" => UserCommand::Quit,
        other => UserCommand::Unknown(other.to_string()),
    }
}
