//! Prints transcript entries to stdout as they are appended.

use client_core::{TranscriptEntry, TranscriptEvent};
use shared::domain::{Author, EntryKind};
use tokio::sync::broadcast;
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    StreamExt,
};
use tracing::{trace, warn};

pub async fn run(events: broadcast::Receiver<TranscriptEvent>) {
    let mut stream = BroadcastStream::new(events);
    while let Some(event) = stream.next().await {
        match event {
            Ok(TranscriptEvent::Appended(entry)) => println!("{}", render_entry(&entry)),
            // A terminal cannot take back a printed line; the answer that
            // follows replaces the marker visually.
            Ok(TranscriptEvent::Removed(id)) => trace!(entry_id = %id, "pending marker cleared"),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                warn!(skipped, "renderer fell behind the transcript")
            }
        }
    }
}

pub fn render_entry(entry: &TranscriptEntry) -> String {
    let time = entry.created_at.format("%H:%M:%S");
    match (entry.author, entry.kind) {
        (Author::User, _) => format!("[{time}] you: {}", entry.text),
        (Author::Bot, EntryKind::PendingMarker) => format!("[{time}] … {}", entry.text),
        (Author::Bot, EntryKind::Status) => format!("[{time}] -- {}", entry.text),
        (Author::Bot, EntryKind::Message) => format!("[{time}] bot: {}", entry.text),
    }
}
