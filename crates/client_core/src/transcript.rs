//! Append-only conversation log shared by both controllers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::domain::{Author, EntryId, EntryKind};
use tokio::sync::{broadcast, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub id: EntryId,
    pub author: Author,
    pub kind: EntryKind,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub enum TranscriptEvent {
    Appended(TranscriptEntry),
    Removed(EntryId),
}

/// Rendering capability the controllers write through.
///
/// Implementations must keep entries in append order. `remove` returns
/// `false` when the entry is already gone, which is not an error.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    async fn append(&self, author: Author, kind: EntryKind, text: &str) -> EntryId;
    async fn remove(&self, id: EntryId) -> bool;
}

struct TranscriptState {
    next_id: u64,
    entries: Vec<TranscriptEntry>,
}

pub struct Transcript {
    inner: Mutex<TranscriptState>,
    events: broadcast::Sender<TranscriptEvent>,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            inner: Mutex::new(TranscriptState {
                next_id: 1,
                entries: Vec::new(),
            }),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TranscriptEvent> {
        self.events.subscribe()
    }

    pub async fn entries(&self) -> Vec<TranscriptEntry> {
        self.inner.lock().await.entries.clone()
    }

    pub async fn last(&self) -> Option<TranscriptEntry> {
        self.inner.lock().await.entries.last().cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn pending_markers(&self) -> usize {
        self.inner
            .lock()
            .await
            .entries
            .iter()
            .filter(|entry| entry.kind == EntryKind::PendingMarker)
            .count()
    }
}

#[async_trait]
impl TranscriptSink for Transcript {
    async fn append(&self, author: Author, kind: EntryKind, text: &str) -> EntryId {
        let entry = {
            let mut inner = self.inner.lock().await;
            let id = EntryId(inner.next_id);
            inner.next_id += 1;
            let entry = TranscriptEntry {
                id,
                author,
                kind,
                text: text.to_string(),
                created_at: Utc::now(),
            };
            inner.entries.push(entry.clone());
            entry
        };
        let id = entry.id;
        // No subscriber is fine: headless clients and tests never render.
        let _ = self.events.send(TranscriptEvent::Appended(entry));
        id
    }

    async fn remove(&self, id: EntryId) -> bool {
        let removed = {
            let mut inner = self.inner.lock().await;
            match inner.entries.iter().position(|entry| entry.id == id) {
                Some(index) => {
                    inner.entries.remove(index);
                    true
                }
                None => false,
            }
        };
        if removed {
            let _ = self.events.send(TranscriptEvent::Removed(id));
        } else {
            tracing::debug!(entry_id = %id, "transcript entry already removed");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn entries_keep_append_order_and_unique_ids() {
        let transcript = Transcript::new();
        let first = transcript
            .append(Author::User, EntryKind::Message, "hello")
            .await;
        let second = transcript
            .append(Author::Bot, EntryKind::Message, "hi")
            .await;
        assert!(second > first);

        let texts: Vec<_> = transcript
            .entries()
            .await
            .into_iter()
            .map(|entry| entry.text)
            .collect();
        assert_eq!(texts, vec!["hello", "hi"]);
    }

    #[tokio::test]
    async fn removing_twice_is_a_noop_and_leaves_other_entries() {
        let transcript = Transcript::new();
        transcript
            .append(Author::User, EntryKind::Message, "question")
            .await;
        let marker = transcript
            .append(Author::Bot, EntryKind::PendingMarker, "thinking")
            .await;
        transcript
            .append(Author::Bot, EntryKind::Message, "unrelated")
            .await;

        assert!(transcript.remove(marker).await);
        assert!(!transcript.remove(marker).await);

        let entries = transcript.entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "question");
        assert_eq!(entries[1].text, "unrelated");
    }

    #[tokio::test]
    async fn subscribers_see_appends_and_removals() {
        let transcript = Transcript::new();
        let mut events = transcript.subscribe();

        let id = transcript
            .append(Author::Bot, EntryKind::PendingMarker, "thinking")
            .await;
        transcript.remove(id).await;

        match events.recv().await.expect("appended") {
            TranscriptEvent::Appended(entry) => assert_eq!(entry.id, id),
            other => panic!("unexpected event: {other:?}"),
        }
        match events.recv().await.expect("removed") {
            TranscriptEvent::Removed(removed) => assert_eq!(removed, id),
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
