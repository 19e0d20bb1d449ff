//! Note sinks: an in-memory store and a JSON file writer.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use sift_core::{Error, NoteRecord, NoteSink, Result};

/// In-memory sink. Notes whose id is already stored are skipped.
#[derive(Debug, Default)]
pub struct InMemoryNoteStore {
    notes: RwLock<Vec<NoteRecord>>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }

    /// Every stored note, in insertion order.
    pub async fn all(&self) -> Vec<NoteRecord> {
        self.notes.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<NoteRecord> {
        self.notes.read().await.iter().find(|n| n.id == id).cloned()
    }

    /// Notes synthesized from one uploaded file.
    pub async fn by_source_file(&self, source_file: &str) -> Vec<NoteRecord> {
        self.notes
            .read()
            .await
            .iter()
            .filter(|n| n.source_file == source_file)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NoteSink for InMemoryNoteStore {
    async fn store(&self, notes: &[NoteRecord]) -> Result<()> {
        let mut stored = self.notes.write().await;
        for note in notes {
            if stored.iter().any(|n| n.id == note.id) {
                warn!(note_id = %note.id, "Duplicate note id, skipping");
                continue;
            }
            stored.push(note.clone());
        }
        Ok(())
    }
}

/// Writes every stored note to one file as a pretty-printed JSON array.
///
/// The whole array is rewritten on each `store`, so the file is always a
/// complete document.
#[derive(Debug)]
pub struct JsonFileNoteStore {
    path: PathBuf,
    notes: RwLock<Vec<NoteRecord>>,
}

impl JsonFileNoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            notes: RwLock::new(Vec::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the (possibly empty) array without adding notes.
    pub async fn flush(&self) -> Result<()> {
        let notes = self.notes.read().await;
        self.write(&notes).await
    }

    async fn write(&self, notes: &[NoteRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(notes)?;
        tokio::fs::write(&self.path, json).await.map_err(|e| {
            Error::Storage(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        debug!(path = %self.path.display(), note_count = notes.len(), "Notes written");
        Ok(())
    }
}

#[async_trait]
impl NoteSink for JsonFileNoteStore {
    async fn store(&self, notes: &[NoteRecord]) -> Result<()> {
        let mut stored = self.notes.write().await;
        let mut next = stored.clone();
        next.extend(notes.iter().cloned());
        // Only notes that reached the file are kept for later writes.
        self.write(&next).await?;
        *stored = next;
        Ok(())
    }
}
