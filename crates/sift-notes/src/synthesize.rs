//! Note synthesis: one [`NoteRecord`] per segmented unit.

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{debug, trace};

use sift_core::defaults::{NOTE_CATEGORY, SUMMARY_MAX_CHARS, SUMMARY_TRUNCATE_CHARS};
use sift_core::{base_name, NoteRecord, ProcessedFile, SegmentedUnit};

use crate::smart_tags::{slugify, smart_tags};

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `{unix_ms}-{index}-{random base36}`.
pub fn generate_note_id(created_at: DateTime<Utc>, index: usize) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}-{}-{}", created_at.timestamp_millis(), index, suffix)
}

/// Content verbatim up to [`SUMMARY_MAX_CHARS`], otherwise the first
/// [`SUMMARY_TRUNCATE_CHARS`] characters trimmed plus `...`.
pub fn extractive_summary(content: &str) -> String {
    if content.chars().count() <= SUMMARY_MAX_CHARS {
        return content.to_string();
    }
    let head: String = content.chars().take(SUMMARY_TRUNCATE_CHARS).collect();
    format!("{}...", head.trim())
}

/// Category, provenance tags, file slug, then smart tags. Duplicates removed,
/// first occurrence kept.
pub fn note_tags(processed: &ProcessedFile, content: &str) -> Vec<String> {
    let mut candidates = vec![
        processed.category.as_str().to_string(),
        "uploaded".to_string(),
        "extracted".to_string(),
        slugify(base_name(&processed.name)),
    ];
    candidates.extend(smart_tags(content, processed.size_bytes));

    let mut tags: Vec<String> = Vec::with_capacity(candidates.len());
    for tag in candidates {
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Builds note records for one processed file.
#[derive(Debug, Clone)]
pub struct NoteSynthesizer {
    category: String,
}

impl NoteSynthesizer {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Exactly one record per unit, all sharing `source_file`. Zero units
    /// yields zero notes.
    pub fn synthesize(&self, processed: &ProcessedFile, units: &[SegmentedUnit]) -> Vec<NoteRecord> {
        let created_at = Utc::now();
        let total = units.len();
        let transcription = if processed.category.is_media() {
            processed.transcription().map(str::to_string)
        } else {
            None
        };

        let notes: Vec<NoteRecord> = units
            .iter()
            .enumerate()
            .map(|(index, unit)| {
                let note = NoteRecord {
                    id: generate_note_id(created_at, index),
                    title: unit.title.clone(),
                    content: unit.content.clone(),
                    note_type: processed.category.note_type(),
                    tags: note_tags(processed, &unit.content),
                    category: self.category.clone(),
                    created_at,
                    updated_at: created_at,
                    summary: extractive_summary(&unit.content),
                    is_starred: false,
                    transcription: transcription.clone(),
                    file_url: processed.thumbnail().map(str::to_string),
                    duration: processed.duration_secs(),
                    source_file: processed.name.clone(),
                    extracted_from: if total == 1 {
                        "single note".to_string()
                    } else {
                        format!("{} of {}", index + 1, total)
                    },
                };
                trace!(note_id = %note.id, title = %note.title, "Synthesized note");
                note
            })
            .collect();

        debug!(
            file_name = %processed.name,
            note_count = notes.len(),
            "Notes synthesized"
        );
        notes
    }
}

impl Default for NoteSynthesizer {
    fn default() -> Self {
        Self::new(NOTE_CATEGORY)
    }
}
