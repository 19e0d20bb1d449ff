//! End-to-end pipeline tests: upload in, notes out.
//!
//! Covers:
//! - Markdown headings become one note per section
//! - Long unstructured text is chunked
//! - CSV uploads become a banner and row notes
//! - Legacy .doc yields the fixed message and a single note
//! - Store failures are reported per file without aborting the batch

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use sift_core::{
    Error, ExtractionDiagnostic, FileCategory, NoteRecord, NoteSink, NoteType, Result,
    UploadedFile,
};
use sift_extract::{ExtractionRegistry, LEGACY_DOC_MESSAGE};
use sift_inference::mock::MockTranscriptionBackend;
use sift_ingest::Pipeline;
use sift_notes::{InMemoryNoteStore, JsonFileNoteStore, NoteSynthesizer};

/// Rejects notes from files whose name contains "reject".
struct PickySink {
    accepted: AtomicUsize,
}

#[async_trait]
impl NoteSink for PickySink {
    async fn store(&self, notes: &[NoteRecord]) -> Result<()> {
        if notes.iter().any(|n| n.source_file.contains("reject")) {
            return Err(Error::Storage("sink is full".to_string()));
        }
        self.accepted.fetch_add(notes.len(), Ordering::SeqCst);
        Ok(())
    }
}

fn csv_rows(n: usize) -> String {
    let mut csv = String::from("name,role\n");
    for i in 1..=n {
        csv.push_str(&format!("Member {},Engineer\n", i));
    }
    csv
}

#[tokio::test]
async fn test_markdown_upload_yields_note_per_heading() {
    let pipeline = Pipeline::default();
    let file = UploadedFile::new("notes.md", "text/markdown", "# Intro\nHello\n\n# Details\nWorld");
    let outcome = pipeline.process_file(&file).await;

    assert_eq!(outcome.units, 2);
    let titles: Vec<&str> = outcome.notes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["Intro", "Details"]);
    assert_eq!(outcome.notes[0].content, "Hello");
    assert_eq!(outcome.notes[1].extracted_from, "2 of 2");
    assert!(outcome.notes[0].tags.contains(&"uploaded".to_string()));
}

#[tokio::test]
async fn test_long_text_upload_is_chunked() {
    let text: String = "plain words without structure ".chars().cycle().take(2500).collect();
    let pipeline = Pipeline::default();
    let outcome = pipeline
        .process_file(&UploadedFile::new("dump.txt", "text/plain", text))
        .await;

    assert_eq!(outcome.strategy, "chunks");
    assert_eq!(outcome.notes.len(), 4);
    assert!(outcome
        .notes
        .iter()
        .all(|n| n.content.chars().count() <= 800 && n.source_file == "dump.txt"));
}

#[tokio::test]
async fn test_csv_upload_becomes_row_notes() {
    let pipeline = Pipeline::default();
    let outcome = pipeline
        .process_file(&UploadedFile::new("team.csv", "text/csv", csv_rows(15)))
        .await;

    assert_eq!(outcome.processed.category, FileCategory::Spreadsheet);
    assert!(outcome.processed.content.contains("Total Rows: 15"));
    assert_eq!(outcome.strategy, "rows");
    assert_eq!(outcome.notes.len(), 10);
    assert_eq!(outcome.notes[0].title, "Member 1");
    assert_eq!(outcome.notes[0].content, "name: Member 1\nrole: Engineer");
    assert_eq!(outcome.notes[0].note_type, NoteType::Document);
}

#[tokio::test]
async fn test_legacy_doc_upload_is_single_note() {
    let pipeline = Pipeline::default();
    let outcome = pipeline
        .process_file(&UploadedFile::new(
            "old-minutes.doc",
            "application/msword",
            vec![0xD0, 0xCF, 0x11, 0xE0],
        ))
        .await;

    assert_eq!(outcome.processed.category, FileCategory::Document);
    assert_eq!(outcome.processed.content, LEGACY_DOC_MESSAGE);
    assert!(matches!(
        outcome.processed.diagnostic,
        ExtractionDiagnostic::Unsupported { .. }
    ));
    assert_eq!(outcome.notes.len(), 1);
    assert_eq!(outcome.notes[0].title, "old-minutes");
    assert_eq!(outcome.notes[0].extracted_from, "single note");
}

#[tokio::test]
async fn test_batch_is_best_effort() {
    let pipeline = Pipeline::default().with_concurrency(2);
    let files = vec![
        UploadedFile::new("good.txt", "text/plain", "fine"),
        UploadedFile::new("broken.pdf", "application/pdf", "not a pdf"),
        UploadedFile::new("reject.txt", "text/plain", "refused by the sink"),
        UploadedFile::new("also-good.md", "text/markdown", "# A\nalpha body\n# B\nbeta body"),
    ];
    let sink = PickySink {
        accepted: AtomicUsize::new(0),
    };
    let report = pipeline.ingest_batch(files, &sink).await;

    assert_eq!(report.files.len(), 4);
    assert_eq!(report.files[1].file_name, "broken.pdf");
    assert!(matches!(
        report.files[1].diagnostic,
        ExtractionDiagnostic::Failed { .. }
    ));
    assert_eq!(report.files[1].note_count, 1);
    assert!(report.files[2].store_error.is_some());
    assert_eq!(report.store_failures(), 1);
    assert_eq!(report.degraded_count(), 1);
    assert_eq!(report.notes_stored, 4);
    assert_eq!(sink.accepted.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_in_memory_store_round_trip() {
    let pipeline = Pipeline::default();
    let store = InMemoryNoteStore::new();
    let files = vec![
        UploadedFile::new("a.md", "text/markdown", "# One\nfirst body\n# Two\nsecond body"),
        UploadedFile::new("b.txt", "text/plain", "single"),
    ];
    let report = pipeline.ingest_batch(files, &store).await;

    assert_eq!(store.len().await, report.notes_stored);
    assert_eq!(store.by_source_file("a.md").await.len(), report.files[0].note_count);
    assert_eq!(store.by_source_file("b.txt").await.len(), 1);
}

#[tokio::test]
async fn test_media_notes_carry_transcription() {
    let registry = ExtractionRegistry::new()
        .with_transcriber(Arc::new(MockTranscriptionBackend::new("Short voice memo.")));
    let pipeline = Pipeline::new(registry, NoteSynthesizer::new("Voice"));
    let outcome = pipeline
        .process_file(&UploadedFile::new("memo.mp3", "audio/mpeg", vec![0u8; 32]))
        .await;

    assert!(!outcome.notes.is_empty());
    for note in &outcome.notes {
        assert_eq!(note.note_type, NoteType::Audio);
        assert_eq!(note.category, "Voice");
        assert_eq!(note.transcription.as_deref(), Some("Short voice memo."));
        assert_eq!(note.duration, Some(1));
    }
}

#[tokio::test]
async fn test_json_file_sink() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let store = JsonFileNoteStore::new(&path);
    let report = Pipeline::default()
        .ingest_batch(vec![UploadedFile::new("x.txt", "text/plain", "hello")], &store)
        .await;

    let written: Vec<NoteRecord> =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written.len(), report.notes_stored);
    assert_eq!(written[0].source_file, "x.txt");
}
