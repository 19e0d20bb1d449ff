//! End-to-end ingestion: classify, extract, segment, synthesize, store.
//!
//! Each file runs through the stages independently. A batch is processed with
//! bounded concurrency and results keep input order. Nothing here aborts a
//! batch: extraction failures are already banners, and store failures are
//! recorded per file in the [`BatchReport`].

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use sift_core::defaults::BATCH_CONCURRENCY;
use sift_core::logging;
use sift_core::{
    ExtractionDiagnostic, FileCategory, NoteRecord, NoteSink, ProcessedFile, UploadedFile,
};
use sift_extract::ExtractionRegistry;
use sift_inference::{OllamaBackend, WhisperBackend};
use sift_notes::{segment_with_strategy, NoteSynthesizer};

use crate::config::IngestConfig;

/// Everything produced for one upload.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub processed: ProcessedFile,
    /// Segmentation strategy that fired.
    pub strategy: &'static str,
    /// Number of segmented units; always equals `notes.len()`.
    pub units: usize,
    pub notes: Vec<NoteRecord>,
}

/// Per-file line of a [`BatchReport`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file_name: String,
    pub category: FileCategory,
    pub diagnostic: ExtractionDiagnostic,
    pub strategy: String,
    pub note_count: usize,
    /// Set when the sink rejected this file's notes.
    pub store_error: Option<String>,
}

/// Result of [`Pipeline::ingest_batch`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub files: Vec<FileReport>,
    pub notes_stored: usize,
}

impl BatchReport {
    /// Files whose extraction was not clean.
    pub fn degraded_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.diagnostic != ExtractionDiagnostic::Extracted)
            .count()
    }

    /// Files whose notes the sink rejected.
    pub fn store_failures(&self) -> usize {
        self.files.iter().filter(|f| f.store_error.is_some()).count()
    }
}

pub struct Pipeline {
    registry: ExtractionRegistry,
    synthesizer: NoteSynthesizer,
    concurrency: usize,
}

impl Pipeline {
    pub fn new(registry: ExtractionRegistry, synthesizer: NoteSynthesizer) -> Self {
        Self {
            registry,
            synthesizer,
            concurrency: BATCH_CONCURRENCY,
        }
    }

    /// Build the registry and collaborators described by the config.
    pub fn from_config(config: &IngestConfig) -> Self {
        let mut registry = ExtractionRegistry::new().with_analysis_enabled(config.analysis_enabled);
        if let Some(url) = &config.whisper_base_url {
            registry = registry.with_transcriber(Arc::new(WhisperBackend::new(
                url.clone(),
                config.whisper_model.clone(),
            )));
        }
        if let Some(url) = &config.ollama_base {
            registry = registry.with_analyzer(Arc::new(OllamaBackend::with_config(
                url.clone(),
                config.gen_model.clone(),
                config.gen_timeout_secs,
            )));
        }
        info!(
            note_category = %config.note_category,
            concurrency = config.concurrency,
            analysis_enabled = config.analysis_enabled,
            transcriber = config.whisper_base_url.is_some(),
            analyzer = config.ollama_base.is_some(),
            "Pipeline configured"
        );

        Self::new(registry, NoteSynthesizer::new(config.note_category.clone()))
            .with_concurrency(config.concurrency)
    }

    /// Files processed at once in a batch. Zero is treated as one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn registry(&self) -> &ExtractionRegistry {
        &self.registry
    }

    #[instrument(skip(self, file), fields(file_name = %file.name))]
    pub async fn process_file(&self, file: &UploadedFile) -> FileOutcome {
        let start = Instant::now();
        let processed = self.registry.extract(file).await;
        let segmentation = segment_with_strategy(&processed.content, &processed.name);
        let notes = self.synthesizer.synthesize(&processed, &segmentation.units);

        info!(
            category = processed.category.as_str(),
            diagnostic = processed.diagnostic.kind(),
            strategy = segmentation.strategy,
            unit_count = segmentation.units.len(),
            note_count = notes.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "File processed"
        );
        FileOutcome {
            units: segmentation.units.len(),
            strategy: segmentation.strategy,
            processed,
            notes,
        }
    }

    /// Process every file, preserving input order.
    pub async fn process_batch(&self, files: Vec<UploadedFile>) -> Vec<FileOutcome> {
        stream::iter(files)
            .map(|file| async move { self.process_file(&file).await })
            .buffered(self.concurrency)
            .collect()
            .await
    }

    /// Process every file and hand each file's notes to the sink.
    #[instrument(skip(self, files, sink), fields(batch_id, file_count = files.len()))]
    pub async fn ingest_batch(&self, files: Vec<UploadedFile>, sink: &dyn NoteSink) -> BatchReport {
        let batch_id = Uuid::now_v7();
        tracing::Span::current().record(logging::BATCH_ID, tracing::field::display(batch_id));
        let start = Instant::now();

        let results: Vec<(FileOutcome, Option<String>)> = stream::iter(files)
            .map(|file| async move {
                let outcome = self.process_file(&file).await;
                let store_error = if outcome.notes.is_empty() {
                    None
                } else {
                    match sink.store(&outcome.notes).await {
                        Ok(()) => None,
                        Err(e) => {
                            warn!(file_name = %file.name, error = %e, "Storing notes failed");
                            Some(e.to_string())
                        }
                    }
                };
                (outcome, store_error)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let notes_stored = results
            .iter()
            .filter(|(_, err)| err.is_none())
            .map(|(outcome, _)| outcome.notes.len())
            .sum();
        let files: Vec<FileReport> = results
            .into_iter()
            .map(|(outcome, store_error)| FileReport {
                file_name: outcome.processed.name,
                category: outcome.processed.category,
                diagnostic: outcome.processed.diagnostic,
                strategy: outcome.strategy.to_string(),
                note_count: outcome.notes.len(),
                store_error,
            })
            .collect();

        let report = BatchReport {
            batch_id,
            files,
            notes_stored,
        };
        info!(
            file_count = report.files.len(),
            note_count = report.notes_stored,
            degraded = report.degraded_count(),
            store_failures = report.store_failures(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Batch ingested"
        );
        report
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(ExtractionRegistry::new(), NoteSynthesizer::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_process_file_counts_match() {
        let pipeline = Pipeline::default();
        let file = UploadedFile::new("a.md", "text/markdown", "# One\nfirst body\n# Two\nsecond body");
        let outcome = pipeline.process_file(&file).await;

        assert_eq!(outcome.strategy, "markdown_headings");
        assert_eq!(outcome.units, 2);
        assert_eq!(outcome.notes.len(), 2);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let pipeline = Pipeline::default().with_concurrency(3);
        let files: Vec<UploadedFile> = (0..8)
            .map(|i| UploadedFile::new(format!("f{}.txt", i), "text/plain", format!("file {}", i)))
            .collect();
        let outcomes = pipeline.process_batch(files).await;
        let names: Vec<&str> = outcomes.iter().map(|o| o.processed.name.as_str()).collect();
        assert_eq!(names, vec!["f0.txt", "f1.txt", "f2.txt", "f3.txt", "f4.txt", "f5.txt", "f6.txt", "f7.txt"]);
    }

    #[tokio::test]
    async fn test_registry_reports_every_category() {
        let health = Pipeline::default().registry().health_check_all().await;
        assert_eq!(health.len(), FileCategory::ALL.len());
        assert!(health.contains(&(FileCategory::Text, true)));
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let pipeline = Pipeline::default().with_concurrency(0);
        assert_eq!(pipeline.concurrency, 1);
    }

    #[test]
    fn test_from_config_uses_category() {
        let config = IngestConfig::default().with_note_category("Inbox").with_concurrency(2);
        let pipeline = Pipeline::from_config(&config);
        assert_eq!(pipeline.synthesizer.category(), "Inbox");
        assert_eq!(pipeline.concurrency, 2);
    }
}
