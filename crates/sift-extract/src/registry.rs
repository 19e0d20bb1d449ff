//! Extractor dispatch.
//!
//! One adapter per [`FileCategory`], selected by an exhaustive match. This is
//! the single containment point for adapter errors: every `Err` becomes an
//! error-banner [`ProcessedFile`] with a structured diagnostic.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use sift_core::{
    classify, Error, ExtractionAdapter, ExtractionDiagnostic, ExtractionResult, FileCategory,
    GenerationBackend, ProcessedFile, TranscriptionBackend, UploadedFile,
};

use crate::adapters::{
    ArchiveAdapter, CodeAdapter, DocumentAdapter, ImageAdapter, MediaAdapter,
    PresentationAdapter, SpreadsheetAdapter, TextAdapter, UnknownAdapter,
};
use crate::banner;

/// Registry holding exactly one adapter per file category.
pub struct ExtractionRegistry {
    text: TextAdapter,
    document: DocumentAdapter,
    spreadsheet: SpreadsheetAdapter,
    presentation: PresentationAdapter,
    image: ImageAdapter,
    audio: MediaAdapter,
    video: MediaAdapter,
    code: CodeAdapter,
    archive: ArchiveAdapter,
    unknown: UnknownAdapter,
}

impl ExtractionRegistry {
    /// Registry with every adapter and no external collaborators attached.
    pub fn new() -> Self {
        Self {
            text: TextAdapter,
            document: DocumentAdapter,
            spreadsheet: SpreadsheetAdapter,
            presentation: PresentationAdapter,
            image: ImageAdapter,
            audio: MediaAdapter::audio(),
            video: MediaAdapter::video(),
            code: CodeAdapter,
            archive: ArchiveAdapter,
            unknown: UnknownAdapter,
        }
    }

    /// Attach a speech backend to the audio and video adapters.
    pub fn with_transcriber(mut self, transcriber: Arc<dyn TranscriptionBackend>) -> Self {
        self.audio = self.audio.with_transcriber(transcriber.clone());
        self.video = self.video.with_transcriber(transcriber);
        self
    }

    /// Attach the generation backend used for audio analysis.
    pub fn with_analyzer(mut self, analyzer: Arc<dyn GenerationBackend>) -> Self {
        self.audio = self.audio.with_analyzer(analyzer);
        self
    }

    pub fn with_analysis_enabled(mut self, enabled: bool) -> Self {
        self.audio = self.audio.with_analysis(enabled);
        self
    }

    /// The adapter responsible for a category.
    pub fn adapter_for(&self, category: FileCategory) -> &dyn ExtractionAdapter {
        match category {
            FileCategory::Text => &self.text,
            FileCategory::Document => &self.document,
            FileCategory::Spreadsheet => &self.spreadsheet,
            FileCategory::Presentation => &self.presentation,
            FileCategory::Image => &self.image,
            FileCategory::Audio => &self.audio,
            FileCategory::Video => &self.video,
            FileCategory::Code => &self.code,
            FileCategory::Archive => &self.archive,
            FileCategory::Unknown => &self.unknown,
        }
    }

    /// Classify and extract one upload. Never fails.
    #[instrument(skip(self, file), fields(file_name = %file.name, category))]
    pub async fn extract(&self, file: &UploadedFile) -> ProcessedFile {
        let category = classify(&file.name);
        tracing::Span::current().record("category", category.as_str());
        let adapter = self.adapter_for(category);
        let start = Instant::now();

        let result = match adapter.extract(file).await {
            Ok(result) => result,
            Err(Error::UnsupportedFormat(reason)) => {
                warn!(
                    adapter = adapter.name(),
                    reason = %reason,
                    "Unsupported format, emitting banner"
                );
                ExtractionResult::with_diagnostic(
                    banner::unsupported_banner(&file.name, category, &reason),
                    ExtractionDiagnostic::Unsupported { reason },
                )
            }
            Err(e) => {
                let cause = e.to_string();
                warn!(
                    adapter = adapter.name(),
                    error = %cause,
                    "Extraction failed, emitting banner"
                );
                ExtractionResult::with_diagnostic(
                    banner::failure_banner(&file.name, category, &cause),
                    ExtractionDiagnostic::Failed { cause },
                )
            }
        };

        debug!(
            adapter = adapter.name(),
            diagnostic = result.diagnostic.kind(),
            duration_ms = start.elapsed().as_millis() as u64,
            size_bytes = file.size,
            "Extraction complete"
        );
        ProcessedFile::new(file, category, result)
    }

    /// Health of every adapter, in category order. Errors count as unhealthy.
    pub async fn health_check_all(&self) -> Vec<(FileCategory, bool)> {
        let mut results = Vec::with_capacity(FileCategory::ALL.len());
        for category in FileCategory::ALL {
            let healthy = self
                .adapter_for(category)
                .health_check()
                .await
                .unwrap_or(false);
            results.push((category, healthy));
        }
        results
    }
}

impl Default for ExtractionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
