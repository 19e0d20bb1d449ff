//! Core traits for the pipeline's pluggable seams.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{ExtractionResult, FileCategory, NoteRecord, Result, UploadedFile};

// =============================================================================
// EXTRACTION TRAITS
// =============================================================================

/// Adapter for extracting normalized text from one category of upload.
///
/// Adapters may fail; the registry converts any `Err` into an error-banner
/// result so nothing propagates past dispatch.
#[async_trait]
pub trait ExtractionAdapter: Send + Sync {
    /// The file category this adapter handles.
    fn category(&self) -> FileCategory;

    /// Extract content from the upload.
    async fn extract(&self, file: &UploadedFile) -> Result<ExtractionResult>;

    /// Check if the adapter's external dependencies are available.
    async fn health_check(&self) -> Result<bool>;

    /// Human-readable name of this adapter.
    fn name(&self) -> &str;
}

// =============================================================================
// INFERENCE TRAITS
// =============================================================================

/// Backend for text generation.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate text given a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate text with system context.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

/// Result of audio transcription.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranscriptionResult {
    /// Full transcribed text.
    pub full_text: String,
    /// Detected language (ISO 639-1 code).
    pub language: Option<String>,
    /// Total audio duration in seconds.
    pub duration_secs: Option<f64>,
}

/// Backend for transcribing audio.
#[async_trait]
pub trait TranscriptionBackend: Send + Sync {
    /// Transcribe audio data.
    async fn transcribe(&self, audio_data: &[u8], mime_type: &str) -> Result<TranscriptionResult>;

    /// Check if the transcription backend is available.
    async fn health_check(&self) -> Result<bool>;

    /// Get the model name being used.
    fn model_name(&self) -> &str;
}

// =============================================================================
// PERSISTENCE
// =============================================================================

/// Persistence collaborator receiving each file's notes.
#[async_trait]
pub trait NoteSink: Send + Sync {
    /// Store one file's notes. Id collisions beyond the synthesizer's
    /// guarantees are the sink's concern.
    async fn store(&self, notes: &[NoteRecord]) -> Result<()>;
}
