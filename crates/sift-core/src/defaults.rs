//! Centralized default constants for the sift pipeline.
//!
//! **This module is the single source of truth** for shared thresholds and
//! defaults. Segmentation thresholds in particular decide which strategy
//! governs ambiguous inputs, so they must not be redefined elsewhere.

// =============================================================================
// SEGMENTATION
// =============================================================================

/// Maximum visible characters in a unit title before it is cut with `…`.
pub const TITLE_MAX_CHARS: usize = 50;

/// Minimum heading section length (heading text + body) to keep a unit.
pub const HEADING_SECTION_MIN_CHARS: usize = 10;

/// Numbered sections and list items must be strictly longer than this.
pub const SECTION_MIN_CHARS: usize = 20;

/// Paragraphs must be strictly longer than this (trimmed) to qualify.
pub const PARAGRAPH_MIN_CHARS: usize = 50;

/// Text strictly longer than this falls back to fixed-size chunking.
pub const CHUNK_THRESHOLD_CHARS: usize = 1000;

/// Size of each fixed chunk in characters.
pub const CHUNK_SIZE_CHARS: usize = 800;

/// Title used when a single-unit fallback has no usable file stem.
pub const FALLBACK_TITLE: &str = "Extracted Content";

// =============================================================================
// EXTRACTION
// =============================================================================

/// Rows serialized verbatim in a spreadsheet preview.
pub const SPREADSHEET_PREVIEW_ROWS: usize = 10;

/// Edge length of the square letterboxed thumbnail in pixels.
pub const THUMBNAIL_SIZE: u32 = 150;

/// Upper bound on pixels sampled for image brightness/contrast heuristics.
pub const IMAGE_SAMPLE_TARGET: u64 = 10_000;

/// Lower clamp for estimated media duration in seconds.
pub const MEDIA_DURATION_MIN_SECS: u64 = 1;

/// Upper clamp for estimated media duration in seconds (2 hours).
pub const MEDIA_DURATION_MAX_SECS: u64 = 7200;

/// Assumed audio bitrate (kbps) when the MIME subtype is not in the table.
pub const DEFAULT_AUDIO_KBPS: u64 = 128;

/// Assumed video bitrate (kbps) when the MIME subtype is not in the table.
pub const DEFAULT_VIDEO_KBPS: u64 = 1000;

/// Timeout for external conversion commands (pandoc) in seconds.
pub const EXTRACTION_CMD_TIMEOUT_SECS: u64 = 60;

/// Minimum trimmed characters for a PDF to count as having a text layer.
pub const PDF_MIN_TEXT_CHARS: usize = 20;

// =============================================================================
// NOTE SYNTHESIS
// =============================================================================

/// Default category assigned to synthesized notes.
pub const NOTE_CATEGORY: &str = "Uploads";

/// Content at or below this length is used verbatim as the summary.
pub const SUMMARY_MAX_CHARS: usize = 200;

/// Length of the truncated summary prefix (before the ellipsis).
pub const SUMMARY_TRUNCATE_CHARS: usize = 150;

/// Files larger than this get the `large-file` smart tag (10 MB).
pub const LARGE_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Files smaller than this get the `small-file` smart tag (1 KB).
pub const SMALL_FILE_BYTES: u64 = 1024;

// =============================================================================
// PIPELINE
// =============================================================================

/// Files processed concurrently within a batch.
pub const BATCH_CONCURRENCY: usize = 4;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Ollama base URL.
pub const OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default generation model name (Ollama).
pub const GEN_MODEL: &str = "gpt-oss:20b";

/// Timeout for generation requests in seconds.
pub const GEN_TIMEOUT_SECS: u64 = 120;

/// Default Whisper model for the speech collaborator.
pub const DEFAULT_WHISPER_MODEL: &str = "Systran/faster-distil-whisper-large-v3";

/// Timeout for transcription requests in seconds (long audio).
pub const TRANSCRIBE_TIMEOUT_SECS: u64 = 300;

/// Number of key points kept by the heuristic audio analysis.
pub const ANALYSIS_KEY_POINTS: usize = 3;

/// Number of action items kept by the heuristic audio analysis.
pub const ANALYSIS_ACTION_ITEMS: usize = 5;

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

/// Base URL of the Ollama server.
pub const ENV_OLLAMA_BASE: &str = "OLLAMA_BASE";

/// Generation model used for audio analysis.
pub const ENV_OLLAMA_GEN_MODEL: &str = "OLLAMA_GEN_MODEL";

/// Generation timeout override.
pub const ENV_GEN_TIMEOUT_SECS: &str = "SIFT_GEN_TIMEOUT_SECS";

/// Whisper-compatible transcription service URL (unset disables it).
pub const ENV_WHISPER_BASE_URL: &str = "WHISPER_BASE_URL";

/// Whisper model name.
pub const ENV_WHISPER_MODEL: &str = "WHISPER_MODEL";

/// Note category override.
pub const ENV_NOTE_CATEGORY: &str = "SIFT_NOTE_CATEGORY";

/// Batch concurrency override.
pub const ENV_CONCURRENCY: &str = "SIFT_CONCURRENCY";

/// Toggle for the AI analysis of audio/video transcriptions.
pub const ENV_ANALYSIS_ENABLED: &str = "SIFT_ANALYSIS_ENABLED";
