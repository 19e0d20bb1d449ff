//! Structured logging schema and field name constants for sift.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation can query by the same names across every stage.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Pipeline cannot continue (bad configuration) |
//! | WARN  | Recoverable issue, fallback applied (banner, heuristic analysis) |
//! | INFO  | Per-file and per-batch completions |
//! | DEBUG | Decision points (classification, strategy selection) |
//! | TRACE | Per-unit detail |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID for one batch invocation. Format: UUIDv7.
pub const BATCH_ID: &str = "batch_id";

/// Subsystem originating the log event.
/// Values: "extract", "segment", "synthesize", "inference", "ingest"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "registry", "image", "media", "ollama", "whisper"
pub const COMPONENT: &str = "component";

/// Logical operation name.
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Original upload file name.
pub const FILE_NAME: &str = "file_name";

/// Classified file category.
pub const CATEGORY: &str = "category";

/// Segmentation strategy that produced the units.
pub const STRATEGY: &str = "strategy";

/// Extraction diagnostic kind.
pub const DIAGNOSTIC: &str = "diagnostic";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Declared size of the upload in bytes.
pub const SIZE_BYTES: &str = "size_bytes";

/// Number of segmented units.
pub const UNIT_COUNT: &str = "unit_count";

/// Number of synthesized notes.
pub const NOTE_COUNT: &str = "note_count";

/// Number of files in a batch.
pub const FILE_COUNT: &str = "file_count";

/// Byte length of a prompt.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Inference fields ──────────────────────────────────────────────────────

/// Model name used for inference.
pub const MODEL: &str = "model";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
