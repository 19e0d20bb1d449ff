//! # sift-inference
//!
//! External collaborators used by the media extractors:
//! - Ollama generation backend (default feature `ollama`)
//! - Whisper-compatible transcription backend
//! - Transcription analysis (prompt, response parsing, heuristic fallback)
//!
//! # Feature Flags
//!
//! - `ollama` (default): Enable the Ollama backend
//! - `mock`: Deterministic mock backends for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use sift_inference::{analysis, OllamaBackend};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OllamaBackend::from_env();
//!     let analysis = analysis::analyze(Some(&backend), "We need to ship the report.", 30).await;
//!     println!("{}", analysis.summary);
//! }
//! ```

pub mod analysis;
pub mod transcription;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use sift_core::{GenerationBackend, TranscriptionBackend, TranscriptionResult};

#[cfg(feature = "ollama")]
pub use ollama::OllamaBackend;

pub use analysis::{build_analysis_prompt, heuristic_analysis, parse_analysis_response};
pub use transcription::WhisperBackend;
