//! Mock generation and transcription backends for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sift_inference::mock::MockGenerationBackend;
//! use sift_core::GenerationBackend;
//!
//! #[tokio::test]
//! async fn test_with_mock_backend() {
//!     let backend = MockGenerationBackend::new().with_response("{\"summary\":\"ok\"}");
//!     let text = backend.generate("prompt").await.unwrap();
//!     assert_eq!(text, "{\"summary\":\"ok\"}");
//! }
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sift_core::{Error, GenerationBackend, Result, TranscriptionBackend, TranscriptionResult};

/// Record of one call made against a mock backend.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
}

/// Mock generation backend returning a fixed response (or failing).
#[derive(Clone)]
pub struct MockGenerationBackend {
    response: String,
    fail: bool,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGenerationBackend {
    pub fn new() -> Self {
        Self {
            response: "Mock response".to_string(),
            fail: false,
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set the response returned for every prompt.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = response.into();
        self
    }

    /// Make every call fail with an inference error.
    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().map(|log| log.len()).unwrap_or(0)
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn record(&self, operation: &str, input: &str) {
        if let Ok(mut log) = self.call_log.lock() {
            log.push(MockCall {
                operation: operation.to_string(),
                input: input.to_string(),
            });
        }
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, _system: &str, prompt: &str) -> Result<String> {
        self.record("generate", prompt);
        if self.fail {
            return Err(Error::Inference("mock generation failure".to_string()));
        }
        Ok(self.response.clone())
    }

    fn model_name(&self) -> &str {
        "mock-gen"
    }
}

/// Mock transcription backend returning fixed text (or failing).
#[derive(Clone)]
pub struct MockTranscriptionBackend {
    text: String,
    fail: bool,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockTranscriptionBackend {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fail: false,
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every call fail with a transcription error.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("")
        }
    }

    pub fn call_count(&self) -> usize {
        self.call_log.lock().map(|log| log.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TranscriptionBackend for MockTranscriptionBackend {
    async fn transcribe(&self, audio_data: &[u8], mime_type: &str) -> Result<TranscriptionResult> {
        if let Ok(mut log) = self.call_log.lock() {
            log.push(MockCall {
                operation: "transcribe".to_string(),
                input: format!("{} ({} bytes)", mime_type, audio_data.len()),
            });
        }
        if self.fail {
            return Err(Error::Transcription("mock transcription failure".to_string()));
        }
        Ok(TranscriptionResult {
            full_text: self.text.clone(),
            language: Some("en".to_string()),
            duration_secs: None,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.fail)
    }

    fn model_name(&self) -> &str {
        "mock-whisper"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_generation_mock_records_calls() {
        let backend = MockGenerationBackend::new().with_response("fixed");
        assert_eq!(backend.generate("a").await.unwrap(), "fixed");
        assert_eq!(backend.generate("b").await.unwrap(), "fixed");
        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].input, "b");
    }

    #[tokio::test]
    async fn test_generation_mock_failing() {
        let backend = MockGenerationBackend::new().failing();
        assert!(matches!(
            backend.generate("a").await,
            Err(Error::Inference(_))
        ));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_transcription_mock() {
        let backend = MockTranscriptionBackend::new("hello");
        let result = backend.transcribe(b"abc", "audio/mpeg").await.unwrap();
        assert_eq!(result.full_text, "hello");
        assert!(backend.health_check().await.unwrap());

        let failing = MockTranscriptionBackend::failing();
        assert!(failing.transcribe(b"abc", "audio/mpeg").await.is_err());
        assert!(!failing.health_check().await.unwrap());
    }
}
