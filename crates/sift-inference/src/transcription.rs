//! Whisper-compatible transcription backend.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

use sift_core::{defaults, mime_subtype, Error, Result, TranscriptionBackend, TranscriptionResult};

/// OpenAI-compatible Whisper backend (works with Speaches/faster-whisper-server).
pub struct WhisperBackend {
    base_url: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl WhisperBackend {
    pub fn new(base_url: String, model: String) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            client: reqwest::Client::new(),
            timeout_secs: defaults::TRANSCRIBE_TIMEOUT_SECS,
        }
    }
}

#[derive(Deserialize)]
struct WhisperResponse {
    text: String,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

/// File extension the Whisper server expects for a MIME type.
fn upload_extension(mime_type: &str) -> &'static str {
    match mime_subtype(mime_type).as_str() {
        "mpeg" | "mp3" => "mp3",
        "ogg" => "ogg",
        "flac" => "flac",
        "aac" => "aac",
        "webm" => "webm",
        "mp4" | "m4a" | "x-m4a" => "m4a",
        _ => "wav",
    }
}

#[async_trait]
impl TranscriptionBackend for WhisperBackend {
    #[instrument(skip(self, audio_data), fields(subsystem = "inference", component = "whisper", op = "transcribe", model = %self.model, size_bytes = audio_data.len()))]
    async fn transcribe(&self, audio_data: &[u8], mime_type: &str) -> Result<TranscriptionResult> {
        let url = format!("{}/v1/audio/transcriptions", self.base_url);

        let file_part = reqwest::multipart::Part::bytes(audio_data.to_vec())
            .file_name(format!("audio.{}", upload_extension(mime_type)))
            .mime_str(mime_type)
            .map_err(|e| Error::Transcription(format!("Failed to create multipart: {}", e)))?;

        let form = reqwest::multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "verbose_json");

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await
            .map_err(|e| Error::Transcription(format!("Transcription request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Transcription(format!(
                "Whisper API returned {}: {}",
                status, body
            )));
        }

        let result: WhisperResponse = response.json().await.map_err(|e| {
            Error::Transcription(format!("Failed to parse whisper response: {}", e))
        })?;

        Ok(TranscriptionResult {
            full_text: result.text.trim().to_string(),
            language: result.language,
            duration_secs: result.duration,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        match self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
