//! Audio/video adapter.
//!
//! Duration is estimated from the declared size and an assumed bitrate keyed
//! by MIME subtype. Transcription is delegated to a speech backend when one
//! is attached; otherwise (or when it fails) a simulated placeholder text is
//! used. Real audio transcriptions are then analyzed.

use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};
use once_cell::sync::Lazy;
use tracing::{debug, warn};

use sift_core::defaults::{
    DEFAULT_AUDIO_KBPS, DEFAULT_VIDEO_KBPS, MEDIA_DURATION_MAX_SECS, MEDIA_DURATION_MIN_SECS,
    THUMBNAIL_SIZE,
};
use sift_core::{
    mime_subtype, AudioAnalysis, Error, ExtractionAdapter, ExtractionDiagnostic,
    ExtractionResult, FileCategory, GenerationBackend, Result, TranscriptionBackend,
    UploadedFile,
};
use sift_inference::analysis;

use super::image::png_data_url;
use crate::banner;

/// Placeholder poster frame for videos: a light play triangle on dark gray.
static VIDEO_POSTER: Lazy<Option<String>> = Lazy::new(|| {
    let size = THUMBNAIL_SIZE;
    let (left, right, mid) = (size * 11 / 30, size * 21 / 30, size / 2);
    let half_height = (size / 5) as i64;
    let poster = RgbaImage::from_fn(size, size, |x, y| {
        let inside = x >= left
            && x <= right
            && (y as i64 - mid as i64).abs() * (right - left) as i64
                <= (right - x) as i64 * half_height;
        if inside {
            Rgba([230, 230, 230, 255])
        } else {
            Rgba([30, 30, 30, 255])
        }
    });
    png_data_url(&DynamicImage::ImageRgba8(poster)).ok()
});

/// Assumed bitrate in kbps for a MIME type.
pub fn bitrate_kbps(mime_type: &str, category: FileCategory) -> u64 {
    match mime_subtype(mime_type).as_str() {
        "webm" => 32,
        "ogg" | "opus" => 96,
        "mpeg" | "mp3" => 128,
        "mp4" | "m4a" | "x-m4a" | "aac" => 128,
        "flac" | "x-flac" => 900,
        "wav" | "x-wav" | "wave" | "vnd.wave" => 1411,
        _ if category == FileCategory::Video => DEFAULT_VIDEO_KBPS,
        _ => DEFAULT_AUDIO_KBPS,
    }
}

/// `size * 8 / (kbps * 1000)`, clamped to the supported range.
pub fn estimate_duration_secs(size_bytes: u64, mime_type: &str, category: FileCategory) -> u64 {
    let kbps = bitrate_kbps(mime_type, category);
    let secs = size_bytes.saturating_mul(8) / (kbps * 1000);
    secs.clamp(MEDIA_DURATION_MIN_SECS, MEDIA_DURATION_MAX_SECS)
}

fn clamp_duration(secs: f64) -> u64 {
    (secs.round().max(0.0) as u64).clamp(MEDIA_DURATION_MIN_SECS, MEDIA_DURATION_MAX_SECS)
}

struct Transcript {
    text: String,
    language: Option<String>,
    duration_secs: u64,
    estimated: bool,
    /// `None` for a real transcription, otherwise why it was simulated.
    simulated_reason: Option<String>,
}

fn simulated_transcription(file: &UploadedFile, category: FileCategory, duration: u64) -> String {
    let kind = if category == FileCategory::Video {
        "video"
    } else {
        "audio recording"
    };
    format!(
        "[Simulated transcription] Placeholder for the {} \"{}\" ({}). \
         Speech recognition was not available, so no spoken content was transcribed.",
        kind,
        file.name,
        banner::format_duration(duration)
    )
}

fn render_analysis(analysis: &AudioAnalysis) -> String {
    let mut lines = vec![
        "Analysis:".to_string(),
        format!("Topics: {}", analysis.topics.join(", ")),
        format!("Sentiment: {}", analysis.sentiment),
        format!("Speaking Rate: {:.1} words per minute", analysis.speaking_rate),
    ];
    if !analysis.key_points.is_empty() {
        lines.push("Key Points:".to_string());
        let points: Vec<&str> = analysis.key_points.iter().map(String::as_str).collect();
        lines.push(banner::hints(&points));
    }
    if !analysis.action_items.is_empty() {
        lines.push("Action Items:".to_string());
        let items: Vec<&str> = analysis.action_items.iter().map(String::as_str).collect();
        lines.push(banner::hints(&items));
    }
    if !analysis.summary.is_empty() {
        lines.push(format!("Summary: {}", analysis.summary));
    }
    lines.join("\n")
}

/// Extractor for one media category (audio or video).
pub struct MediaAdapter {
    category: FileCategory,
    transcriber: Option<Arc<dyn TranscriptionBackend>>,
    analyzer: Option<Arc<dyn GenerationBackend>>,
    analysis_enabled: bool,
}

impl MediaAdapter {
    pub fn audio() -> Self {
        Self::for_category(FileCategory::Audio)
    }

    pub fn video() -> Self {
        Self::for_category(FileCategory::Video)
    }

    fn for_category(category: FileCategory) -> Self {
        Self {
            category,
            transcriber: None,
            analyzer: None,
            analysis_enabled: true,
        }
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn TranscriptionBackend>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn with_analyzer(mut self, analyzer: Arc<dyn GenerationBackend>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Disable to skip transcription analysis entirely.
    pub fn with_analysis(mut self, enabled: bool) -> Self {
        self.analysis_enabled = enabled;
        self
    }

    async fn transcript(&self, file: &UploadedFile) -> Transcript {
        let estimate = estimate_duration_secs(file.size, &file.mime_type, self.category);

        let reason = match &self.transcriber {
            None => "speech recognition is not configured".to_string(),
            Some(backend) => match backend.transcribe(&file.data, &file.mime_type).await {
                Ok(result) if !result.full_text.trim().is_empty() => {
                    return Transcript {
                        text: result.full_text.trim().to_string(),
                        language: result.language,
                        duration_secs: result.duration_secs.map(clamp_duration).unwrap_or(estimate),
                        estimated: result.duration_secs.is_none(),
                        simulated_reason: None,
                    };
                }
                Ok(_) => {
                    warn!(file_name = %file.name, "Transcription returned no text, using placeholder");
                    "transcription returned no text".to_string()
                }
                Err(e) => {
                    warn!(file_name = %file.name, error = %e, "Transcription failed, using placeholder");
                    format!("transcription failed: {}", e)
                }
            },
        };

        Transcript {
            text: simulated_transcription(file, self.category, estimate),
            language: None,
            duration_secs: estimate,
            estimated: true,
            simulated_reason: Some(reason),
        }
    }
}

#[async_trait]
impl ExtractionAdapter for MediaAdapter {
    fn category(&self) -> FileCategory {
        self.category
    }

    async fn extract(&self, file: &UploadedFile) -> Result<ExtractionResult> {
        let transcript = self.transcript(file).await;
        let is_video = self.category == FileCategory::Video;
        debug!(
            file_name = %file.name,
            duration_secs = transcript.duration_secs,
            simulated = transcript.simulated_reason.is_some(),
            "Media transcript ready"
        );

        let analysis = if !is_video && self.analysis_enabled && transcript.simulated_reason.is_none() {
            Some(
                analysis::analyze(
                    self.analyzer.as_deref(),
                    &transcript.text,
                    transcript.duration_secs,
                )
                .await,
            )
        } else {
            None
        };

        let duration_label = if transcript.estimated {
            format!("{} (estimated)", banner::format_duration(transcript.duration_secs))
        } else {
            banner::format_duration(transcript.duration_secs)
        };
        let (icon, label) = if is_video { ("🎬", "Video") } else { ("🎵", "Audio") };
        let mut content = banner::header(
            icon,
            label,
            &file.name,
            &[
                ("Duration", duration_label),
                ("Format", file.mime_type.clone()),
                ("Size", banner::format_size(file.size)),
            ],
        );
        content.push_str("\nTranscription:\n");
        content.push_str(&transcript.text);
        if let Some(analysis) = &analysis {
            content.push('\n');
            content.push_str(&render_analysis(analysis));
        }

        let source = if transcript.simulated_reason.is_some() {
            "simulated"
        } else {
            "service"
        };
        let mut result = match transcript.simulated_reason {
            None => ExtractionResult::extracted(content),
            Some(reason) => {
                ExtractionResult::with_diagnostic(content, ExtractionDiagnostic::Placeholder { reason })
            }
        }
        .with_meta("duration", transcript.duration_secs)
        .with_meta(
            "bitrate_kbps",
            bitrate_kbps(&file.mime_type, self.category),
        )
        .with_meta("transcription", transcript.text)
        .with_meta("transcription_source", source);

        if let Some(language) = transcript.language {
            result = result.with_meta("language", language);
        }
        if let Some(analysis) = &analysis {
            result = result
                .with_meta("sentiment", analysis.sentiment.to_string())
                .with_meta("analysis", serde_json::to_value(analysis)?);
        }
        if is_video {
            let poster = VIDEO_POSTER
                .clone()
                .ok_or_else(|| Error::Internal("poster thumbnail unavailable".to_string()))?;
            result = result.with_meta("thumbnail", poster);
        }
        Ok(result)
    }

    async fn health_check(&self) -> Result<bool> {
        match &self.transcriber {
            Some(backend) => backend.health_check().await,
            None => Ok(true), // Simulated transcription needs nothing external
        }
    }

    fn name(&self) -> &str {
        match self.category {
            FileCategory::Video => "video",
            _ => "audio",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_core::Sentiment;
    use sift_inference::mock::{MockGenerationBackend, MockTranscriptionBackend};

    fn audio_file(size: u64, mime: &str) -> UploadedFile {
        UploadedFile::new("memo.mp3", mime, vec![0u8; 16]).with_declared_size(size)
    }

    #[test]
    fn test_bitrates() {
        assert_eq!(bitrate_kbps("audio/webm;codecs=opus", FileCategory::Audio), 32);
        assert_eq!(bitrate_kbps("audio/mpeg", FileCategory::Audio), 128);
        assert_eq!(bitrate_kbps("audio/wav", FileCategory::Audio), 1411);
        assert_eq!(bitrate_kbps("audio/x-unknown", FileCategory::Audio), 128);
        assert_eq!(bitrate_kbps("video/x-unknown", FileCategory::Video), 1000);
    }

    #[test]
    fn test_duration_estimate_and_clamp() {
        // 1 MB of mp3 at 128 kbps = 65 s
        assert_eq!(estimate_duration_secs(1_048_576, "audio/mpeg", FileCategory::Audio), 65);
        assert_eq!(estimate_duration_secs(0, "audio/mpeg", FileCategory::Audio), 1);
        assert_eq!(
            estimate_duration_secs(u64::MAX / 16, "audio/webm", FileCategory::Audio),
            7200
        );
    }

    #[tokio::test]
    async fn test_audio_without_transcriber_is_placeholder() {
        let file = audio_file(1_048_576, "audio/mpeg");
        let result = MediaAdapter::audio().extract(&file).await.unwrap();

        assert!(matches!(
            result.diagnostic,
            ExtractionDiagnostic::Placeholder { .. }
        ));
        assert!(result.content.starts_with("🎵 Audio: memo.mp3"));
        assert!(result.content.contains("Duration: 1:05 (estimated)"));
        assert!(result.content.contains("[Simulated transcription]"));
        assert!(!result.content.contains("Analysis:"));
        assert_eq!(result.metadata["duration"], 65);
        assert_eq!(result.metadata["transcription_source"], "simulated");
        assert!(result.metadata.get("thumbnail").is_none());
    }

    #[tokio::test]
    async fn test_audio_with_transcriber_and_analyzer() {
        let transcriber = Arc::new(MockTranscriptionBackend::new(
            "Great news from the team. We need to update the project plan.",
        ));
        let analyzer = Arc::new(
            MockGenerationBackend::new().with_response(
                r#"{"topics":["project"],"sentiment":"positive","keyPoints":["Plan update"],
                "actionItems":["update the plan"],"summary":"Team update.","speakingRate":110}"#,
            ),
        );
        let adapter = MediaAdapter::audio()
            .with_transcriber(transcriber.clone())
            .with_analyzer(analyzer.clone());

        let result = adapter.extract(&audio_file(500_000, "audio/mpeg")).await.unwrap();

        assert_eq!(result.diagnostic, ExtractionDiagnostic::Extracted);
        assert!(result.content.contains("We need to update the project plan."));
        assert!(result.content.contains("Analysis:"));
        assert!(result.content.contains("Summary: Team update."));
        assert!(result.content.contains("  › update the plan"));
        assert_eq!(result.metadata["transcription_source"], "service");
        assert_eq!(result.metadata["sentiment"], "positive");
        assert_eq!(result.metadata["analysis"]["speakingRate"], 110.0);
        assert_eq!(transcriber.call_count(), 1);
        assert_eq!(analyzer.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_transcription_falls_back() {
        let adapter =
            MediaAdapter::audio().with_transcriber(Arc::new(MockTranscriptionBackend::failing()));
        let result = adapter.extract(&audio_file(10_000, "audio/mpeg")).await.unwrap();
        match &result.diagnostic {
            ExtractionDiagnostic::Placeholder { reason } => {
                assert!(reason.contains("transcription failed"))
            }
            other => panic!("unexpected diagnostic {:?}", other),
        }
        assert!(!adapter.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_analysis_disabled() {
        let adapter = MediaAdapter::audio()
            .with_transcriber(Arc::new(MockTranscriptionBackend::new("We will ship it.")))
            .with_analysis(false);
        let result = adapter.extract(&audio_file(10_000, "audio/mpeg")).await.unwrap();
        assert!(!result.content.contains("Analysis:"));
        assert!(result.metadata.get("analysis").is_none());
    }

    #[tokio::test]
    async fn test_heuristic_analysis_without_analyzer() {
        let adapter = MediaAdapter::audio()
            .with_transcriber(Arc::new(MockTranscriptionBackend::new(
                "This was a terrible meeting. We must fix the problem.",
            )));
        let result = adapter.extract(&audio_file(10_000, "audio/mpeg")).await.unwrap();
        let analysis: AudioAnalysis =
            serde_json::from_value(result.metadata["analysis"].clone()).unwrap();
        assert_eq!(analysis.sentiment, Sentiment::Negative);
        assert_eq!(analysis.action_items, vec!["must fix the problem"]);
    }

    #[tokio::test]
    async fn test_video_gets_poster_and_no_analysis() {
        let file = UploadedFile::new("clip.mp4", "video/mp4", vec![0u8; 32]).with_declared_size(5_000_000);
        let adapter = MediaAdapter::video()
            .with_transcriber(Arc::new(MockTranscriptionBackend::new("Hello from the video.")));
        let result = adapter.extract(&file).await.unwrap();

        assert!(result.content.starts_with("🎬 Video: clip.mp4"));
        assert!(result.content.contains("Hello from the video."));
        assert!(!result.content.contains("Analysis:"));
        assert!(result.metadata["thumbnail"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_names() {
        assert_eq!(MediaAdapter::audio().name(), "audio");
        assert_eq!(MediaAdapter::video().name(), "video");
        assert_eq!(MediaAdapter::video().category(), FileCategory::Video);
    }
}
