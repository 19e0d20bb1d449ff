//! Data model shared by every pipeline stage.

use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::{Error, Result};

// =============================================================================
// FILE CATEGORY
// =============================================================================

/// Closed set of upload categories, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Text,
    Document,
    Spreadsheet,
    Presentation,
    Image,
    Audio,
    Video,
    Code,
    Archive,
    Unknown,
}

impl FileCategory {
    /// Every category, in classification table order.
    pub const ALL: [FileCategory; 10] = [
        Self::Text,
        Self::Document,
        Self::Spreadsheet,
        Self::Presentation,
        Self::Image,
        Self::Audio,
        Self::Video,
        Self::Code,
        Self::Archive,
        Self::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Document => "document",
            Self::Spreadsheet => "spreadsheet",
            Self::Presentation => "presentation",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Code => "code",
            Self::Archive => "archive",
            Self::Unknown => "unknown",
        }
    }

    /// Note type assigned to notes synthesized from this category.
    pub fn note_type(&self) -> NoteType {
        match self {
            Self::Text | Self::Code => NoteType::Text,
            Self::Image => NoteType::Image,
            Self::Audio => NoteType::Audio,
            Self::Video => NoteType::Video,
            Self::Document
            | Self::Spreadsheet
            | Self::Presentation
            | Self::Archive
            | Self::Unknown => NoteType::Document,
        }
    }

    /// Whether notes from this category carry a transcription.
    pub fn is_media(&self) -> bool {
        matches!(self, Self::Audio | Self::Video)
    }
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FileCategory {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| format!("Invalid file category: {}", s))
    }
}

/// Closed set of note types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    Text,
    Document,
    Image,
    Audio,
    Video,
}

impl std::fmt::Display for NoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Document => write!(f, "document"),
            Self::Image => write!(f, "image"),
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

// =============================================================================
// INPUT
// =============================================================================

/// One upload: name, declared size and MIME type, and raw bytes.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    /// Declared size in bytes.
    pub size: u64,
    /// Declared MIME type. Only used for heuristics (media bitrate).
    pub mime_type: String,
    pub last_modified: DateTime<Utc>,
    pub data: Bytes,
}

impl UploadedFile {
    /// Build an upload from in-memory bytes; size is the byte length.
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        let data = data.into();
        Self {
            name: name.into(),
            size: data.len() as u64,
            mime_type: mime_type.into(),
            last_modified: Utc::now(),
            data,
        }
    }

    /// Override the declared size (clients may report a size other than the bytes held).
    pub fn with_declared_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = last_modified;
        self
    }

    /// Read an upload from disk, guessing its MIME type.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::InvalidInput(format!("not a file path: {}", path.display())))?;
        let data = std::fs::read(path)?;
        let last_modified = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        let mime_type = crate::mime::detect_content_type(&name, &data);

        Ok(Self::new(name, mime_type, data).with_last_modified(last_modified))
    }
}

// =============================================================================
// EXTRACTION
// =============================================================================

/// Structured outcome of an extraction, carried next to the banner text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractionDiagnostic {
    /// Real content was extracted.
    Extracted,
    /// Content is simulated text describing the file (no real analysis done).
    Placeholder { reason: String },
    /// Format recognized but not supported.
    Unsupported { reason: String },
    /// File decoded but had no extractable text.
    Empty { reason: String },
    /// Extraction failed (corrupt, protected, undecodable input).
    Failed { cause: String },
}

impl ExtractionDiagnostic {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Extracted => "extracted",
            Self::Placeholder { .. } => "placeholder",
            Self::Unsupported { .. } => "unsupported",
            Self::Empty { .. } => "empty",
            Self::Failed { .. } => "failed",
        }
    }
}

impl std::fmt::Display for ExtractionDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extracted => write!(f, "extracted"),
            Self::Placeholder { reason }
            | Self::Unsupported { reason }
            | Self::Empty { reason } => write!(f, "{}: {}", self.kind(), reason),
            Self::Failed { cause } => write!(f, "failed: {}", cause),
        }
    }
}

/// Output of one extraction adapter.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Normalized text (banners included).
    pub content: String,
    /// Format-specific metadata (JSON object).
    pub metadata: JsonValue,
    pub diagnostic: ExtractionDiagnostic,
}

impl ExtractionResult {
    /// Successfully extracted content.
    pub fn extracted(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: JsonValue::Object(Map::new()),
            diagnostic: ExtractionDiagnostic::Extracted,
        }
    }

    /// Content paired with an explicit diagnostic.
    pub fn with_diagnostic(content: impl Into<String>, diagnostic: ExtractionDiagnostic) -> Self {
        Self {
            content: content.into(),
            metadata: JsonValue::Object(Map::new()),
            diagnostic,
        }
    }

    /// Insert one metadata field.
    pub fn with_meta(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        if let JsonValue::Object(map) = &mut self.metadata {
            map.insert(key.to_string(), value.into());
        }
        self
    }
}

/// Normalized extraction result for one upload. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedFile {
    pub name: String,
    pub category: FileCategory,
    pub size_bytes: u64,
    /// Never empty on failure: holds an error banner instead.
    pub content: String,
    pub metadata: JsonValue,
    pub diagnostic: ExtractionDiagnostic,
}

impl ProcessedFile {
    pub fn new(file: &UploadedFile, category: FileCategory, result: ExtractionResult) -> Self {
        Self {
            name: file.name.clone(),
            category,
            size_bytes: file.size,
            content: result.content,
            metadata: result.metadata,
            diagnostic: result.diagnostic,
        }
    }

    /// True extraction failure (as opposed to placeholder or unsupported content).
    pub fn is_failure(&self) -> bool {
        matches!(self.diagnostic, ExtractionDiagnostic::Failed { .. })
    }

    /// Anything other than a clean extraction.
    pub fn is_degraded(&self) -> bool {
        self.diagnostic != ExtractionDiagnostic::Extracted
    }

    /// Thumbnail data URL, if the extractor produced one.
    pub fn thumbnail(&self) -> Option<&str> {
        self.metadata.get("thumbnail").and_then(JsonValue::as_str)
    }

    /// Estimated duration in seconds (audio/video).
    pub fn duration_secs(&self) -> Option<u64> {
        self.metadata.get("duration").and_then(JsonValue::as_u64)
    }

    /// Transcription text (audio/video).
    pub fn transcription(&self) -> Option<&str> {
        self.metadata
            .get("transcription")
            .and_then(JsonValue::as_str)
    }
}

// =============================================================================
// SEGMENTATION & NOTES
// =============================================================================

/// One (title, content) pair produced by segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentedUnit {
    pub title: String,
    pub content: String,
}

impl SegmentedUnit {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// A note ready for the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub note_type: NoteType,
    pub tags: Vec<String>,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub summary: String,
    pub is_starred: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    pub source_file: String,
    pub extracted_from: String,
}

// =============================================================================
// AUDIO ANALYSIS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Narrative analysis of a transcription.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAnalysis {
    pub topics: Vec<String>,
    pub sentiment: Sentiment,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
    pub summary: String,
    /// Words per minute.
    pub speaking_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_category_display_roundtrip() {
        for category in FileCategory::ALL {
            let parsed: FileCategory = category.to_string().parse().unwrap();
            assert_eq!(parsed, category);
        }
        assert!("nope".parse::<FileCategory>().is_err());
    }

    #[test]
    fn test_category_note_type_map() {
        assert_eq!(FileCategory::Spreadsheet.note_type(), NoteType::Document);
        assert_eq!(FileCategory::Presentation.note_type(), NoteType::Document);
        assert_eq!(FileCategory::Code.note_type(), NoteType::Text);
        assert_eq!(FileCategory::Text.note_type(), NoteType::Text);
        assert_eq!(FileCategory::Image.note_type(), NoteType::Image);
        assert_eq!(FileCategory::Audio.note_type(), NoteType::Audio);
        assert_eq!(FileCategory::Video.note_type(), NoteType::Video);
        assert_eq!(FileCategory::Archive.note_type(), NoteType::Document);
        assert_eq!(FileCategory::Unknown.note_type(), NoteType::Document);
    }

    #[test]
    fn test_uploaded_file_new_sets_size() {
        let file = UploadedFile::new("a.txt", "text/plain", "hello".as_bytes().to_vec());
        assert_eq!(file.size, 5);
        assert_eq!(file.with_declared_size(99).size, 99);
    }

    #[test]
    fn test_uploaded_file_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"# Title\nbody").unwrap();

        let file = UploadedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "notes.md");
        assert_eq!(file.size, 12);
        assert_eq!(file.mime_type, "text/markdown");
    }

    #[test]
    fn test_uploaded_file_from_missing_path() {
        let err = UploadedFile::from_path("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_diagnostic_serialization() {
        let d = ExtractionDiagnostic::Failed {
            cause: "bad xref".into(),
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["kind"], "failed");
        assert_eq!(json["cause"], "bad xref");
        assert_eq!(d.to_string(), "failed: bad xref");
    }

    #[test]
    fn test_processed_file_flags() {
        let upload = UploadedFile::new("x.doc", "application/msword", Vec::new());
        let pf = ProcessedFile::new(
            &upload,
            FileCategory::Document,
            ExtractionResult::with_diagnostic(
                "unsupported",
                ExtractionDiagnostic::Unsupported {
                    reason: "legacy".into(),
                },
            ),
        );
        assert!(pf.is_degraded());
        assert!(!pf.is_failure());
    }

    #[test]
    fn test_processed_file_metadata_accessors() {
        let upload = UploadedFile::new("a.mp3", "audio/mpeg", vec![0u8; 10]);
        let result = ExtractionResult::extracted("body")
            .with_meta("duration", 42u64)
            .with_meta("transcription", "hello there")
            .with_meta("thumbnail", "data:image/png;base64,AAAA");
        let pf = ProcessedFile::new(&upload, FileCategory::Audio, result);
        assert_eq!(pf.duration_secs(), Some(42));
        assert_eq!(pf.transcription(), Some("hello there"));
        assert_eq!(pf.thumbnail(), Some("data:image/png;base64,AAAA"));
        assert!(!pf.is_degraded());
    }

    #[test]
    fn test_note_record_camel_case() {
        let now = Utc::now();
        let note = NoteRecord {
            id: "1-0-abc".into(),
            title: "T".into(),
            content: "C".into(),
            note_type: NoteType::Document,
            tags: vec!["uploads".into()],
            category: "Uploads".into(),
            created_at: now,
            updated_at: now,
            summary: "C".into(),
            is_starred: false,
            transcription: None,
            file_url: None,
            duration: None,
            source_file: "a.pdf".into(),
            extracted_from: "single note".into(),
        };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["type"], "document");
        assert_eq!(json["sourceFile"], "a.pdf");
        assert_eq!(json["extractedFrom"], "single note");
        assert_eq!(json["isStarred"], false);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("transcription").is_none());
    }

    #[test]
    fn test_audio_analysis_deserializes_camel_case() {
        let json = r#"{"topics":["a"],"sentiment":"positive","keyPoints":["k"],
            "actionItems":["x"],"summary":"s","speakingRate":140.5}"#;
        let a: AudioAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(a.sentiment, Sentiment::Positive);
        assert_eq!(a.key_points, vec!["k"]);
        assert_eq!(a.speaking_rate, 140.5);
    }
}
