//! Fallback for unrecognized extensions: text if the bytes decode cleanly,
//! otherwise a binary-file banner.

use async_trait::async_trait;

use sift_core::{
    ExtractionAdapter, ExtractionDiagnostic, ExtractionResult, FileCategory, Result,
    UploadedFile,
};

use crate::banner;

pub struct UnknownAdapter;

/// Strict UTF-8 without NUL bytes.
fn decode_text(data: &[u8]) -> Option<&str> {
    if data.contains(&0) {
        return None;
    }
    std::str::from_utf8(data).ok()
}

#[async_trait]
impl ExtractionAdapter for UnknownAdapter {
    fn category(&self) -> FileCategory {
        FileCategory::Unknown
    }

    async fn extract(&self, file: &UploadedFile) -> Result<ExtractionResult> {
        if let Some(text) = decode_text(&file.data) {
            return Ok(ExtractionResult::extracted(text)
                .with_meta("decoded_as", "text")
                .with_meta("char_count", text.chars().count()));
        }

        let content = format!(
            "{}\nThe file does not contain readable text.\n{}",
            banner::header(
                "📎",
                "Binary file",
                &file.name,
                &[
                    ("Declared Type", file.mime_type.clone()),
                    ("Size", banner::format_size(file.size)),
                ],
            ),
            banner::hints(&["Convert the file to a supported format (text, PDF, image, audio, video)"])
        );
        Ok(ExtractionResult::with_diagnostic(
            content,
            ExtractionDiagnostic::Unsupported {
                reason: "binary content with an unrecognized extension".to_string(),
            },
        )
        .with_meta("decoded_as", "binary"))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "unknown"
    }
}
