//! Plain text, Markdown and structured text files, passed through as-is.

use async_trait::async_trait;

use sift_core::{ExtractionAdapter, ExtractionResult, FileCategory, Result, UploadedFile};

/// Content is the upload decoded as UTF-8. Invalid sequences become U+FFFD
/// and `lossy` is set in the metadata.
pub struct TextAdapter;

#[async_trait]
impl ExtractionAdapter for TextAdapter {
    fn category(&self) -> FileCategory {
        FileCategory::Text
    }

    async fn extract(&self, file: &UploadedFile) -> Result<ExtractionResult> {
        let (text, lossy) = match std::str::from_utf8(&file.data) {
            Ok(text) => (text.to_string(), false),
            Err(_) => (String::from_utf8_lossy(&file.data).into_owned(), true),
        };
        let char_count = text.chars().count();
        let line_count = text.lines().count();

        Ok(ExtractionResult::extracted(text)
            .with_meta("char_count", char_count)
            .with_meta("line_count", line_count)
            .with_meta("lossy", lossy))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "text"
    }
}
