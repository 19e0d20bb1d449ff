//! Presentation adapter: slide text through pandoc (PPTX only).

use async_trait::async_trait;

use sift_core::{
    extension_of, Error, ExtractionAdapter, ExtractionDiagnostic, ExtractionResult, FileCategory,
    Result, UploadedFile,
};

use super::pandoc;
use crate::banner;

pub struct PresentationAdapter;

#[async_trait]
impl ExtractionAdapter for PresentationAdapter {
    fn category(&self) -> FileCategory {
        FileCategory::Presentation
    }

    async fn extract(&self, file: &UploadedFile) -> Result<ExtractionResult> {
        let ext = extension_of(&file.name).unwrap_or_default();
        if ext != "pptx" {
            return Err(Error::UnsupportedFormat(format!(
                "slide text cannot be extracted from .{} files",
                ext
            )));
        }
        if file.data.is_empty() {
            return Err(Error::InvalidInput("presentation file is empty".to_string()));
        }

        let text = pandoc::to_plain_text(&file.data, "pptx", "pptx").await?;
        let header = banner::header("📽️", "Presentation", &file.name, &[]);

        if text.trim().is_empty() {
            return Ok(ExtractionResult::with_diagnostic(
                format!("{}\nNo slide text was found.", header),
                ExtractionDiagnostic::Empty {
                    reason: "presentation has no text".to_string(),
                },
            ));
        }

        let char_count = text.chars().count();
        Ok(
            ExtractionResult::extracted(format!("{}\n\n{}", header, text.trim()))
                .with_meta("converter", "pandoc")
                .with_meta("char_count", char_count),
        )
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(pandoc::is_available().await)
    }

    fn name(&self) -> &str {
        "presentation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_keynote_is_unsupported() {
        let file = UploadedFile::new("talk.key", "application/octet-stream", "x");
        let err = PresentationAdapter.extract(&file).await.unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_empty_pptx_is_invalid() {
        let file = UploadedFile::new("deck.pptx", "application/octet-stream", "");
        let err = PresentationAdapter.extract(&file).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_corrupt_pptx_never_panics() {
        // Unsupported when pandoc is missing, Extraction when it rejects the bytes.
        let file = UploadedFile::new("deck.pptx", "application/octet-stream", "garbage");
        let err = PresentationAdapter.extract(&file).await.unwrap_err();
        assert!(matches!(
            err,
            Error::UnsupportedFormat(_) | Error::Extraction(_)
        ));
    }
}
