//! Archive adapter. Archives are described, never decompressed.

use async_trait::async_trait;

use sift_core::{
    extension_of, ExtractionAdapter, ExtractionDiagnostic, ExtractionResult, FileCategory,
    Result, UploadedFile,
};

use crate::banner;

pub struct ArchiveAdapter;

fn format_label(ext: &str) -> &'static str {
    match ext {
        "zip" => "ZIP archive",
        "rar" => "RAR archive",
        "7z" => "7-Zip archive",
        "tar" => "Tape archive (tar)",
        "gz" | "tgz" => "Gzip-compressed archive",
        "bz2" => "Bzip2-compressed archive",
        "xz" => "XZ-compressed archive",
        _ => "Archive",
    }
}

#[async_trait]
impl ExtractionAdapter for ArchiveAdapter {
    fn category(&self) -> FileCategory {
        FileCategory::Archive
    }

    async fn extract(&self, file: &UploadedFile) -> Result<ExtractionResult> {
        let ext = extension_of(&file.name).unwrap_or_default();
        let format = format_label(&ext);
        let content = format!(
            "{}\nThe archive was not decompressed. Only its outer file is described here.\n{}",
            banner::header(
                "📦",
                "Archive",
                &file.name,
                &[
                    ("Format", format.to_string()),
                    ("Size", banner::format_size(file.size)),
                ],
            ),
            banner::hints(&["Extract the archive locally and upload the files you want as notes"])
        );

        Ok(ExtractionResult::with_diagnostic(
            content,
            ExtractionDiagnostic::Placeholder {
                reason: "archive contents are not inspected".to_string(),
            },
        )
        .with_meta("format", format)
        .with_meta("compressed_size", file.size))
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "archive"
    }
}
