//! Document adapter: PDF (page by page), DOCX (whole document), legacy DOC,
//! and ODT/RTF through pandoc.

use async_trait::async_trait;
use tracing::{debug, warn};

use sift_core::defaults::PDF_MIN_TEXT_CHARS;
use sift_core::{
    extension_of, Error, ExtractionAdapter, ExtractionDiagnostic, ExtractionResult, FileCategory,
    Result, UploadedFile,
};

use super::pandoc;
use crate::banner::{self, LEGACY_DOC_MESSAGE};

pub struct DocumentAdapter;

/// True when the PDF declares an encryption dictionary.
fn is_encrypted_pdf(data: &[u8]) -> bool {
    data.windows(b"/Encrypt".len()).any(|w| w == b"/Encrypt")
}

/// Extract per-page text. pdf-extract can panic on malformed fonts, so the
/// call is isolated with `catch_unwind`.
fn extract_pdf_pages(data: &[u8]) -> Result<Vec<String>> {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(data)
    })) {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(Error::Extraction(format!("PDF could not be parsed: {}", e))),
        Err(_) => Err(Error::Extraction(
            "PDF parser crashed, the file likely contains malformed fonts".to_string(),
        )),
    }
}

async fn extract_pdf(file: &UploadedFile) -> Result<ExtractionResult> {
    if is_encrypted_pdf(&file.data) {
        return Err(Error::Extraction("the PDF is password-protected".to_string()));
    }

    let data = file.data.clone();
    let pages = tokio::task::spawn_blocking(move || extract_pdf_pages(&data))
        .await
        .map_err(|e| Error::Internal(format!("PDF extraction task error: {}", e)))??;

    let page_count = pages.len();
    let text_chars: usize = pages.iter().map(|p| p.trim().chars().count()).sum();
    debug!(page_count, text_chars, "PDF text extracted");

    if text_chars < PDF_MIN_TEXT_CHARS {
        let content = format!(
            "{}\nNo extractable text was found. The PDF appears to contain only scanned images.\n{}",
            banner::header("📄", "PDF", &file.name, &[("Pages", page_count.to_string())]),
            banner::hints(&[
                "Run the document through OCR software and upload the result",
                "Or upload the page images directly",
            ])
        );
        return Ok(ExtractionResult::with_diagnostic(
            content,
            ExtractionDiagnostic::Empty {
                reason: "PDF has no text layer".to_string(),
            },
        )
        .with_meta("page_count", page_count));
    }

    let content = pages
        .iter()
        .enumerate()
        .map(|(i, page)| format!("--- Page {} ---\n{}", i + 1, page.trim()))
        .collect::<Vec<_>>()
        .join("\n\n");

    Ok(ExtractionResult::extracted(content)
        .with_meta("page_count", page_count)
        .with_meta("format", "pdf"))
}

fn push_run_text(run: &docx_rs::Run, out: &mut String) {
    for child in &run.children {
        match child {
            docx_rs::RunChild::Text(text) => out.push_str(&text.text),
            docx_rs::RunChild::Tab(_) => out.push('\t'),
            docx_rs::RunChild::Break(_) => out.push('\n'),
            _ => {}
        }
    }
}

fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut out = String::new();
    for child in &para.children {
        match child {
            docx_rs::ParagraphChild::Run(run) => push_run_text(run, &mut out),
            docx_rs::ParagraphChild::Hyperlink(link) => {
                for inner in &link.children {
                    if let docx_rs::ParagraphChild::Run(run) = inner {
                        push_run_text(run, &mut out);
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// Paragraphs separated by blank lines; table rows rendered as `a | b | c`.
fn docx_text(data: &[u8]) -> Result<String> {
    let doc = docx_rs::read_docx(data)
        .map_err(|e| Error::Extraction(format!("DOCX could not be parsed: {}", e)))?;

    let mut blocks: Vec<String> = Vec::new();
    for child in &doc.document.children {
        match child {
            docx_rs::DocumentChild::Paragraph(para) => {
                let text = paragraph_text(para);
                if !text.trim().is_empty() {
                    blocks.push(text.trim_end().to_string());
                }
            }
            docx_rs::DocumentChild::Table(table) => {
                let mut rows = Vec::new();
                for row in &table.rows {
                    let docx_rs::TableChild::TableRow(tr) = row;
                    let mut cells = Vec::new();
                    for cell in &tr.cells {
                        let docx_rs::TableRowChild::TableCell(tc) = cell;
                        let cell_text = tc
                            .children
                            .iter()
                            .filter_map(|c| match c {
                                docx_rs::TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                                _ => None,
                            })
                            .collect::<Vec<_>>()
                            .join(" ");
                        cells.push(cell_text.trim().to_string());
                    }
                    rows.push(cells.join(" | "));
                }
                if !rows.is_empty() {
                    blocks.push(rows.join("\n"));
                }
            }
            _ => {}
        }
    }
    Ok(blocks.join("\n\n"))
}

async fn extract_docx(file: &UploadedFile) -> Result<ExtractionResult> {
    let data = file.data.clone();
    let text = tokio::task::spawn_blocking(move || docx_text(&data))
        .await
        .map_err(|e| Error::Internal(format!("DOCX extraction task error: {}", e)))??;

    if text.trim().is_empty() {
        let content = format!(
            "{}\nThe document contains no text.",
            banner::header("📄", "Document", &file.name, &[])
        );
        return Ok(ExtractionResult::with_diagnostic(
            content,
            ExtractionDiagnostic::Empty {
                reason: "DOCX has no text".to_string(),
            },
        ));
    }

    let char_count = text.chars().count();
    Ok(ExtractionResult::extracted(text)
        .with_meta("format", "docx")
        .with_meta("char_count", char_count))
}

#[async_trait]
impl ExtractionAdapter for DocumentAdapter {
    fn category(&self) -> FileCategory {
        FileCategory::Document
    }

    async fn extract(&self, file: &UploadedFile) -> Result<ExtractionResult> {
        let ext = extension_of(&file.name).unwrap_or_default();
        match ext.as_str() {
            "pdf" => extract_pdf(file).await,
            "docx" => extract_docx(file).await,
            "doc" => Ok(ExtractionResult::with_diagnostic(
                LEGACY_DOC_MESSAGE,
                ExtractionDiagnostic::Unsupported {
                    reason: "legacy .doc format".to_string(),
                },
            )),
            "odt" | "rtf" => {
                let text = pandoc::to_plain_text(&file.data, &ext, &ext).await?;
                if text.trim().is_empty() {
                    warn!(file_name = %file.name, "Converted document is empty");
                }
                Ok(ExtractionResult::extracted(text)
                    .with_meta("format", ext.as_str())
                    .with_meta("converter", "pandoc"))
            }
            other => Err(Error::UnsupportedFormat(format!(
                "no document extractor for .{}",
                other
            ))),
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true) // PDF and DOCX are handled in-process
    }

    fn name(&self) -> &str {
        "document"
    }
}
