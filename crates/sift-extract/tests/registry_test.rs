//! Integration tests for extraction dispatch.
//!
//! Covers:
//! - Every category dispatches to an adapter and never panics on junk input
//! - Legacy .doc yields the fixed message with no error
//! - CSV and XLSX banner counts and preview bounds
//! - A PDF without a text layer gets the explanatory banner
//! - Media collaborators attached through the registry

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lopdf::{dictionary, Document, Object, Stream};
use rust_xlsxwriter::Workbook;
use sift_core::{ExtractionDiagnostic, FileCategory, UploadedFile};
use sift_extract::{ExtractionRegistry, LEGACY_DOC_MESSAGE};
use sift_inference::mock::{MockGenerationBackend, MockTranscriptionBackend};

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([20, 20, 20])))
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("encode png");
    buf
}

/// One blank page, no text operators.
fn blank_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => dictionary! {},
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("write pdf");
    buf
}

fn roster_xlsx(rows: u32) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Roster").expect("sheet name");
    sheet.write_string(0, 0, "name").expect("header");
    sheet.write_string(0, 1, "team").expect("header");
    for r in 1..=rows {
        sheet.write_string(r, 0, format!("Member {}", r)).expect("cell");
        sheet.write_string(r, 1, "Ops").expect("cell");
    }
    workbook.save_to_buffer().expect("write xlsx")
}

#[tokio::test]
async fn test_pdf_without_text_layer_is_empty() {
    let registry = ExtractionRegistry::new();
    let processed = registry
        .extract(&UploadedFile::new("scan.pdf", "application/pdf", blank_pdf()))
        .await;

    assert_eq!(processed.category, FileCategory::Document);
    assert!(
        matches!(processed.diagnostic, ExtractionDiagnostic::Empty { .. }),
        "unexpected diagnostic: {}",
        processed.diagnostic
    );
    assert!(processed.content.starts_with("📄 PDF: scan.pdf"));
    assert!(processed.content.contains("Pages: 1"));
    assert!(processed.content.contains("No extractable text was found"));
    assert_eq!(processed.metadata["page_count"], 1);
}

#[tokio::test]
async fn test_xlsx_banner_and_preview() {
    let registry = ExtractionRegistry::new();
    let processed = registry
        .extract(&UploadedFile::new(
            "roster.xlsx",
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            roster_xlsx(12),
        ))
        .await;

    assert_eq!(processed.diagnostic, ExtractionDiagnostic::Extracted);
    assert!(processed.content.contains("Total Rows: 12"));
    assert!(processed.content.contains("Columns: 2 (name, team)"));
    let rows: Vec<&str> = processed
        .content
        .lines()
        .filter(|l| l.starts_with("Row "))
        .collect();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0], r#"Row 1: {"name":"Member 1","team":"Ops"}"#);
    assert!(processed.content.ends_with("... and 2 more rows"));
    assert_eq!(processed.metadata["sheets"][0], "Roster");
}

#[tokio::test]
async fn test_legacy_doc_message_exact() {
    let registry = ExtractionRegistry::new();
    let file = UploadedFile::new("minutes.doc", "application/msword", vec![0xD0, 0xCF, 0x11, 0xE0]);
    let processed = registry.extract(&file).await;

    assert_eq!(processed.category, FileCategory::Document);
    assert_eq!(processed.content, LEGACY_DOC_MESSAGE);
    assert!(!processed.is_failure());
}

#[tokio::test]
async fn test_csv_banner_bounds_preview() {
    let mut csv = String::from("item,qty\n");
    for i in 1..=15 {
        csv.push_str(&format!("widget {},{}\n", i, i * 2));
    }
    let registry = ExtractionRegistry::new();
    let processed = registry
        .extract(&UploadedFile::new("stock.csv", "text/csv", csv))
        .await;

    assert_eq!(processed.category, FileCategory::Spreadsheet);
    assert!(processed.content.contains("Total Rows: 15"));
    assert_eq!(
        processed.content.lines().filter(|l| l.starts_with("Row ")).count(),
        10
    );
}

#[tokio::test]
async fn test_image_thumbnail_and_category() {
    let registry = ExtractionRegistry::new();
    let processed = registry
        .extract(&UploadedFile::new("photo.PNG", "image/png", png(300, 100)))
        .await;

    assert_eq!(processed.category, FileCategory::Image);
    assert!(processed.content.contains("Dimensions: 300 × 100 pixels"));
    assert!(processed.content.contains("Brightness: Dark"));
    assert!(processed.thumbnail().unwrap().starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_junk_bytes_never_escape_dispatch() {
    let registry = ExtractionRegistry::new();
    let junk = vec![0u8, 1, 2, 3, 255, 254];
    for name in [
        "a.txt", "a.pdf", "a.docx", "a.xlsx", "a.pptx", "a.png", "a.mp3", "a.mp4", "a.rs",
        "a.zip", "a.xyz", "noextension",
    ] {
        let processed = registry
            .extract(&UploadedFile::new(name, "application/octet-stream", junk.clone()))
            .await;
        assert_eq!(processed.name, name);
        assert!(!processed.content.is_empty(), "{} produced empty content", name);
    }
}

#[tokio::test]
async fn test_audio_with_collaborators() {
    let registry = ExtractionRegistry::new()
        .with_transcriber(Arc::new(MockTranscriptionBackend::new(
            "Quarterly meeting notes. We should review the budget.",
        )))
        .with_analyzer(Arc::new(MockGenerationBackend::new().with_response("not json at all")));

    let file = UploadedFile::new("standup.m4a", "audio/mp4", vec![0u8; 64]).with_declared_size(960_000);
    let processed = registry.extract(&file).await;

    assert_eq!(processed.category, FileCategory::Audio);
    assert_eq!(processed.diagnostic, ExtractionDiagnostic::Extracted);
    assert_eq!(
        processed.transcription(),
        Some("Quarterly meeting notes. We should review the budget.")
    );
    assert_eq!(processed.duration_secs(), Some(60));
    assert_eq!(processed.metadata["analysis"]["summary"], "not json at all");
}

#[tokio::test]
async fn test_analysis_disabled_through_registry() {
    let registry = ExtractionRegistry::new()
        .with_transcriber(Arc::new(MockTranscriptionBackend::new("We will ship on Friday.")))
        .with_analysis_enabled(false);
    let processed = registry
        .extract(&UploadedFile::new("memo.mp3", "audio/mpeg", vec![0u8; 64]))
        .await;
    assert!(processed.metadata.get("analysis").is_none());
}
