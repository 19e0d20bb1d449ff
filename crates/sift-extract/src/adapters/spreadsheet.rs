//! Spreadsheet adapter: CSV/TSV parsed in-process, XLSX/XLS/ODS via calamine.
//!
//! Output is a summary banner with row/column counts and a bounded preview
//! of `Row k: {json}` lines keyed by the header row.

use std::io::Cursor;

use async_trait::async_trait;
use calamine::{open_workbook_auto_from_rs, Reader};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use sift_core::defaults::SPREADSHEET_PREVIEW_ROWS;
use sift_core::{
    extension_of, Error, ExtractionAdapter, ExtractionDiagnostic, ExtractionResult, FileCategory,
    Result, UploadedFile,
};

use crate::banner;

pub struct SpreadsheetAdapter;

/// Parse delimited text. Handles quoted fields, `""` escapes, and newlines
/// inside quotes. Rows with only empty cells are dropped.
pub fn parse_delimited(text: &str, delimiter: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    field.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                field.push(c);
            }
            continue;
        }
        match c {
            '"' if field.is_empty() => in_quotes = true,
            '\r' => {}
            '\n' => {
                row.push(std::mem::take(&mut field));
                rows.push(std::mem::take(&mut row));
            }
            c if c == delimiter => row.push(std::mem::take(&mut field)),
            c => field.push(c),
        }
    }
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows.retain(|r| r.iter().any(|cell| !cell.trim().is_empty()));
    rows
}

fn workbook_rows(data: Vec<u8>) -> Result<(Vec<Vec<String>>, Vec<String>)> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))
        .map_err(|e| Error::Extraction(format!("Spreadsheet could not be opened: {}", e)))?;
    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names
        .first()
        .ok_or_else(|| Error::Extraction("Workbook has no sheets".to_string()))?
        .clone();
    let range = workbook
        .worksheet_range(&first)
        .map_err(|e| Error::Extraction(format!("Sheet '{}' could not be read: {}", first, e)))?;

    let mut rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();
    rows.retain(|r: &Vec<String>| r.iter().any(|cell| !cell.trim().is_empty()));
    Ok((rows, sheet_names))
}

/// Unique, non-empty header names.
fn normalize_headers(raw: &[String], width: usize) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(width);
    for i in 0..width {
        let base = raw
            .get(i)
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| format!("Column {}", i + 1));
        let mut name = base.clone();
        let mut n = 2;
        while headers.contains(&name) {
            name = format!("{}_{}", base, n);
            n += 1;
        }
        headers.push(name);
    }
    headers
}

fn row_object(headers: &[String], row: &[String]) -> JsonValue {
    let mut obj = Map::new();
    for (i, header) in headers.iter().enumerate() {
        let value = row.get(i).map(|v| v.trim().to_string()).unwrap_or_default();
        obj.insert(header.clone(), JsonValue::String(value));
    }
    JsonValue::Object(obj)
}

/// Render the summary banner. `rows[0]` is the header row.
pub fn render_banner(name: &str, rows: &[Vec<String>]) -> (String, JsonValue) {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let headers = normalize_headers(rows.first().map(Vec::as_slice).unwrap_or(&[]), width);
    let data_rows = rows.get(1..).unwrap_or(&[]);
    let total = data_rows.len();

    let mut lines = vec![
        format!("📊 Spreadsheet: {}", name),
        format!("Total Rows: {}", total),
        format!("Columns: {} ({})", headers.len(), headers.join(", ")),
        format!("Preview (first {} rows):", SPREADSHEET_PREVIEW_ROWS),
    ];
    for (i, row) in data_rows.iter().take(SPREADSHEET_PREVIEW_ROWS).enumerate() {
        lines.push(format!("Row {}: {}", i + 1, row_object(&headers, row)));
    }
    if total > SPREADSHEET_PREVIEW_ROWS {
        lines.push(format!("... and {} more rows", total - SPREADSHEET_PREVIEW_ROWS));
    }

    let metadata = serde_json::json!({
        "row_count": total,
        "column_count": headers.len(),
        "columns": headers,
        "preview_rows": total.min(SPREADSHEET_PREVIEW_ROWS),
    });
    (lines.join("\n"), metadata)
}

#[async_trait]
impl ExtractionAdapter for SpreadsheetAdapter {
    fn category(&self) -> FileCategory {
        FileCategory::Spreadsheet
    }

    async fn extract(&self, file: &UploadedFile) -> Result<ExtractionResult> {
        let ext = extension_of(&file.name).unwrap_or_default();
        let (rows, sheets) = match ext.as_str() {
            "csv" => (parse_delimited(&String::from_utf8_lossy(&file.data), ','), Vec::new()),
            "tsv" => (parse_delimited(&String::from_utf8_lossy(&file.data), '\t'), Vec::new()),
            _ => {
                let data = file.data.to_vec();
                tokio::task::spawn_blocking(move || workbook_rows(data))
                    .await
                    .map_err(|e| Error::Internal(format!("Spreadsheet task error: {}", e)))??
            }
        };
        debug!(row_count = rows.len(), sheet_count = sheets.len(), "Spreadsheet parsed");

        if rows.is_empty() {
            let content = format!(
                "{}\nThe spreadsheet contains no data.",
                banner::header("📊", "Spreadsheet", &file.name, &[("Total Rows", "0".to_string())])
            );
            return Ok(ExtractionResult::with_diagnostic(
                content,
                ExtractionDiagnostic::Empty {
                    reason: "no rows".to_string(),
                },
            ));
        }

        let (content, metadata) = render_banner(&file.name, &rows);
        let mut result = ExtractionResult::extracted(content);
        result.metadata = metadata;
        if !sheets.is_empty() {
            result = result
                .with_meta("sheet_count", sheets.len())
                .with_meta("sheets", sheets);
        }
        Ok(result)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    fn name(&self) -> &str {
        "spreadsheet"
    }
}
