//! MIME type detection for uploads read from disk.
//!
//! Detection order:
//! 1. Magic bytes via `infer`
//! 2. Extension table
//! 3. `application/octet-stream`
//!
//! The declared MIME type only feeds heuristics (media bitrate), never
//! classification, so a best-effort guess is enough.

use crate::classifier::extension_of;

/// Fallback MIME type when nothing else matches.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Detect a content type from the file's bytes and name.
pub fn detect_content_type(filename: &str, data: &[u8]) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }

    extension_of(filename)
        .and_then(|ext| mime_from_extension(&ext))
        .unwrap_or(OCTET_STREAM)
        .to_string()
}

/// The MIME subtype (`audio/webm;codecs=opus` -> `webm`), lower-cased.
pub fn mime_subtype(mime: &str) -> String {
    let essence = mime.split(';').next().unwrap_or(mime).trim();
    essence
        .split_once('/')
        .map(|(_, sub)| sub)
        .unwrap_or(essence)
        .to_ascii_lowercase()
}

fn mime_from_extension(ext: &str) -> Option<&'static str> {
    match ext {
        // Plain text
        "txt" | "log" | "ini" | "cfg" | "conf" => Some("text/plain"),
        "md" | "markdown" => Some("text/markdown"),
        "json" => Some("application/json"),
        "xml" => Some("application/xml"),
        "yaml" | "yml" => Some("application/yaml"),
        "csv" => Some("text/csv"),
        "tsv" => Some("text/tab-separated-values"),
        "html" | "htm" => Some("text/html"),
        "css" => Some("text/css"),
        // Code
        "rs" => Some("text/x-rust"),
        "py" => Some("text/x-python"),
        "js" => Some("text/javascript"),
        "ts" | "tsx" => Some("text/typescript"),
        "sh" | "bash" => Some("text/x-shellscript"),
        "sql" => Some("application/sql"),
        // Documents
        "pdf" => Some("application/pdf"),
        "doc" => Some("application/msword"),
        "docx" => Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
        "xlsx" => Some("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        "xls" => Some("application/vnd.ms-excel"),
        "pptx" => Some("application/vnd.openxmlformats-officedocument.presentationml.presentation"),
        "rtf" => Some("application/rtf"),
        // Audio
        "mp3" => Some("audio/mpeg"),
        "wav" => Some("audio/wav"),
        "ogg" | "opus" => Some("audio/ogg"),
        "m4a" => Some("audio/mp4"),
        "aac" => Some("audio/aac"),
        "flac" => Some("audio/flac"),
        "weba" => Some("audio/webm"),
        // Video
        "mp4" | "m4v" => Some("video/mp4"),
        "webm" => Some("video/webm"),
        "mov" => Some("video/quicktime"),
        "mkv" => Some("video/x-matroska"),
        "avi" => Some("video/x-msvideo"),
        // Images
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        // Archives
        "zip" => Some("application/zip"),
        "gz" | "tgz" => Some("application/gzip"),
        "tar" => Some("application/x-tar"),
        "7z" => Some("application/x-7z-compressed"),
        _ => None,
    }
}
