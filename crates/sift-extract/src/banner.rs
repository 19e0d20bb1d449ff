//! Content envelopes: header blocks and error banners.
//!
//! Banners are plain text with no blank lines and no list markers, so the
//! segmentation cascade always keeps a banner together as a single note.

use sift_core::FileCategory;

/// Fixed content for legacy Word files.
pub const LEGACY_DOC_MESSAGE: &str = "Legacy .doc files are not supported. \
Please convert the document to .docx or PDF and upload it again.";

/// Hint line prefix. Deliberately not `-`, `*` or `•`.
const HINT: &str = "  › ";

/// Human-readable byte size (`512 B`, `1.5 KB`, `2.0 MB`).
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let b = bytes as f64;
    if b >= GB {
        format!("{:.1} GB", b / GB)
    } else if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// `m:ss`, or `h:mm:ss` past an hour.
pub fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

/// Header line plus `Key: value` lines.
pub fn header(icon: &str, label: &str, name: &str, fields: &[(&str, String)]) -> String {
    let mut out = format!("{} {}: {}", icon, label, name);
    for (key, value) in fields {
        out.push('\n');
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
    }
    out
}

/// Indented hint lines.
pub fn hints(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|l| format!("{}{}", HINT, l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remediation hints for a failed extraction, by category.
fn remediation(category: FileCategory) -> &'static [&'static str] {
    match category {
        FileCategory::Document => &[
            "If the document is password-protected, remove the protection and upload it again",
            "Re-export the file from its original application (PDF or DOCX)",
            "Copy the text into a .txt file as a last resort",
        ],
        FileCategory::Spreadsheet => &[
            "Save the sheet as CSV and upload it again",
            "Check that the file is not password-protected or corrupted",
        ],
        FileCategory::Presentation => &[
            "Export the slides as PDF and upload the PDF instead",
            "Install pandoc to enable slide text extraction",
        ],
        FileCategory::Image => &[
            "Convert the image to PNG or JPEG and upload it again",
            "Check that the file is a complete, uncorrupted image",
        ],
        FileCategory::Audio | FileCategory::Video => &[
            "Convert the recording to MP3, WAV or MP4 and upload it again",
        ],
        FileCategory::Text | FileCategory::Code => &[
            "Save the file with UTF-8 encoding and upload it again",
        ],
        FileCategory::Archive => &["Extract the archive locally and upload the individual files"],
        FileCategory::Unknown => &["Convert the file to a supported format (text, PDF, image, audio, video)"],
    }
}

/// Banner for a true extraction failure.
pub fn failure_banner(name: &str, category: FileCategory, cause: &str) -> String {
    format!(
        "⚠️ Could not extract content from {}\nType: {}\nReason: {}\nSuggestions:\n{}",
        name,
        category,
        cause,
        hints(remediation(category))
    )
}

/// Banner for a recognized but unsupported format.
pub fn unsupported_banner(name: &str, category: FileCategory, reason: &str) -> String {
    format!(
        "⚠️ Unsupported file: {}\nType: {}\nReason: {}\nSuggestions:\n{}",
        name,
        category,
        reason,
        hints(remediation(category))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(2 * 1024 * 1024), "2.0 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(5), "0:05");
        assert_eq!(format_duration(83), "1:23");
        assert_eq!(format_duration(3723), "1:02:03");
    }

    #[test]
    fn test_header() {
        let h = header("📄", "PDF", "a.pdf", &[("Pages", "3".to_string())]);
        assert_eq!(h, "📄 PDF: a.pdf\nPages: 3");
    }

    #[test]
    fn test_failure_banner_has_no_blank_lines_or_list_markers() {
        for category in FileCategory::ALL {
            let banner = failure_banner("x.bin", category, "boom");
            assert!(!banner.contains("\n\n"));
            for line in banner.lines() {
                let t = line.trim_start();
                assert!(!t.starts_with("- ") && !t.starts_with("* ") && !t.starts_with("• "));
                assert!(!t.starts_with('#'));
            }
            assert!(banner.contains("Reason: boom"));
        }
    }

    #[test]
    fn test_legacy_doc_message() {
        assert!(LEGACY_DOC_MESSAGE.starts_with("Legacy .doc files are not supported"));
    }
}
