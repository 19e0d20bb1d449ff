//! File type classification by name extension.
//!
//! The extension table is an immutable process-wide constant. Every
//! extension appears under exactly one category; [`validate_extension_table`]
//! checks that invariant and the lookup index is built once on first use.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::{Error, FileCategory, Result};

/// Category -> recognized extensions, in lookup priority order.
const EXTENSION_TABLE: &[(FileCategory, &[&str])] = &[
    (
        FileCategory::Text,
        &[
            "txt", "md", "markdown", "log", "json", "xml", "yaml", "yml", "ini", "cfg", "conf",
        ],
    ),
    (FileCategory::Document, &["pdf", "doc", "docx", "odt", "rtf"]),
    (
        FileCategory::Spreadsheet,
        &["csv", "tsv", "xls", "xlsx", "ods"],
    ),
    (FileCategory::Presentation, &["ppt", "pptx", "odp", "key"]),
    (
        FileCategory::Image,
        &[
            "jpg", "jpeg", "png", "gif", "bmp", "webp", "svg", "tiff", "tif", "ico", "heic",
        ],
    ),
    (
        FileCategory::Audio,
        &["mp3", "wav", "ogg", "m4a", "aac", "flac", "wma", "opus", "weba"],
    ),
    (
        FileCategory::Video,
        &["mp4", "webm", "mov", "avi", "mkv", "wmv", "flv", "m4v"],
    ),
    (
        FileCategory::Code,
        &[
            "rs", "py", "js", "ts", "jsx", "tsx", "java", "c", "cpp", "h", "hpp", "cs", "go",
            "rb", "php", "swift", "kt", "scala", "sh", "bash", "sql", "html", "htm", "css",
            "scss", "lua", "r", "dart", "vue",
        ],
    ),
    (
        FileCategory::Archive,
        &["zip", "rar", "7z", "tar", "gz", "tgz", "bz2", "xz"],
    ),
];

static EXTENSION_INDEX: Lazy<HashMap<&'static str, FileCategory>> = Lazy::new(|| {
    let mut index = HashMap::new();
    for (category, extensions) in EXTENSION_TABLE {
        for ext in *extensions {
            // First category wins; duplicates are rejected by validation.
            index.entry(*ext).or_insert(*category);
        }
    }
    index
});

/// The full category -> extensions table.
pub fn extension_table() -> &'static [(FileCategory, &'static [&'static str])] {
    EXTENSION_TABLE
}

/// Check that no extension is registered under two categories.
pub fn validate_extension_table() -> Result<()> {
    let mut seen: HashMap<&str, FileCategory> = HashMap::new();
    let mut duplicates = Vec::new();
    for (category, extensions) in EXTENSION_TABLE {
        for ext in *extensions {
            if let Some(previous) = seen.insert(ext, *category) {
                duplicates.push(format!("{} ({} and {})", ext, previous, category));
            }
        }
    }

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "extension registered under multiple categories: {}",
            duplicates.join(", ")
        )))
    }
}

/// Lower-cased substring after the last `.`, or `None` if there is none.
pub fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

/// File name with its extension stripped.
pub fn base_name(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name,
    }
}

/// Classify a file by its name extension.
pub fn classify(name: &str) -> FileCategory {
    let category = extension_of(name)
        .and_then(|ext| EXTENSION_INDEX.get(ext.as_str()).copied())
        .unwrap_or(FileCategory::Unknown);
    tracing::trace!(file_name = %name, category = %category, "Classified file");
    category
}
