//! Content-derived tags from fixed keyword sets.

use sift_core::defaults::{LARGE_FILE_BYTES, SMALL_FILE_BYTES};

/// Topic tag and the keywords that trigger it.
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("meeting", &["meeting", "agenda"]),
    ("project", &["project", "task"]),
    ("research", &["research", "study"]),
    ("report", &["report", "analysis"]),
    ("presentation", &["presentation", "slide"]),
];

/// Size tags first, then topic tags in table order.
///
/// Keywords match as lowercase substrings, so `slides` and `tasks` count.
pub fn smart_tags(content: &str, size_bytes: u64) -> Vec<String> {
    let mut tags = Vec::new();
    if size_bytes > LARGE_FILE_BYTES {
        tags.push("large-file".to_string());
    } else if size_bytes < SMALL_FILE_BYTES {
        tags.push("small-file".to_string());
    }

    let lower = content.to_lowercase();
    tags.extend(
        TOPIC_KEYWORDS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
            .map(|(tag, _)| tag.to_string()),
    );
    tags
}

/// Lowercase, alphanumeric runs joined by `-`.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
