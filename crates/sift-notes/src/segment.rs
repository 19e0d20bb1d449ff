//! Segmentation cascade.
//!
//! Splits normalized text into `(title, content)` units. Strategies are
//! evaluated strictly in [`CASCADE`] order and the first one that produces
//! units is applied exclusively. A strategy whose precondition holds but whose
//! filters drop every unit falls through to the next one.
//!
//! | # | Strategy            | Fires when                                   |
//! |---|---------------------|----------------------------------------------|
//! | 1 | `markdown_headings` | 2+ lines start with 1-6 `#` and text          |
//! | 2 | `numbered_sections` | splitting on `N. ` gives more than 2 segments |
//! | 3 | `paragraphs`        | more than 1 blank-line paragraph over 50 chars|
//! | 4 | `bullets`           | splitting on `-`/`*`/`•` gives more than 2    |
//! | 5 | `rows`              | text contains `Row 1:` or `Columns:`          |
//! | 6 | `chunks`            | text is over 1000 characters                  |
//! | 7 | `single`            | always                                        |
//!
//! No strategy uses randomness, so segmenting the same text twice yields
//! identical units.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value as JsonValue;
use tracing::{debug, trace};

use sift_core::base_name;
use sift_core::defaults::{
    CHUNK_SIZE_CHARS, CHUNK_THRESHOLD_CHARS, FALLBACK_TITLE, HEADING_SECTION_MIN_CHARS,
    PARAGRAPH_MIN_CHARS, SECTION_MIN_CHARS, TITLE_MAX_CHARS,
};
use sift_core::SegmentedUnit;

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#{1,6}[ \t]+(.+)$").expect("valid regex"));
static NUMBERED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\d+\.\s+").expect("valid regex"));
static PARAGRAPH_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid regex"));
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-*•]\s+").expect("valid regex"));
static ROW_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^Row (\d+):[ \t]*(.*)$").expect("valid regex"));

/// One heuristic in the cascade.
pub trait SegmentStrategy: Send + Sync {
    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Units for `text`, or `None` when the precondition does not hold or
    /// every candidate unit was filtered out.
    fn apply(&self, text: &str, file_name: &str) -> Option<Vec<SegmentedUnit>>;
}

/// Result of running the cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    /// Name of the strategy that fired.
    pub strategy: &'static str,
    pub units: Vec<SegmentedUnit>,
}

/// Strategies in priority order.
pub static CASCADE: &[&dyn SegmentStrategy] = &[
    &MarkdownHeadings,
    &NumberedSections,
    &ParagraphBlocks,
    &BulletList,
    &TabularRows,
    &FixedChunks,
    &SingleUnit,
];

/// Segment text, returning only the units.
pub fn segment(text: &str, file_name: &str) -> Vec<SegmentedUnit> {
    segment_with_strategy(text, file_name).units
}

/// Segment text and report which strategy produced the units.
pub fn segment_with_strategy(text: &str, file_name: &str) -> Segmentation {
    let segmentation = CASCADE
        .iter()
        .find_map(|strategy| {
            strategy.apply(text, file_name).map(|units| Segmentation {
                strategy: strategy.name(),
                units,
            })
        })
        .unwrap_or_else(|| Segmentation {
            strategy: SingleUnit.name(),
            units: SingleUnit::units(text, file_name),
        });

    debug!(
        file_name = %file_name,
        strategy = segmentation.strategy,
        unit_count = segmentation.units.len(),
        "Segmentation strategy applied"
    );
    for (i, unit) in segmentation.units.iter().enumerate() {
        trace!(index = i + 1, title = %unit.title, content_len = unit.content.len(), "Segmented unit");
    }
    segmentation
}

/// Truncate to [`TITLE_MAX_CHARS`] characters, appending `…` when cut.
pub fn truncate_title(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() > TITLE_MAX_CHARS {
        let head: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}…", head.trim_end())
    } else {
        trimmed.to_string()
    }
}

/// Truncated first line of a segment, or the fallback when it is blank.
fn first_line_title(segment: &str, fallback: impl FnOnce() -> String) -> String {
    let title = truncate_title(segment.trim().lines().next().unwrap_or(""));
    if title.is_empty() {
        fallback()
    } else {
        title
    }
}

fn non_empty(units: Vec<SegmentedUnit>) -> Option<Vec<SegmentedUnit>> {
    if units.is_empty() {
        None
    } else {
        Some(units)
    }
}

/// Shared by numbered sections and bullets: split on a line marker, skip the
/// preamble, keep segments whose content exceeds [`SECTION_MIN_CHARS`].
fn marker_units(marker: &Regex, text: &str, label: &str) -> Option<Vec<SegmentedUnit>> {
    let segments: Vec<&str> = marker.split(text).collect();
    if segments.len() <= 2 {
        return None;
    }
    let units = segments[1..]
        .iter()
        .enumerate()
        .filter_map(|(i, segment)| {
            let content = segment.trim();
            if content.chars().count() <= SECTION_MIN_CHARS {
                return None;
            }
            let title = first_line_title(content, || format!("{} {}", label, i + 1));
            Some(SegmentedUnit::new(title, content))
        })
        .collect();
    non_empty(units)
}

pub struct MarkdownHeadings;

impl SegmentStrategy for MarkdownHeadings {
    fn name(&self) -> &'static str {
        "markdown_headings"
    }

    fn apply(&self, text: &str, _file_name: &str) -> Option<Vec<SegmentedUnit>> {
        let headings: Vec<(usize, usize, &str)> = HEADING_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let line = caps.get(0)?;
                let title = caps.get(1)?;
                Some((line.start(), line.end(), title.as_str().trim()))
            })
            .collect();
        if headings.len() < 2 {
            return None;
        }

        // Text before the first heading is discarded.
        let units = headings
            .iter()
            .enumerate()
            .filter_map(|(i, &(start, end, title))| {
                let next = headings.get(i + 1).map_or(text.len(), |h| h.0);
                if text[start..next].trim().chars().count() < HEADING_SECTION_MIN_CHARS {
                    return None;
                }
                let title = if title.is_empty() {
                    format!("Section {}", i + 1)
                } else {
                    title.to_string()
                };
                Some(SegmentedUnit::new(title, text[end..next].trim()))
            })
            .collect();
        non_empty(units)
    }
}

pub struct NumberedSections;

impl SegmentStrategy for NumberedSections {
    fn name(&self) -> &'static str {
        "numbered_sections"
    }

    fn apply(&self, text: &str, _file_name: &str) -> Option<Vec<SegmentedUnit>> {
        marker_units(&NUMBERED_RE, text, "Section")
    }
}

pub struct ParagraphBlocks;

impl SegmentStrategy for ParagraphBlocks {
    fn name(&self) -> &'static str {
        "paragraphs"
    }

    fn apply(&self, text: &str, file_name: &str) -> Option<Vec<SegmentedUnit>> {
        let paragraphs: Vec<&str> = PARAGRAPH_BREAK_RE
            .split(text)
            .map(str::trim)
            .filter(|p| p.chars().count() > PARAGRAPH_MIN_CHARS)
            .collect();
        if paragraphs.len() <= 1 {
            return None;
        }
        Some(
            paragraphs
                .into_iter()
                .enumerate()
                .map(|(i, paragraph)| {
                    let title =
                        first_line_title(paragraph, || format!("Note {} from {}", i + 1, file_name));
                    SegmentedUnit::new(title, paragraph)
                })
                .collect(),
        )
    }
}

pub struct BulletList;

impl SegmentStrategy for BulletList {
    fn name(&self) -> &'static str {
        "bullets"
    }

    fn apply(&self, text: &str, _file_name: &str) -> Option<Vec<SegmentedUnit>> {
        marker_units(&BULLET_RE, text, "Item")
    }
}

pub struct TabularRows;

impl TabularRows {
    fn display_value(value: &JsonValue) -> String {
        match value {
            JsonValue::String(s) => s.clone(),
            JsonValue::Null => String::new(),
            other => other.to_string(),
        }
    }

    fn row_unit(number: &str, payload: &str) -> SegmentedUnit {
        match serde_json::from_str::<JsonValue>(payload) {
            Ok(JsonValue::Object(fields)) if !fields.is_empty() => {
                let title = fields
                    .values()
                    .next()
                    .map(|v| truncate_title(&Self::display_value(v)))
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| format!("Row {}", number));
                let content = fields
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, Self::display_value(value)))
                    .collect::<Vec<_>>()
                    .join("\n");
                SegmentedUnit::new(title, content)
            }
            _ => SegmentedUnit::new(format!("Row {}", number), payload),
        }
    }
}

impl SegmentStrategy for TabularRows {
    fn name(&self) -> &'static str {
        "rows"
    }

    fn apply(&self, text: &str, _file_name: &str) -> Option<Vec<SegmentedUnit>> {
        if !text.contains("Row 1:") && !text.contains("Columns:") {
            return None;
        }
        let units = ROW_LINE_RE
            .captures_iter(text)
            .map(|caps| {
                let number = caps.get(1).map_or("", |m| m.as_str());
                let payload = caps.get(2).map_or("", |m| m.as_str().trim());
                Self::row_unit(number, payload)
            })
            .collect();
        non_empty(units)
    }
}

pub struct FixedChunks;

impl SegmentStrategy for FixedChunks {
    fn name(&self) -> &'static str {
        "chunks"
    }

    fn apply(&self, text: &str, file_name: &str) -> Option<Vec<SegmentedUnit>> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() <= CHUNK_THRESHOLD_CHARS {
            return None;
        }
        Some(
            chars
                .chunks(CHUNK_SIZE_CHARS)
                .enumerate()
                .map(|(i, chunk)| {
                    let content: String = chunk.iter().collect();
                    let title =
                        first_line_title(&content, || format!("Part {} from {}", i + 1, file_name));
                    SegmentedUnit::new(title, content)
                })
                .collect(),
        )
    }
}

pub struct SingleUnit;

impl SingleUnit {
    fn units(text: &str, file_name: &str) -> Vec<SegmentedUnit> {
        let stem = base_name(file_name).trim();
        let title = if stem.is_empty() { FALLBACK_TITLE } else { stem };
        vec![SegmentedUnit::new(title, text)]
    }
}

impl SegmentStrategy for SingleUnit {
    fn name(&self) -> &'static str {
        "single"
    }

    fn apply(&self, text: &str, file_name: &str) -> Option<Vec<SegmentedUnit>> {
        Some(Self::units(text, file_name))
    }
}
