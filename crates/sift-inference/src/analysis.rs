//! Narrative analysis of audio/video transcriptions.
//!
//! The generation backend is asked for a JSON object. Anything it gets wrong
//! is filled in by keyword heuristics, so an analysis is always produced:
//!
//! | Backend outcome        | Result                                          |
//! |------------------------|-------------------------------------------------|
//! | valid JSON             | parsed fields, heuristics for missing fields    |
//! | unparseable text       | raw text as `summary`, heuristics for the rest  |
//! | error / no backend     | fully heuristic                                 |

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

use sift_core::{defaults, AudioAnalysis, GenerationBackend, Sentiment};

const SYSTEM_PROMPT: &str = "You analyze transcripts of voice notes and recordings. \
Respond with a single JSON object and nothing else.";

/// Topic label -> trigger keywords.
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "business",
        &["business", "revenue", "sales", "market", "customer", "client", "budget"],
    ),
    (
        "technology",
        &["software", "code", "system", "technology", "data", "app", "computer"],
    ),
    (
        "meeting",
        &["meeting", "agenda", "discuss", "discussion", "team", "schedule"],
    ),
    (
        "project",
        &["project", "task", "deadline", "milestone", "deliverable", "plan"],
    ),
    (
        "education",
        &["learn", "study", "research", "course", "lesson", "class"],
    ),
    (
        "health",
        &["health", "doctor", "exercise", "medical", "sleep", "diet"],
    ),
    (
        "personal",
        &["family", "friend", "home", "weekend", "vacation", "birthday"],
    ),
];

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "happy", "love", "amazing", "wonderful", "success",
    "successful", "excited", "glad", "awesome", "positive", "progress", "win",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "sad", "hate", "problem", "issue", "fail", "failed",
    "failure", "worried", "angry", "negative", "delay", "risk",
];

static ACTION_ITEM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:need to|needs to|should|must|will|going to)\s+[^.!?\n]+")
        .expect("valid regex")
});

static SENTENCE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// Build the analysis prompt for a transcription.
pub fn build_analysis_prompt(transcription: &str) -> String {
    format!(
        "Analyze the following transcription and respond with JSON containing these fields:\n\
         - \"topics\": array of short topic strings\n\
         - \"sentiment\": one of \"positive\", \"negative\", \"neutral\"\n\
         - \"keyPoints\": array of the most important points\n\
         - \"actionItems\": array of tasks or commitments mentioned\n\
         - \"summary\": a two or three sentence summary\n\
         - \"speakingRate\": estimated words per minute (number)\n\n\
         Transcription:\n{}",
        transcription.trim()
    )
}

/// Lenient mirror of [`AudioAnalysis`]: every field optional.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    topics: Option<Vec<String>>,
    sentiment: Option<String>,
    key_points: Option<Vec<String>>,
    action_items: Option<Vec<String>>,
    summary: Option<String>,
    speaking_rate: Option<f64>,
}

/// Parse a model response, filling gaps from the heuristics.
pub fn parse_analysis_response(
    response: &str,
    transcription: &str,
    duration_secs: u64,
) -> AudioAnalysis {
    let fallback = heuristic_analysis(transcription, duration_secs);

    let Some(raw) = extract_json_object(response)
        .and_then(|json| serde_json::from_str::<RawAnalysis>(json).ok())
    else {
        debug!(
            response_len = response.len(),
            "Analysis response is not JSON, using it as summary"
        );
        let summary = response.trim();
        return AudioAnalysis {
            summary: if summary.is_empty() {
                fallback.summary.clone()
            } else {
                summary.to_string()
            },
            ..fallback
        };
    };

    let sentiment = raw
        .sentiment
        .as_deref()
        .and_then(parse_sentiment)
        .unwrap_or(fallback.sentiment);

    AudioAnalysis {
        topics: non_empty(raw.topics).unwrap_or(fallback.topics),
        sentiment,
        key_points: non_empty(raw.key_points).unwrap_or(fallback.key_points),
        action_items: raw.action_items.unwrap_or(fallback.action_items),
        summary: raw
            .summary
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(fallback.summary),
        speaking_rate: raw
            .speaking_rate
            .filter(|r| r.is_finite() && *r >= 0.0)
            .unwrap_or(fallback.speaking_rate),
    }
}

/// Keyword/regex analysis used when no model answer is usable.
pub fn heuristic_analysis(transcription: &str, duration_secs: u64) -> AudioAnalysis {
    let lower = transcription.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| !w.is_empty())
        .collect();
    let word_set: HashSet<&str> = words.iter().copied().collect();

    let mut topics: Vec<String> = TOPIC_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| word_set.contains(k)))
        .map(|(topic, _)| topic.to_string())
        .collect();
    if topics.is_empty() {
        topics.push("general".to_string());
    }

    let positive = words.iter().filter(|w| POSITIVE_WORDS.contains(w)).count();
    let negative = words.iter().filter(|w| NEGATIVE_WORDS.contains(w)).count();
    let sentiment = match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    };

    let sentences = split_sentences(transcription);
    let key_points: Vec<String> = sentences
        .iter()
        .filter(|s| s.chars().count() > 20)
        .take(defaults::ANALYSIS_KEY_POINTS)
        .cloned()
        .collect();

    let mut action_items: Vec<String> = Vec::new();
    for m in ACTION_ITEM_RE.find_iter(transcription) {
        let item = m.as_str().trim().to_string();
        if !action_items.contains(&item) {
            action_items.push(item);
        }
        if action_items.len() >= defaults::ANALYSIS_ACTION_ITEMS {
            break;
        }
    }

    let summary = sentences
        .iter()
        .take(2)
        .map(|s| format!("{}.", s))
        .collect::<Vec<_>>()
        .join(" ");

    let speaking_rate = if duration_secs > 0 {
        let wpm = words.len() as f64 / (duration_secs as f64 / 60.0);
        (wpm * 10.0).round() / 10.0
    } else {
        0.0
    };

    AudioAnalysis {
        topics,
        sentiment,
        key_points,
        action_items,
        summary,
        speaking_rate,
    }
}

/// Ask the backend for an analysis, degrading to heuristics on any failure.
pub async fn analyze(
    backend: Option<&dyn GenerationBackend>,
    transcription: &str,
    duration_secs: u64,
) -> AudioAnalysis {
    let Some(backend) = backend else {
        return heuristic_analysis(transcription, duration_secs);
    };

    let prompt = build_analysis_prompt(transcription);
    match backend.generate_with_system(SYSTEM_PROMPT, &prompt).await {
        Ok(response) => parse_analysis_response(&response, transcription, duration_secs),
        Err(e) => {
            warn!(
                model = backend.model_name(),
                error = %e,
                "Transcription analysis failed, using heuristics"
            );
            heuristic_analysis(transcription, duration_secs)
        }
    }
}

fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_END_RE
        .split(text)
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Slice from the first `{` to the last `}`; tolerates ```json fences and chatter.
fn extract_json_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end > start).then(|| &response[start..=end])
}

fn parse_sentiment(s: &str) -> Option<Sentiment> {
    match s.trim().to_lowercase().as_str() {
        "positive" => Some(Sentiment::Positive),
        "negative" => Some(Sentiment::Negative),
        "neutral" | "mixed" => Some(Sentiment::Neutral),
        _ => None,
    }
}

fn non_empty(v: Option<Vec<String>>) -> Option<Vec<String>> {
    v.filter(|items| !items.is_empty())
}
