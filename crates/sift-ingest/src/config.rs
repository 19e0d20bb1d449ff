//! Pipeline configuration from environment variables.
//!
//! | Variable                | Default                                   |
//! |-------------------------|-------------------------------------------|
//! | `SIFT_NOTE_CATEGORY`    | `Uploads`                                 |
//! | `SIFT_CONCURRENCY`      | `4`                                       |
//! | `SIFT_ANALYSIS_ENABLED` | `true`                                    |
//! | `OLLAMA_BASE`           | unset (heuristic analysis only)           |
//! | `OLLAMA_GEN_MODEL`      | `gpt-oss:20b`                             |
//! | `SIFT_GEN_TIMEOUT_SECS` | `120`                                     |
//! | `WHISPER_BASE_URL`      | unset (simulated transcription)           |
//! | `WHISPER_MODEL`         | `Systran/faster-distil-whisper-large-v3`  |

use sift_core::defaults;
use sift_core::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct IngestConfig {
    /// Category assigned to every synthesized note.
    pub note_category: String,
    /// Files processed at once within a batch.
    pub concurrency: usize,
    /// Analyze real audio transcriptions.
    pub analysis_enabled: bool,
    /// Ollama server for transcription analysis. `None` keeps analysis heuristic.
    pub ollama_base: Option<String>,
    pub gen_model: String,
    pub gen_timeout_secs: u64,
    /// Whisper-compatible server. `None` means transcriptions are simulated.
    pub whisper_base_url: Option<String>,
    pub whisper_model: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            note_category: defaults::NOTE_CATEGORY.to_string(),
            concurrency: defaults::BATCH_CONCURRENCY,
            analysis_enabled: true,
            ollama_base: None,
            gen_model: defaults::GEN_MODEL.to_string(),
            gen_timeout_secs: defaults::GEN_TIMEOUT_SECS,
            whisper_base_url: None,
            whisper_model: defaults::DEFAULT_WHISPER_MODEL.to_string(),
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!(
            "{} must be a boolean (true/false), got: {}",
            name, other
        ))),
    }
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a positive integer, got: {}", name, value)))
}

fn check_url(name: &str, url: &str) -> Result<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(Error::Config(format!(
            "{} must start with http:// or https://, got: {}",
            name, url
        )));
    }
    Ok(())
}

impl IngestConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(category) = get(defaults::ENV_NOTE_CATEGORY) {
            config.note_category = category.trim().to_string();
        }
        if let Some(value) = get(defaults::ENV_CONCURRENCY) {
            config.concurrency = parse_number(defaults::ENV_CONCURRENCY, &value)?;
        }
        if let Some(value) = get(defaults::ENV_ANALYSIS_ENABLED) {
            config.analysis_enabled = parse_bool(defaults::ENV_ANALYSIS_ENABLED, &value)?;
        }
        config.ollama_base = get(defaults::ENV_OLLAMA_BASE);
        if let Some(model) = get(defaults::ENV_OLLAMA_GEN_MODEL) {
            config.gen_model = model;
        }
        if let Some(value) = get(defaults::ENV_GEN_TIMEOUT_SECS) {
            config.gen_timeout_secs = parse_number(defaults::ENV_GEN_TIMEOUT_SECS, &value)?;
        }
        config.whisper_base_url = get(defaults::ENV_WHISPER_BASE_URL);
        if let Some(model) = get(defaults::ENV_WHISPER_MODEL) {
            config.whisper_model = model;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.note_category.trim().is_empty() {
            return Err(Error::Config("note category cannot be empty".to_string()));
        }
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }
        if self.gen_timeout_secs == 0 {
            return Err(Error::Config(
                "generation timeout must be at least 1 second".to_string(),
            ));
        }
        if let Some(url) = &self.ollama_base {
            check_url(defaults::ENV_OLLAMA_BASE, url)?;
        }
        if let Some(url) = &self.whisper_base_url {
            check_url(defaults::ENV_WHISPER_BASE_URL, url)?;
        }
        Ok(())
    }

    pub fn with_note_category(mut self, category: impl Into<String>) -> Self {
        self.note_category = category.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_analysis(mut self, enabled: bool) -> Self {
        self.analysis_enabled = enabled;
        self
    }
}
