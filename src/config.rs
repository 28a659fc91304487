//! Configuration loading and validation.
//!
//! Settings come from an optional TOML file plus the environment. Every
//! field has a default, so a missing default config file is not an error:
//!
//! ```toml
//! [documents]
//! folder = "data"
//! on_error = "skip"          # or "abort"
//!
//! [chunking]
//! chunk_size = 500           # characters
//! chunk_overlap = 50
//!
//! [embedding]
//! provider = "tfidf"         # or "local"
//!
//! [retrieval]
//! top_k = 4
//!
//! [llm]
//! model = "gemini-2.0-flash"
//! ```
//!
//! The API credential is never read from the file; it comes from
//! `GOOGLE_API_KEY` (a `.env` file is honoured, see [`load_dotenv`]).

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
/// Environment variable holding a single pre-set question (batch mode).
pub const QUESTION_ENV: &str = "DOCQA_QUESTION";
/// Config path used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "./docqa.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub documents: DocumentsConfig,
    #[serde(default)]
    pub chunking: ChunkingConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DocumentsConfig {
    #[serde(default = "default_folder")]
    pub folder: PathBuf,
    #[serde(default)]
    pub on_error: OnError,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            folder: default_folder(),
            on_error: OnError::default(),
        }
    }
}

fn default_folder() -> PathBuf {
    PathBuf::from("data")
}

/// What the loader does with a PDF it cannot parse.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    /// Log a warning, record the file as skipped, keep going.
    #[default]
    Skip,
    /// Stop the whole run with the extraction error.
    Abort,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    500
}
fn default_chunk_overlap() -> usize {
    50
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmbeddingConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Character limit per input for the `local` provider. A proxy for the
    /// model's token budget: fastembed still cuts anything past its own
    /// token limit (512 tokens) without reporting it.
    #[serde(default = "default_max_input_chars")]
    pub max_input_chars: usize,
    /// Over `max_input_chars`: cut the input (`true`) or reject it.
    #[serde(default = "default_truncate")]
    pub truncate: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: None,
            batch_size: default_batch_size(),
            max_input_chars: default_max_input_chars(),
            truncate: default_truncate(),
        }
    }
}

fn default_provider() -> String {
    "tfidf".to_string()
}
fn default_batch_size() -> usize {
    64
}
fn default_max_input_chars() -> usize {
    2000
}
fn default_truncate() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    4
}

#[derive(Debug, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    /// Request timeout in seconds; `0` blocks until the server answers.
    #[serde(default)]
    pub timeout_secs: u64,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
            temperature: 0.0,
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: 0,
            base_url: default_base_url(),
        }
    }
}

fn default_llm_model() -> String {
    "gemini-2.0-flash".to_string()
}
fn default_max_output_tokens() -> u32 {
    1024
}
fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Load `.env` from the working directory (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Read the Gemini API key from the environment.
///
/// An empty value counts as missing.
pub fn api_key_from_env() -> Result<String> {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.trim().is_empty() => Ok(key),
        _ => bail!(
            "{} is not set. Export it or put it in a .env file.",
            API_KEY_ENV
        ),
    }
}

/// Load and validate configuration.
///
/// `None` means "use the default path if it exists, otherwise defaults".
/// An explicitly given path must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(p) => parse_file(p)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                parse_file(default_path)?
            } else {
                Config::default()
            }
        }
    };
    validate(&config)?;
    Ok(config)
}

fn parse_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content).with_context(|| "Failed to parse config file")
}

/// Check cross-field constraints that serde cannot express.
pub fn validate(config: &Config) -> Result<()> {
    if config.chunking.chunk_size == 0 {
        bail!("chunking.chunk_size must be > 0");
    }
    if config.chunking.chunk_overlap >= config.chunking.chunk_size {
        bail!(
            "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
            config.chunking.chunk_overlap,
            config.chunking.chunk_size
        );
    }

    if config.retrieval.top_k < 1 {
        bail!("retrieval.top_k must be >= 1");
    }

    match config.embedding.provider.as_str() {
        "tfidf" | "local" => {}
        other => bail!(
            "Unknown embedding provider: '{}'. Must be tfidf or local.",
            other
        ),
    }
    if config.embedding.batch_size == 0 {
        bail!("embedding.batch_size must be > 0");
    }
    if config.embedding.max_input_chars == 0 {
        bail!("embedding.max_input_chars must be > 0");
    }

    if config.llm.model.trim().is_empty() {
        bail!("llm.model must not be empty");
    }

    Ok(())
}
