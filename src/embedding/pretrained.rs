//! Pretrained sentence embeddings via fastembed.
//!
//! The model is loaded once in [`PretrainedEmbedder::new`]; the first run
//! downloads it from Hugging Face into the fastembed cache, later runs are
//! offline. Encoding is a pure function of the input text.

use anyhow::{bail, Result};
use tracing::{info, warn};

use super::{EmbedError, Embedder};
use crate::config::EmbeddingConfig;
use crate::models::TextSource;

const DEFAULT_MODEL: &str = "all-minilm-l6-v2";

/// Dense embedder backed by a local ONNX model.
pub struct PretrainedEmbedder {
    model: fastembed::TextEmbedding,
    model_name: String,
    dims: usize,
    batch_size: usize,
    max_input_chars: usize,
    truncate: bool,
}

impl PretrainedEmbedder {
    /// Load (and on first use download) the configured model.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model_name = config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let (fastembed_model, dims) = config_to_fastembed_model(&model_name)?;

        info!(model = %model_name, dims, "loading sentence-embedding model");
        let model = fastembed::TextEmbedding::try_new(
            fastembed::InitOptions::new(fastembed_model).with_show_download_progress(true),
        )
        .map_err(|e| anyhow::anyhow!("Failed to initialize local embedding model: {}", e))?;

        Ok(Self {
            model,
            model_name,
            dims,
            batch_size: config.batch_size,
            max_input_chars: config.max_input_chars,
            truncate: config.truncate,
        })
    }

    /// Apply the input length limit: truncate with a warning, or reject.
    fn prepare(&self, text: &str) -> Result<String, EmbedError> {
        prepare_input(text, self.max_input_chars, self.truncate)
    }
}

/// Enforce the configured character limit on one input.
///
/// Characters stand in for tokens here. An input within `max_chars` can
/// still exceed the model's token budget (512 tokens for the bundled
/// models), and fastembed then truncates it silently, so `truncate =
/// false` only rejects what is over the character limit. The default of
/// 2000 characters sits near that budget for English prose.
fn prepare_input(text: &str, max_chars: usize, truncate: bool) -> Result<String, EmbedError> {
    let len = text.chars().count();
    if len <= max_chars {
        return Ok(text.to_string());
    }
    if !truncate {
        return Err(EmbedError::InputTooLong {
            len,
            max: max_chars,
        });
    }
    warn!(len, max = max_chars, "truncating embedding input");
    Ok(text.chars().take(max_chars).collect())
}

impl Embedder for PretrainedEmbedder {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn dims(&self) -> Option<usize> {
        Some(self.dims)
    }

    fn embed_documents(&mut self, texts: &[TextSource<'_>]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Err(EmbedError::EmptyBatch);
        }
        let inputs = texts
            .iter()
            .map(|t| self.prepare(t.text()))
            .collect::<Result<Vec<_>, _>>()?;

        let vectors = self
            .model
            .embed(inputs, Some(self.batch_size))
            .map_err(|e| EmbedError::Model(e.to_string()))?;

        if let Some(v) = vectors.iter().find(|v| v.len() != self.dims) {
            return Err(EmbedError::DimensionMismatch {
                expected: self.dims,
                got: v.len(),
            });
        }
        Ok(vectors)
    }

    fn embed_query(&mut self, text: TextSource<'_>) -> Result<Vec<f32>, EmbedError> {
        self.embed_documents(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::Model("empty embedding response".to_string()))
    }
}

fn config_to_fastembed_model(name: &str) -> Result<(fastembed::EmbeddingModel, usize)> {
    match name {
        "all-minilm-l6-v2" => Ok((fastembed::EmbeddingModel::AllMiniLML6V2, 384)),
        "bge-small-en-v1.5" => Ok((fastembed::EmbeddingModel::BGESmallENV15, 384)),
        "bge-base-en-v1.5" => Ok((fastembed::EmbeddingModel::BGEBaseENV15, 768)),
        "bge-large-en-v1.5" => Ok((fastembed::EmbeddingModel::BGELargeENV15, 1024)),
        "nomic-embed-text-v1.5" => Ok((fastembed::EmbeddingModel::NomicEmbedTextV15, 768)),
        "multilingual-e5-small" => Ok((fastembed::EmbeddingModel::MultilingualE5Small, 384)),
        other => bail!(
            "Unknown local embedding model: '{}'. Supported models: \
             all-minilm-l6-v2, bge-small-en-v1.5, bge-base-en-v1.5, bge-large-en-v1.5, \
             nomic-embed-text-v1.5, multilingual-e5-small",
            other
        ),
    }
}
