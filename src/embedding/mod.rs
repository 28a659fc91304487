//! Embedding adapter.
//!
//! Defines the [`Embedder`] trait ("embed many texts" and "embed one
//! text") so the vector store and retriever never need to know which
//! technique is active. Two implementations exist, mutually exclusive per
//! run:
//! - **[`TfidfEmbedder`]**: sparse term-frequency × inverse-document-frequency
//!   vectors, fitted once on the first document batch.
//! - **`PretrainedEmbedder`**: dense sentence embeddings from a local
//!   fastembed model (feature `local-embeddings-fastembed`, on by default).
//!
//! Vectors from the two strategies live in different spaces and must never
//! be mixed in one index; see [`crate::store::VectorStore`].
//!
//! # Provider Selection
//!
//! ```rust
//! use docqa::config::EmbeddingConfig;
//! use docqa::embedding::create_embedder;
//!
//! let config = EmbeddingConfig::default(); // provider = "tfidf"
//! let embedder = create_embedder(&config).unwrap();
//! assert_eq!(embedder.name(), "tfidf");
//! assert_eq!(embedder.dims(), None); // not fitted yet
//! ```

#[cfg(feature = "local-embeddings-fastembed")]
mod pretrained;
mod tfidf;

#[cfg(feature = "local-embeddings-fastembed")]
pub use pretrained::PretrainedEmbedder;
pub use tfidf::{tokenize, TfidfEmbedder};

use anyhow::{bail, Result};
use thiserror::Error;

use crate::config::EmbeddingConfig;
use crate::models::TextSource;

/// Embedding failures callers may want to tell apart.
#[derive(Debug, Error, PartialEq)]
pub enum EmbedError {
    #[error("cannot embed an empty batch")]
    EmptyBatch,
    #[error("TF-IDF vocabulary is not fitted yet; embed the documents before querying")]
    NotFitted,
    #[error("no tokens found to build a TF-IDF vocabulary")]
    EmptyVocabulary,
    #[error("input of {len} characters exceeds the {max}-character model limit")]
    InputTooLong { len: usize, max: usize },
    #[error("vector has {got} dimensions but the index holds {expected}-dimensional vectors")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("embedding model failed: {0}")]
    Model(String),
}

/// Uniform two-operation embedding contract.
///
/// Both operations take &mut self: the TF-IDF variant fits on its first
/// batch, and the fastembed session needs exclusive access to run.
pub trait Embedder {
    /// Short identifier of the strategy/model (e.g. `"tfidf"`, `"all-minilm-l6-v2"`).
    fn name(&self) -> &str;

    /// Vector dimensionality, or `None` while it is not known yet
    /// (TF-IDF before fitting).
    fn dims(&self) -> Option<usize>;

    /// Embed a batch of texts, one vector per input, in input order.
    fn embed_documents(&mut self, texts: &[TextSource<'_>]) -> Result<Vec<Vec<f32>>, EmbedError>;

    /// Embed a single query text.
    fn embed_query(&mut self, text: TextSource<'_>) -> Result<Vec<f32>, EmbedError>;
}

/// Create the configured [`Embedder`].
///
/// | Config Value | Embedder |
/// |-------------|----------|
/// | `"tfidf"` | [`TfidfEmbedder`] |
/// | `"local"` | `PretrainedEmbedder` (loads/downloads the model now) |
pub fn create_embedder(config: &EmbeddingConfig) -> Result<Box<dyn Embedder>> {
    match config.provider.as_str() {
        "tfidf" => Ok(Box::new(TfidfEmbedder::new())),
        #[cfg(feature = "local-embeddings-fastembed")]
        "local" => Ok(Box::new(PretrainedEmbedder::new(config)?)),
        #[cfg(not(feature = "local-embeddings-fastembed"))]
        "local" => bail!(
            "Local embedding provider requires --features local-embeddings-fastembed"
        ),
        other => bail!("Unknown embedding provider: {}", other),
    }
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns `0.0` for empty vectors, vectors of different lengths, or a
/// zero vector on either side.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
