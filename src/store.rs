//! In-memory vector store.
//!
//! Holds `(chunk, vector)` index entries for the lifetime of the process
//! and answers nearest-neighbour queries by brute-force cosine similarity.
//! Nothing is persisted.
//!
//! A store is bound to one embedding strategy: it records the embedder
//! name and the dimensionality of the first vector it receives and rejects
//! anything else, so vectors from different spaces never share an index.

use tracing::debug;

use crate::embedding::{cosine_similarity, EmbedError, Embedder};
use crate::models::{Chunk, ScoredChunk, TextSource};

/// One indexed chunk. Created at ingestion and never mutated.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

#[derive(Debug, Default)]
pub struct VectorStore {
    entries: Vec<IndexEntry>,
    dims: Option<usize>,
    embedder: Option<String>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Embed `chunks` in a single batch and index them.
    ///
    /// With the TF-IDF embedder this batch is the fitting corpus.
    pub fn from_chunks(chunks: Vec<Chunk>, embedder: &mut dyn Embedder) -> Result<Self, EmbedError> {
        let mut store = Self::new();
        store.embedder = Some(embedder.name().to_string());
        if chunks.is_empty() {
            return Ok(store);
        }

        let sources: Vec<TextSource<'_>> = chunks.iter().map(TextSource::from).collect();
        let vectors = embedder.embed_documents(&sources)?;
        store.add(chunks.into_iter().zip(vectors))?;

        debug!(
            entries = store.len(),
            dims = store.dims.unwrap_or(0),
            embedder = embedder.name(),
            "vector store built"
        );
        Ok(store)
    }

    /// Add already-embedded chunks.
    ///
    /// All-or-nothing: on a dimensionality mismatch nothing is inserted.
    pub fn add(
        &mut self,
        items: impl IntoIterator<Item = (Chunk, Vec<f32>)>,
    ) -> Result<(), EmbedError> {
        let items: Vec<(Chunk, Vec<f32>)> = items.into_iter().collect();
        let mut expected = self.dims;
        for (_, v) in &items {
            match expected {
                None => expected = Some(v.len()),
                Some(d) if d != v.len() => {
                    return Err(EmbedError::DimensionMismatch {
                        expected: d,
                        got: v.len(),
                    })
                }
                Some(_) => {}
            }
        }
        self.dims = expected;
        self.entries.extend(
            items
                .into_iter()
                .map(|(chunk, vector)| IndexEntry { chunk, vector }),
        );
        Ok(())
    }

    /// The `k` entries most similar to `query`, best first.
    ///
    /// Ties keep insertion order.
    pub fn similarity_search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredChunk>, EmbedError> {
        if let Some(d) = self.dims {
            if d != query.len() {
                return Err(EmbedError::DimensionMismatch {
                    expected: d,
                    got: query.len(),
                });
            }
        }

        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|e| ScoredChunk {
                chunk: e.chunk.clone(),
                score: cosine_similarity(query, &e.vector),
            })
            .collect();
        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn dims(&self) -> Option<usize> {
        self.dims
    }

    /// Name of the embedder whose vectors this store holds.
    pub fn embedder_name(&self) -> Option<&str> {
        self.embedder.as_deref()
    }
}
