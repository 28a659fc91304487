//! Query-time retrieval over the vector store.
//!
//! The retriever owns the store together with the embedder that built it,
//! so a query is always embedded in the same space (and, for TF-IDF, with
//! the same fitted vocabulary) as the indexed chunks.

use anyhow::Result;
use tracing::debug;

use crate::embedding::Embedder;
use crate::models::{ScoredChunk, TextSource};
use crate::store::VectorStore;

pub struct Retriever {
    store: VectorStore,
    embedder: Box<dyn Embedder>,
    top_k: usize,
}

impl Retriever {
    pub fn new(store: VectorStore, embedder: Box<dyn Embedder>, top_k: usize) -> Self {
        Self {
            store,
            embedder,
            top_k,
        }
    }

    /// Return up to `top_k` chunks most relevant to `question`, best first.
    ///
    /// An empty index yields no chunks without embedding the question.
    pub fn retrieve(&mut self, question: &str) -> Result<Vec<ScoredChunk>> {
        if self.store.is_empty() {
            debug!("vector store is empty; nothing to retrieve");
            return Ok(Vec::new());
        }
        let query = self.embedder.embed_query(TextSource::Raw(question))?;
        let hits = self.store.similarity_search(&query, self.top_k)?;
        debug!(
            hits = hits.len(),
            best = hits.first().map(|h| h.score).unwrap_or(0.0),
            "retrieved chunks"
        );
        Ok(hits)
    }
}
