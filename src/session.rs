//! Question-answering session lifecycle.
//!
//! A [`Session`] is built once (`init`), answers any number of questions
//! (`ask`), and is torn down with `close`. Building runs the whole
//! ingestion pipeline: load PDFs → split → embed → index.

use anyhow::{Context, Result};
use tracing::info;

use crate::chunk::split_documents;
use crate::config::{self, Config};
use crate::embedding::{create_embedder, Embedder};
use crate::llm::{GeminiClient, LlmClient};
use crate::loader::{self, LoadReport, SkippedFile};
use crate::models::{Answer, Document};
use crate::qa::QaChain;
use crate::retriever::Retriever;
use crate::store::VectorStore;

/// Ingestion counters, printed by `docqa index` and logged on close.
#[derive(Debug, Clone, Default)]
pub struct IngestStats {
    pub files: usize,
    pub pages: usize,
    pub chunks: usize,
    pub skipped: Vec<SkippedFile>,
    pub embedder: String,
    pub dims: Option<usize>,
}

/// Index plus embedder, before a language model is attached.
pub struct Index {
    pub retriever: Retriever,
    pub stats: IngestStats,
}

/// Load, split, embed, and index the configured PDF folder.
///
/// Needs no API key; used by both [`Session::init`] and `docqa index`.
pub fn build_index(config: &Config) -> Result<Index> {
    let report = loader::load_folder(&config.documents.folder, config.documents.on_error)?;
    let embedder = create_embedder(&config.embedding)?;
    index_documents(config, report, embedder)
}

fn index_documents(
    config: &Config,
    report: LoadReport,
    mut embedder: Box<dyn Embedder>,
) -> Result<Index> {
    let LoadReport {
        documents,
        files_loaded,
        skipped,
    } = report;

    let chunks = split_documents(
        &documents,
        config.chunking.chunk_size,
        config.chunking.chunk_overlap,
    );
    let chunk_count = chunks.len();
    info!(pages = documents.len(), chunks = chunk_count, "documents split");

    let store = VectorStore::from_chunks(chunks, embedder.as_mut())
        .with_context(|| format!("Failed to embed chunks with {}", embedder.name()))?;
    info!(
        entries = store.len(),
        embedder = embedder.name(),
        dims = store.dims().unwrap_or(0),
        "index built"
    );

    let stats = IngestStats {
        files: files_loaded,
        pages: documents.len(),
        chunks: chunk_count,
        skipped,
        embedder: embedder.name().to_string(),
        dims: store.dims(),
    };

    Ok(Index {
        retriever: Retriever::new(store, embedder, config.retrieval.top_k),
        stats,
    })
}

pub struct Session {
    chain: QaChain,
    stats: IngestStats,
    questions: usize,
}

impl Session {
    /// Build a session from configuration.
    ///
    /// Fails before touching the filesystem when `GOOGLE_API_KEY` is missing.
    pub fn init(config: &Config) -> Result<Self> {
        let api_key = config::api_key_from_env()?;
        let llm = GeminiClient::new(api_key, &config.llm)?;
        let index = build_index(config)?;
        Ok(Self::with_index(index, Box::new(llm)))
    }

    /// Build a session from already-loaded documents and explicit
    /// components, without reading the filesystem or environment.
    pub fn from_parts(
        config: &Config,
        documents: Vec<Document>,
        embedder: Box<dyn Embedder>,
        llm: Box<dyn LlmClient>,
    ) -> Result<Self> {
        let report = LoadReport {
            files_loaded: 0,
            documents,
            skipped: Vec::new(),
        };
        let index = index_documents(config, report, embedder)?;
        Ok(Self::with_index(index, llm))
    }

    fn with_index(index: Index, llm: Box<dyn LlmClient>) -> Self {
        Self {
            chain: QaChain::new(index.retriever, llm),
            stats: index.stats,
            questions: 0,
        }
    }

    /// Answer one question.
    pub fn ask(&mut self, question: &str) -> Result<Answer> {
        self.questions += 1;
        self.chain.run(question)
    }

    pub fn stats(&self) -> &IngestStats {
        &self.stats
    }

    /// Number of questions asked so far, answered or not.
    pub fn questions_asked(&self) -> usize {
        self.questions
    }

    /// End the session. The index is dropped with it.
    pub fn close(self) {
        info!(
            questions = self.questions,
            chunks = self.stats.chunks,
            "session closed"
        );
    }
}
