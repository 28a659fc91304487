//! TF-IDF embeddings fitted on the document corpus.
//!
//! Weighting follows the common vectorizer defaults: text is lowercased,
//! tokens are runs of two or more word characters, raw term counts are
//! multiplied by a smoothed inverse document frequency
//!
//! ```text
//! idf(t) = ln((1 + n) / (1 + df(t))) + 1
//! ```
//!
//! and every row is L2-normalised. The vocabulary is sorted, so term `i`
//! is always the i-th smallest term.
//!
//! The embedder has two explicit phases. It starts [`FitState::Unfitted`];
//! the first [`embed_documents`](Embedder::embed_documents) call fits the
//! vocabulary on that batch and moves it to [`FitState::Fitted`], where it
//! stays for the rest of the process. Queries are only accepted once
//! fitted.

use std::collections::{BTreeSet, HashMap};

use super::{EmbedError, Embedder};
use crate::models::TextSource;

/// Fitted vocabulary: term → column, plus the idf weight of each column.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    index: HashMap<String, usize>,
    idf: Vec<f32>,
}

impl Vocabulary {
    fn fit(texts: &[&str]) -> Result<Self, EmbedError> {
        let n = texts.len();
        let doc_terms: Vec<BTreeSet<String>> =
            texts.iter().map(|t| tokenize(t).collect()).collect();

        let terms: BTreeSet<&String> = doc_terms.iter().flatten().collect();
        if terms.is_empty() {
            return Err(EmbedError::EmptyVocabulary);
        }

        let index: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        let mut df = vec![0usize; index.len()];
        for set in &doc_terms {
            for term in set {
                df[index[term]] += 1;
            }
        }

        let idf = df
            .into_iter()
            .map(|d| (((1 + n) as f64 / (1 + d) as f64).ln() + 1.0) as f32)
            .collect();

        Ok(Self { index, idf })
    }

    pub fn len(&self) -> usize {
        self.idf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idf.is_empty()
    }

    /// Weighted, L2-normalised vector for `text`. Out-of-vocabulary terms
    /// are ignored; text with no known term maps to the zero vector.
    fn transform(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0.0f32; self.len()];
        for token in tokenize(text) {
            if let Some(&col) = self.index.get(&token) {
                v[col] += 1.0;
            }
        }
        for (x, w) in v.iter_mut().zip(&self.idf) {
            *x *= w;
        }
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

/// Lifecycle of a [`TfidfEmbedder`].
#[derive(Debug, Clone)]
pub enum FitState {
    Unfitted,
    Fitted(Vocabulary),
}

/// TF-IDF embedder with lazy, one-time fitting.
#[derive(Debug, Clone)]
pub struct TfidfEmbedder {
    state: FitState,
}

impl TfidfEmbedder {
    pub fn new() -> Self {
        Self {
            state: FitState::Unfitted,
        }
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self.state, FitState::Fitted(_))
    }

    pub fn state(&self) -> &FitState {
        &self.state
    }
}

impl Default for TfidfEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for TfidfEmbedder {
    fn name(&self) -> &str {
        "tfidf"
    }

    fn dims(&self) -> Option<usize> {
        match &self.state {
            FitState::Unfitted => None,
            FitState::Fitted(vocab) => Some(vocab.len()),
        }
    }

    fn embed_documents(&mut self, texts: &[TextSource<'_>]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Err(EmbedError::EmptyBatch);
        }
        let texts: Vec<&str> = texts.iter().map(|t| t.text()).collect();

        if let FitState::Unfitted = self.state {
            let vocab = Vocabulary::fit(&texts)?;
            tracing::debug!(terms = vocab.len(), documents = texts.len(), "fitted tf-idf vocabulary");
            self.state = FitState::Fitted(vocab);
        }

        match &self.state {
            FitState::Fitted(vocab) => Ok(texts.iter().map(|t| vocab.transform(t)).collect()),
            FitState::Unfitted => Err(EmbedError::NotFitted),
        }
    }

    fn embed_query(&mut self, text: TextSource<'_>) -> Result<Vec<f32>, EmbedError> {
        match &self.state {
            FitState::Unfitted => Err(EmbedError::NotFitted),
            FitState::Fitted(vocab) => Ok(vocab.transform(text.text())),
        }
    }
}

/// Lowercased tokens of two or more word characters (letters, digits, `_`).
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(|t| t.to_lowercase())
}
