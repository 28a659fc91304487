//! Retrieval-augmented answering.
//!
//! One answer cycle: retrieve the chunks nearest to the question, "stuff"
//! them into a single prompt, and send it to the language model.

use anyhow::{Context, Result};
use tracing::info;

use crate::llm::LlmClient;
use crate::models::{Answer, ScoredChunk, SourceRef};
use crate::retriever::Retriever;

const PROMPT_PREAMBLE: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.";

/// Compose the prompt: instructions, context chunks separated by blank
/// lines, the question, and the answer cue.
pub fn build_prompt(question: &str, context: &[ScoredChunk]) -> String {
    let context_text = context
        .iter()
        .map(|c| c.chunk.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "{}\n\n{}\n\nQuestion: {}\nHelpful Answer:",
        PROMPT_PREAMBLE, context_text, question
    )
}

pub struct QaChain {
    retriever: Retriever,
    llm: Box<dyn LlmClient>,
}

impl QaChain {
    pub fn new(retriever: Retriever, llm: Box<dyn LlmClient>) -> Self {
        Self { retriever, llm }
    }

    /// Run one retrieve + generate cycle.
    pub fn run(&mut self, question: &str) -> Result<Answer> {
        let hits = self.retriever.retrieve(question)?;
        let prompt = build_prompt(question, &hits);

        info!(model = self.llm.model(), context_chunks = hits.len(), "generating answer");
        let text = self
            .llm
            .generate(&prompt)
            .with_context(|| format!("{} request failed", self.llm.model()))?;

        let mut sources: Vec<SourceRef> = Vec::new();
        for hit in &hits {
            let r = SourceRef {
                source: hit.chunk.source.clone(),
                page: hit.chunk.page,
            };
            if !sources.contains(&r) {
                sources.push(r);
            }
        }

        Ok(Answer {
            text: text.trim().to_string(),
            sources,
        })
    }
}
