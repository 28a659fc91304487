//! Core data models used throughout docqa.
//!
//! These types represent the pages, chunks, and answers that flow through
//! the ingestion and question-answering pipeline.

use std::path::PathBuf;

/// One page of text extracted from a PDF.
///
/// Produced by the loader and discarded once it has been split into chunks.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// File name of the source PDF (e.g. `"manual.pdf"`).
    pub source: String,
    pub path: PathBuf,
    /// 1-based page number.
    pub page: u32,
    pub text: String,
}

/// A bounded, overlapping slice of a page's text; the unit of retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub id: String,
    pub source: String,
    pub page: u32,
    /// Position of this chunk within its page, starting at 0.
    pub index: usize,
    /// Character offset of the chunk window in the whitespace-normalised
    /// page text.
    pub start: usize,
    pub text: String,
    /// SHA-256 of `text`, hex encoded.
    pub hash: String,
}

/// Anything the embedding adapter accepts: a raw string or a chunk.
///
/// Callers pass both interchangeably; the adapter resolves the text once
/// through [`TextSource::text`], so a chunk is never embedded by its debug
/// representation.
#[derive(Debug, Clone, Copy)]
pub enum TextSource<'a> {
    Raw(&'a str),
    Chunk(&'a Chunk),
}

impl<'a> TextSource<'a> {
    pub fn text(&self) -> &'a str {
        match *self {
            TextSource::Raw(s) => s,
            TextSource::Chunk(c) => &c.text,
        }
    }
}

impl<'a> From<&'a str> for TextSource<'a> {
    fn from(s: &'a str) -> Self {
        TextSource::Raw(s)
    }
}

impl<'a> From<&'a String> for TextSource<'a> {
    fn from(s: &'a String) -> Self {
        TextSource::Raw(s.as_str())
    }
}

impl<'a> From<&'a Chunk> for TextSource<'a> {
    fn from(c: &'a Chunk) -> Self {
        TextSource::Chunk(c)
    }
}

/// A chunk returned by retrieval together with its cosine similarity.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Where a piece of answer context came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRef {
    pub source: String,
    pub page: u32,
}

/// Generated answer text plus the context it was conditioned on.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub sources: Vec<SourceRef>,
}
