//! # docqa
//!
//! Ask questions about a folder of PDF files.
//!
//! docqa loads every PDF of one folder, splits the page text into
//! overlapping chunks, embeds them into an in-memory vector store, and
//! answers questions by retrieving the nearest chunks and sending them,
//! together with the question, to a hosted Gemini model.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌───────────┐   ┌──────────────┐
//! │  Loader  │──▶│ Chunker  │──▶│ Embedder  │──▶│ Vector store │
//! │  (PDF)   │   │          │   │ TF-IDF/ML │   │ (in memory)  │
//! └──────────┘   └──────────┘   └───────────┘   └──────┬───────┘
//!                                                      │
//!                  ┌──────────┐   ┌───────────┐   ┌────▼──────┐
//!                  │   REPL   │◀──│  QaChain  │◀──│ Retriever │
//!                  └──────────┘   │ + Gemini  │   └───────────┘
//!                                 └───────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! export GOOGLE_API_KEY=...
//! docqa index --data ./data                 # check what gets indexed
//! docqa ask                                 # interactive questions
//! docqa ask --question "What is covered?"   # one question, then exit
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration and environment |
//! | [`models`] | Core data types |
//! | [`extract`] | PDF text extraction |
//! | [`loader`] | Folder scan into page documents |
//! | [`chunk`] | Overlapping text chunking |
//! | [`embedding`] | TF-IDF and pretrained embedders |
//! | [`store`] | In-memory vector store |
//! | [`retriever`] | Query embedding and top-k search |
//! | [`llm`] | Gemini client |
//! | [`qa`] | Prompt composition and answer cycle |
//! | [`session`] | Session lifecycle |
//! | [`repl`] | Batch and interactive query loop |

pub mod chunk;
pub mod config;
pub mod embedding;
pub mod extract;
pub mod llm;
pub mod loader;
pub mod models;
pub mod qa;
pub mod repl;
pub mod retriever;
pub mod session;
pub mod store;
