//! Overlapping fixed-size text chunker.
//!
//! Splits page text into [`Chunk`]s of at most `chunk_size` characters,
//! with consecutive chunks sharing roughly `chunk_overlap` characters so
//! context survives a split boundary. Sizes are counted in characters
//! (Unicode scalar values), never bytes.
//!
//! # Algorithm
//!
//! 0. Whitespace is normalised first: the text is trimmed and every run of
//!    whitespace collapses to one space, one `\n`, or `\n\n` (a run holding
//!    two or more line breaks stays a paragraph break). Chunk offsets index
//!    this normalised text.
//! 1. A window starts at `start` and may extend to `start + chunk_size`.
//! 2. If the text continues past the window, the end is pulled back to the
//!    last paragraph break, else line break, else whitespace, provided the
//!    window stays longer than the overlap. Otherwise the window is cut hard.
//! 3. The next window starts `chunk_overlap` characters before the previous
//!    end, pulled back (by at most `chunk_overlap` more) to a word start.
//! 4. Window text is trimmed.
//!
//! Step 3 guarantees the next start is strictly after the previous start
//! and at most `chunk_size - chunk_overlap` characters after it. Step 0
//! caps whitespace runs at two characters and step 2 never snaps to a
//! break before the window's first visible character, so with
//! `chunk_size >= 3` every window holds text and becomes a chunk.
//!
//! # Example
//!
//! ```rust
//! use docqa::chunk::split_text;
//!
//! let pieces = split_text("alpha beta gamma delta", 12, 4);
//! assert_eq!(pieces[0], (0, "alpha beta".to_string()));
//! ```

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::models::{Chunk, Document};

/// Split every document into chunks.
///
/// Chunk indices restart at 0 for each document.
pub fn split_documents(docs: &[Document], chunk_size: usize, chunk_overlap: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    for doc in docs {
        for (index, (start, text)) in split_text(&doc.text, chunk_size, chunk_overlap)
            .into_iter()
            .enumerate()
        {
            chunks.push(make_chunk(doc, index, start, text));
        }
    }
    chunks
}

/// Split `text` into `(char_offset, chunk_text)` pairs.
///
/// Offsets are positions in the whitespace-normalised text.
///
/// # Guarantees
///
/// - Every window spans at most `chunk_size` characters.
/// - Chunk starts strictly increase, each at most
///   `chunk_size - chunk_overlap` after the previous one, however long
///   the blank stretches in the input (for `chunk_size >= 3`).
/// - Empty or whitespace-only text yields no chunks.
pub fn split_text(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<(usize, String)> {
    let chunk_size = chunk_size.max(1);
    let overlap = chunk_overlap.min(chunk_size - 1);
    let chars = normalize_whitespace(text);
    let len = chars.len();

    let mut out = Vec::new();
    let mut start = 0usize;

    while start < len {
        let hard_end = (start + chunk_size).min(len);
        let end = if hard_end < len {
            snap_end(&chars, start, hard_end, overlap)
        } else {
            hard_end
        };

        let window: String = chars[start..end].iter().collect();
        let trimmed = window.trim();
        if !trimmed.is_empty() {
            out.push((start, trimmed.to_string()));
        }

        if end >= len {
            break;
        }
        start = next_start(&chars, start, end, overlap);
    }

    out
}

/// Trim `text` and collapse each whitespace run to ` `, `\n`, or `\n\n`.
fn normalize_whitespace(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    // Line breaks seen in the pending whitespace run, if any.
    let mut run: Option<usize> = None;
    for c in text.trim().chars() {
        if c.is_whitespace() {
            let breaks = run.get_or_insert(0);
            if c == '\n' {
                *breaks += 1;
            }
            continue;
        }
        match run.take() {
            Some(0) => out.push(' '),
            Some(1) => out.push('\n'),
            Some(_) => out.extend(['\n', '\n']),
            None => {}
        }
        out.push(c);
    }
    out
}

/// Pull a window end back to the best natural break in `(start + overlap, hard_end]`
/// that still leaves visible text in the window.
fn snap_end(chars: &[char], start: usize, hard_end: usize, overlap: usize) -> usize {
    let Some(first_visible) = (start..hard_end).find(|&i| !chars[i].is_whitespace()) else {
        return hard_end;
    };
    let min_end = (start + overlap + 1).max(first_visible + 1);
    if min_end > hard_end {
        return hard_end;
    }

    let paragraph = (min_end.max(2)..=hard_end)
        .rev()
        .find(|&b| chars[b - 1] == '\n' && chars[b - 2] == '\n');
    if let Some(b) = paragraph {
        return b;
    }

    let line = (min_end..=hard_end).rev().find(|&b| chars[b - 1] == '\n');
    if let Some(b) = line {
        return b;
    }

    // `hard_end < chars.len()` here, so `chars[b]` is in bounds.
    let word = (min_end..=hard_end)
        .rev()
        .find(|&b| chars[b].is_whitespace() || chars[b - 1].is_whitespace());
    word.unwrap_or(hard_end)
}

/// Start of the window following `[start, end)`.
fn next_start(chars: &[char], start: usize, end: usize, overlap: usize) -> usize {
    let candidate = end - overlap;
    if overlap == 0 {
        return candidate;
    }
    let lower = (start + 1).max(candidate.saturating_sub(overlap));
    (lower..=candidate)
        .rev()
        .find(|&i| chars[i - 1].is_whitespace())
        .unwrap_or(candidate)
}

/// Create a single [`Chunk`] with a UUID and SHA-256 content hash.
fn make_chunk(doc: &Document, index: usize, start: usize, text: String) -> Chunk {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    Chunk {
        id: Uuid::new_v4().to_string(),
        source: doc.source.clone(),
        page: doc.page,
        index,
        start,
        text,
        hash,
    }
}
