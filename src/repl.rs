//! The read-question / answer / print loop.
//!
//! Two modes:
//! - **batch**: one pre-set question, exactly one cycle, then terminate.
//!   The question is used literally; `exit` is not special here.
//! - **interactive**: prompt, read a line, answer, repeat until `exit`
//!   (any case) or end of input.
//!
//! Reader and writer are generic so the loop runs the same against a
//! terminal or in-memory buffers.

use std::io::{BufRead, Write};

use anyhow::Result;
use tracing::{debug, error};

use crate::models::Answer;
use crate::session::Session;

pub const PROMPT: &str = "\n   Ask a question (or type 'exit'): ";
pub const EXIT_COMMAND: &str = "exit";

/// Loop states; each cycle blocks fully on the remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    AwaitingInput,
    Answering,
    Terminated,
}

/// Something that can answer a question. [`Session`] is the real one.
pub trait Answerer {
    fn answer(&mut self, question: &str) -> Result<Answer>;
}

impl Answerer for Session {
    fn answer(&mut self, question: &str) -> Result<Answer> {
        self.ask(question)
    }
}

fn print_answer(out: &mut impl Write, answer: &Answer) -> std::io::Result<()> {
    writeln!(out, "\nAnswer: {}", answer.text)?;
    out.flush()
}

/// Run exactly one cycle on `question` and print the answer.
///
/// Errors propagate: a failed remote call ends the process abnormally.
pub fn run_batch(answerer: &mut impl Answerer, question: &str, out: &mut impl Write) -> Result<()> {
    debug!(state = ?LoopState::Answering, "batch question");
    let answer = answerer.answer(question)?;
    print_answer(out, &answer)?;
    debug!(state = ?LoopState::Terminated, "batch done");
    Ok(())
}

/// Prompt for questions until `exit` or end of input.
///
/// A failed cycle is reported on `out` as `Error: ...` and the loop goes
/// back to the prompt. I/O errors on the channels themselves end the loop.
/// Returns the number of questions answered successfully.
pub fn run_interactive(
    answerer: &mut impl Answerer,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<usize> {
    let mut state = LoopState::AwaitingInput;
    let mut answered = 0usize;
    let mut line = String::new();

    while state != LoopState::Terminated {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        line.clear();
        let read = input.read_line(&mut line)?;
        let question = line.trim_end_matches(['\n', '\r']);

        state = next_state(read, question);
        if state != LoopState::Answering {
            continue;
        }

        match answerer.answer(question) {
            Ok(answer) => {
                print_answer(out, &answer)?;
                answered += 1;
            }
            Err(e) => {
                error!(error = %format!("{:#}", e), "answer cycle failed");
                writeln!(out, "\nError: {:#}", e)?;
                out.flush()?;
            }
        }
        state = LoopState::AwaitingInput;
    }

    if line.is_empty() {
        // End of input left the cursor after the prompt.
        writeln!(out)?;
    }
    Ok(answered)
}

fn next_state(bytes_read: usize, question: &str) -> LoopState {
    if bytes_read == 0 || question.eq_ignore_ascii_case(EXIT_COMMAND) {
        LoopState::Terminated
    } else {
        LoopState::Answering
    }
}
