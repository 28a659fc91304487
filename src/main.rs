//! # docqa CLI
//!
//! ## Usage
//!
//! ```bash
//! docqa [--config ./docqa.toml] [--verbose] <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `docqa ask` | Build the index, then answer questions from stdin |
//! | `docqa ask --question "..."` | Answer one question and exit |
//! | `docqa index` | Build the index and print what went into it |
//! | `docqa ping` | Send one prompt straight to the model |
//!
//! `GOOGLE_API_KEY` is read from the environment or from `.env` in the
//! working directory. Logs go to stderr; answers go to stdout.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use docqa::config::{self, Config};
use docqa::llm::{GeminiClient, LlmClient};
use docqa::repl;
use docqa::session::{self, IngestStats, Session};

/// Ask questions about a folder of PDF files.
#[derive(Parser)]
#[command(name = "docqa", version, about)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./docqa.toml` when that file exists; otherwise built-in
    /// defaults are used.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log pipeline progress to stderr at `info` level, overriding `RUST_LOG`.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index the PDF folder and answer questions.
    ///
    /// Without `--question`, prompts for questions until `exit` or end of
    /// input.
    Ask {
        /// Answer this one question and exit.
        #[arg(long, short, env = config::QUESTION_ENV)]
        question: Option<String>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Index the PDF folder and print a summary. Needs no API key.
    Index {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Send a prompt straight to the model and print the reply.
    Ping {
        #[arg(long, default_value = "Hello Gemini, how are you?")]
        prompt: String,
    },
}

/// Overrides for the `[documents]` and `[embedding]` sections.
#[derive(clap::Args)]
struct SourceArgs {
    /// Folder containing the PDF files.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Embedding strategy.
    #[arg(long, value_enum)]
    embedding: Option<EmbeddingArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum EmbeddingArg {
    Tfidf,
    Local,
}

impl SourceArgs {
    fn apply(self, cfg: &mut Config) {
        if let Some(data) = self.data {
            cfg.documents.folder = data;
        }
        if let Some(embedding) = self.embedding {
            cfg.embedding.provider = match embedding {
                EmbeddingArg::Tfidf => "tfidf",
                EmbeddingArg::Local => "local",
            }
            .to_string();
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    config::load_dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut cfg = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Ask { question, source } => {
            source.apply(&mut cfg);
            config::validate(&cfg)?;
            run_ask(&cfg, question)?;
        }
        Commands::Index { source } => {
            source.apply(&mut cfg);
            config::validate(&cfg)?;
            let index = session::build_index(&cfg)?;
            print_stats(&index.stats);
        }
        Commands::Ping { prompt } => {
            let client = GeminiClient::new(config::api_key_from_env()?, &cfg.llm)?;
            let reply = client.generate(&prompt)?;
            println!("{}", reply.trim());
        }
    }

    Ok(())
}

fn run_ask(cfg: &Config, question: Option<String>) -> Result<()> {
    let mut session = Session::init(cfg)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match question {
        Some(q) => repl::run_batch(&mut session, &q, &mut out),
        None => {
            let stdin = io::stdin();
            repl::run_interactive(&mut session, &mut stdin.lock(), &mut out).map(|_| ())
        }
    };
    out.flush()?;
    session.close();
    result
}

fn print_stats(stats: &IngestStats) {
    println!("Documents: {} files, {} pages", stats.files, stats.pages);
    println!("Skipped:   {}", stats.skipped.len());
    for skipped in &stats.skipped {
        println!("  {}: {}", skipped.path.display(), skipped.reason);
    }
    println!("Chunks:    {}", stats.chunks);
    println!("Embedder:  {}", stats.embedder);
    match stats.dims {
        Some(d) => println!("Dims:      {}", d),
        None => println!("Dims:      -"),
    }
}
