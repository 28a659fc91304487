//! End-to-end tests driving the `docqa` binary.
//!
//! Every test runs in its own temp directory so no `.env` or
//! `docqa.toml` from the developer's checkout leaks in. Nothing here
//! reaches a real model: commands that need one either stop before the
//! first call or point `llm.base_url` at a closed local port.

mod common;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

use common::{broken_pdf, write_multi_page_pdf, write_pdf};

fn docqa_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_docqa"))
}

/// Temp workspace with `data/` holding one readable PDF.
fn setup_workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let data = tmp.path().join("data");
    fs::create_dir(&data).unwrap();
    write_pdf(&data, "sky.pdf", "The sky is blue.");
    tmp
}

fn docqa(root: &Path) -> Command {
    let mut cmd = Command::new(docqa_binary());
    cmd.current_dir(root)
        .env_remove("GOOGLE_API_KEY")
        .env_remove("DOCQA_QUESTION")
        .env_remove("RUST_LOG");
    cmd
}

fn run_with_stdin(mut cmd: Command, input: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

/// Config pointing the model client at a port nothing listens on.
fn write_unreachable_llm_config(root: &Path) -> PathBuf {
    let path = root.join("docqa.toml");
    fs::write(
        &path,
        r#"
[llm]
base_url = "http://127.0.0.1:9/v1beta"
timeout_secs = 5
"#,
    )
    .unwrap();
    path
}

#[test]
fn test_index_reports_counts() {
    let tmp = setup_workspace();
    let output = docqa(tmp.path()).arg("index").output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "index failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Documents: 1 files, 1 pages"), "{}", stdout);
    assert!(stdout.contains("Skipped:   0"));
    assert!(stdout.contains("Chunks:    1"));
    assert!(stdout.contains("Embedder:  tfidf"));
}

#[test]
fn test_index_counts_every_page() {
    let tmp = setup_workspace();
    write_multi_page_pdf(
        &tmp.path().join("data"),
        "atlas.pdf",
        &["Bread is baked from flour.", "Grass is green."],
    );
    let output = docqa(tmp.path()).arg("index").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Documents: 2 files, 3 pages"), "{}", stdout);
    assert!(stdout.contains("Chunks:    3"));
}

#[test]
fn test_verbose_overrides_rust_log() {
    let tmp = setup_workspace();
    let output = docqa(tmp.path())
        .args(["--verbose", "index"])
        .env("RUST_LOG", "error")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("documents loaded"));

    let quiet = docqa(tmp.path())
        .arg("index")
        .env("RUST_LOG", "error")
        .output()
        .unwrap();
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("documents loaded"));
}

#[test]
fn test_index_skips_broken_pdf_and_other_files() {
    let tmp = setup_workspace();
    let data = tmp.path().join("data");
    fs::write(data.join("broken.pdf"), broken_pdf()).unwrap();
    fs::write(data.join("notes.txt"), "The grass is green.").unwrap();

    let output = docqa(tmp.path()).arg("index").output().unwrap();
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Documents: 1 files"), "{}", stdout);
    assert!(stdout.contains("Skipped:   1"));
    assert!(stdout.contains("broken.pdf"));
    assert!(!stdout.contains("notes.txt"));
}

#[test]
fn test_index_abort_policy_fails_on_broken_pdf() {
    let tmp = setup_workspace();
    fs::write(tmp.path().join("data/broken.pdf"), broken_pdf()).unwrap();
    fs::write(
        tmp.path().join("strict.toml"),
        "[documents]\non_error = \"abort\"\n",
    )
    .unwrap();

    let output = docqa(tmp.path())
        .args(["--config", "strict.toml", "index"])
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("broken.pdf"), "{}", stderr);
}

#[test]
fn test_index_data_override_and_missing_folder() {
    let tmp = setup_workspace();
    let output = docqa(tmp.path())
        .args(["index", "--data", "nowhere"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nowhere"));
}

#[test]
fn test_explicit_missing_config_is_error() {
    let tmp = setup_workspace();
    let output = docqa(tmp.path())
        .args(["--config", "absent.toml", "index"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.toml"));
}

#[test]
fn test_invalid_chunking_config_rejected() {
    let tmp = setup_workspace();
    fs::write(
        tmp.path().join("docqa.toml"),
        "[chunking]\nchunk_size = 50\nchunk_overlap = 50\n",
    )
    .unwrap();
    let output = docqa(tmp.path()).arg("index").output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("chunk_overlap"));
}

#[test]
fn test_ask_without_key_fails_before_loading() {
    // No data folder at all: the key check must come first.
    let tmp = TempDir::new().unwrap();
    let output = docqa(tmp.path())
        .args(["ask", "--question", "What color is the sky?"])
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("GOOGLE_API_KEY"), "{}", stderr);
    assert!(!stderr.contains("does not exist"));
}

#[test]
fn test_key_read_from_dotenv_file() {
    let tmp = setup_workspace();
    fs::write(tmp.path().join(".env"), "GOOGLE_API_KEY=from-dotenv\n").unwrap();
    let mut cmd = docqa(tmp.path());
    cmd.arg("ask");
    let output = run_with_stdin(cmd, "exit\n");
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_interactive_exit_answers_nothing() {
    let tmp = setup_workspace();
    let mut cmd = docqa(tmp.path());
    cmd.arg("ask").env("GOOGLE_API_KEY", "test-key");
    let output = run_with_stdin(cmd, "exit\n");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Ask a question (or type 'exit'):"));
    assert!(!stdout.contains("Answer:"));
}

#[test]
fn test_interactive_end_of_input_terminates() {
    let tmp = setup_workspace();
    let mut cmd = docqa(tmp.path());
    cmd.arg("ask").env("GOOGLE_API_KEY", "test-key");
    let output = run_with_stdin(cmd, "");
    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Answer:"));
}

#[test]
fn test_interactive_reports_failed_call_and_continues() {
    let tmp = setup_workspace();
    write_unreachable_llm_config(tmp.path());
    let mut cmd = docqa(tmp.path());
    cmd.arg("ask").env("GOOGLE_API_KEY", "test-key");
    let output = run_with_stdin(cmd, "What color is the sky?\nexit\n");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Error:"), "{}", stdout);
    assert_eq!(stdout.matches("Ask a question").count(), 2);
}

#[test]
fn test_batch_failed_call_exits_nonzero() {
    let tmp = setup_workspace();
    write_unreachable_llm_config(tmp.path());
    let output = docqa(tmp.path())
        .arg("ask")
        .env("GOOGLE_API_KEY", "test-key")
        .env("DOCQA_QUESTION", "exit")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("gemini-2.0-flash request failed"), "{}", stderr);
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Ask a question"));
}

#[test]
fn test_ping_without_key_fails() {
    let tmp = TempDir::new().unwrap();
    let output = docqa(tmp.path()).arg("ping").output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("GOOGLE_API_KEY"));
}
