//! End-to-end CLI tests using `assert_cmd`.
//!
//! These tests invoke the actual compiled binary and verify exit codes
//! and output. None of them reach the Gemini API: the configuration
//! directory points at a temp dir and the key variables are cleared or
//! set to a dummy value.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

/// Command with an isolated config directory and no credential.
fn cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("medibot").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("MEDIBOT_MODEL")
        .env_remove("RUST_LOG");
    cmd
}

fn home() -> TempDir {
    tempdir().unwrap()
}

// ─── Help / version ─────────────────────────────────────────────────────

#[test]
fn test_help_shows_commands() {
    let home = home();
    cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("ask"))
        .stdout(predicate::str::contains("extract"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_version_shows_name() {
    let home = home();
    cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("medibot"));
}

// ─── Argument validation ────────────────────────────────────────────────

#[test]
fn test_ask_requires_pdf_and_question() {
    let home = home();
    cmd(home.path())
        .arg("ask")
        .assert()
        .failure()
        .stderr(predicate::str::contains("PDF"));

    cmd(home.path())
        .args(["ask", "report.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("QUESTION"));
}

#[test]
fn test_chat_help_lists_repl_commands() {
    let home = home();
    cmd(home.path())
        .args(["chat", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/open"))
        .stdout(predicate::str::contains("--model"));
}

// ─── Configuration error screen ─────────────────────────────────────────

#[test]
fn test_ask_without_key_shows_configuration_error() {
    let home = home();
    cmd(home.path())
        .args(["ask", "/does/not/exist.pdf", "What is the diagnosis?"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Configuration Error"))
        .stdout(predicate::str::contains("API_KEY"))
        // The document is never opened without a credential.
        .stdout(predicate::str::contains("couldn't process").not());
}

#[test]
fn test_chat_without_key_shows_configuration_error() {
    let home = home();
    cmd(home.path())
        .arg("chat")
        .write_stdin("hello\n")
        .assert()
        .failure()
        .stdout(predicate::str::contains("Configuration Error"));
}

#[test]
fn test_empty_key_in_config_is_still_missing() {
    let home = home();
    let config_dir = home.path().join(".config").join("medibot");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(config_dir.join("config.toml"), "[gemini]\napi_key = \"\"\n").unwrap();

    cmd(home.path())
        .args(["ask", "report.pdf", "q"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Configuration Error"));
}

// ─── Extraction failures ────────────────────────────────────────────────

#[test]
fn test_extract_rejects_non_pdf() {
    let home = home();
    let file = home.path().join("notes.txt");
    fs::write(&file, "plain text").unwrap();

    cmd(home.path())
        .args(["extract", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file type"));
}

#[test]
fn test_extract_missing_file() {
    let home = home();
    cmd(home.path())
        .args(["extract", "/does/not/exist.pdf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read PDF file"));
}

#[test]
fn test_extract_corrupt_pdf() {
    let home = home();
    let file = home.path().join("broken.pdf");
    fs::write(&file, "this is not really a pdf").unwrap();

    cmd(home.path())
        .args(["extract", file.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to extract text from PDF"));
}

#[test]
fn test_ask_with_corrupt_pdf_reports_in_transcript() {
    let home = home();
    let file = home.path().join("broken.pdf");
    fs::write(&file, "this is not really a pdf").unwrap();

    cmd(home.path())
        .env("API_KEY", "dummy-key")
        .args(["ask", file.to_str().unwrap(), "What is the diagnosis?"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Sorry, I couldn't process that PDF. Please try another one. Error:",
        ));
}

// ─── Interactive chat without network ───────────────────────────────────

#[test]
fn test_chat_help_and_quit() {
    let home = home();
    cmd(home.path())
        .env("API_KEY", "dummy-key")
        .arg("chat")
        .write_stdin("/help\n/quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("/open <path>"))
        .stdout(predicate::str::contains("/reset"));
}

#[test]
fn test_chat_question_without_document_is_refused() {
    let home = home();
    cmd(home.path())
        .env("API_KEY", "dummy-key")
        .arg("chat")
        .write_stdin("What is the dose?\n/status\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Load a document first"))
        .stdout(predicate::str::contains("no document"));
}

#[test]
fn test_chat_open_failure_then_history() {
    let home = home();
    let file = home.path().join("broken.pdf");
    fs::write(&file, "garbage").unwrap();

    // End of input waits for the extraction to settle before exiting.
    cmd(home.path())
        .env("API_KEY", "dummy-key")
        .args(["chat", file.to_str().unwrap()])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("couldn't process that PDF"));
}

#[test]
fn test_chat_piped_question_waits_for_extraction() {
    let home = home();
    let file = home.path().join("broken.pdf");
    fs::write(&file, "garbage").unwrap();

    // The question is read only after the document has settled, so it is
    // answered against the failed load rather than refused as premature.
    cmd(home.path())
        .env("API_KEY", "dummy-key")
        .args(["chat", file.to_str().unwrap()])
        .write_stdin("What is the dose?\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("couldn't process that PDF"))
        .stdout(predicate::str::contains("Load a document first"))
        .stdout(predicate::str::contains("Still processing").not());
}

#[test]
fn test_extract_rejects_zero_max_chars() {
    let home = home();
    cmd(home.path())
        .args(["extract", "report.pdf", "--max-chars", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-chars"));
}

// ─── Init ───────────────────────────────────────────────────────────────

#[test]
fn test_init_writes_config_once() {
    let home = home();
    cmd(home.path()).arg("init").assert().success();

    let config_path = home.path().join(".config").join("medibot").join("config.toml");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("gemini-2.5-flash"));
    assert!(content.contains("${GEMINI_API_KEY}"));
    assert!(content.contains("max_context_length = 100000"));

    cmd(home.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}
