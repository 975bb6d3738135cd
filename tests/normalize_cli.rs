//! End-to-end tests for the `normalize` command and the library pipeline.
//!
//! These run the built binary and never contact the Gemini API.

use std::io::Write;
use std::process::{Command, Stdio};

fn sentiscope() -> Command {
    Command::new(env!("CARGO_BIN_EXE_sentiscope"))
}

#[test]
fn test_normalize_argument() {
    let output = sentiscope()
        .args(["normalize", "Confidence: 0.85"])
        .output()
        .expect("Failed to run sentiscope");

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "**Confidence:** 85%\n");
}

#[test]
fn test_normalize_stdin() {
    let mut child = sentiscope()
        .arg("normalize")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to spawn sentiscope");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"**Sentiment:** Neutral\nConfidence score: 120\n")
        .unwrap();

    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "**Sentiment:** Neutral\n**Confidence:** 100%\n"
    );
}

#[test]
fn test_version_command() {
    let output = sentiscope().arg("version").output().unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Sentiscope "));
}
