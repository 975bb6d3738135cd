//! CLI handlers for one-shot analysis and offline normalization.

use crate::app::build_analyzer;
use crate::config::Config;
use crate::normalizer::normalize_confidence;
use anyhow::{bail, Context, Result};
use std::io::Read;

use super::args::TextInputArgs;

/// Take the text argument, or fall back to everything readable from `reader`.
pub fn read_input<R: Read>(text: Option<String>, mut reader: R) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    let mut buffer = String::new();
    reader
        .read_to_string(&mut buffer)
        .context("Failed to read text from stdin")?;
    Ok(buffer)
}

pub async fn handle_analyze_command(args: TextInputArgs) -> Result<()> {
    let message = read_input(args.text, std::io::stdin())?;
    if message.trim().is_empty() {
        bail!("No message provided");
    }

    let config = Config::load()?;
    let analyzer = build_analyzer(&config)?;
    let response = analyzer.analyze(&message).await?;

    println!("{}", response);
    Ok(())
}

pub fn handle_normalize_command(args: TextInputArgs) -> Result<()> {
    let text = read_input(args.text, std::io::stdin())?;
    print!("{}", normalize_confidence(&text));
    if !text.ends_with('\n') {
        println!();
    }
    Ok(())
}
