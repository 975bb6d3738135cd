//! CLI handler for inspecting configuration.

use crate::config::Config;
use anyhow::{Context, Result};

pub fn handle_config_command() -> Result<()> {
    let path = Config::config_path()?;
    let config = Config::load()?;

    println!("Config file: {}", path.display());
    println!();
    let rendered =
        toml::to_string_pretty(&config.redacted()).context("Failed to render config")?;
    print!("{}", rendered);

    if config.gemini.require_api_key().is_err() {
        println!();
        println!("Warning: no Gemini API key configured. Set GEMINI_API_KEY to enable analysis.");
    }

    Ok(())
}
