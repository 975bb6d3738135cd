//! Generative text backends.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod providers;

pub use providers::GeminiProvider;

/// A hosted model that turns a prompt into a single text answer.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_p: 0.9,
            top_k: 40,
            max_output_tokens: 500,
        }
    }
}
