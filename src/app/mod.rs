use crate::analysis::SentimentAnalyzer;
use crate::api::ApiServer;
use crate::config::{Config, ServerConfig};
use crate::llm::{GeminiProvider, GenerativeModel};
use crate::normalizer::{ConfidenceNormalizer, TextNormalizer};
use crate::prompt::PromptTemplate;
use crate::session::SessionManager;
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

pub async fn run_service(port_override: Option<u16>) -> Result<()> {
    info!("Starting Sentiscope service");

    let mut config = Config::load()?;
    if let Some(port) = port_override {
        config.server.port = port;
    }

    let analyzer = Arc::new(build_analyzer(&config)?);
    info!("Analysis backed by {}", analyzer.model_name());

    let sessions = SessionManager::new(
        &config.server.secret_key,
        config.server.session_lifetime_hours,
    );
    if config.server.secret_key == ServerConfig::default().secret_key {
        warn!("Using the built-in session secret; set SECRET_KEY for production");
    }

    let api_server = ApiServer::new(
        config.server.host.clone(),
        config.server.port,
        analyzer,
        sessions,
    );

    info!("Sentiscope is ready!");
    info!(
        "Try: curl -X POST http://{}:{}/chat -H 'Content-Type: application/json' -d '{{\"message\": \"I love this\"}}'",
        config.server.host, config.server.port
    );

    api_server.start().await
}

/// Wire the configured model, prompt and normalizer into an analyzer.
pub fn build_analyzer(config: &Config) -> Result<SentimentAnalyzer> {
    let api_key = config.gemini.require_api_key()?;

    let model: Arc<dyn GenerativeModel> = Arc::new(GeminiProvider::new(
        api_key,
        config.gemini.model.clone(),
        config.gemini.api_endpoint.clone(),
        config.gemini.generation(),
    )?);
    let prompt = PromptTemplate::from_override(config.prompt.system.as_deref());
    let normalizer: Arc<dyn TextNormalizer> = Arc::new(ConfidenceNormalizer::new()?);

    Ok(SentimentAnalyzer::new(model, prompt, normalizer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_analyzer_requires_api_key() {
        let config = Config::default();
        let err = build_analyzer(&config).err().unwrap();
        assert!(err.to_string().contains("No Gemini API key found"));
    }

    #[test]
    fn test_build_analyzer_uses_gemini() {
        let mut config = Config::default();
        config.gemini.api_key = Some("key".to_string());

        let analyzer = build_analyzer(&config).unwrap();
        assert_eq!(analyzer.model_name(), "Gemini API");
    }
}
