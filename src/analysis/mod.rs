//! Sentiment analysis pipeline: prompt, generate, normalize.

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::llm::GenerativeModel;
use crate::normalizer::TextNormalizer;
use crate::prompt::PromptTemplate;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No message provided")]
    EmptyMessage,
    #[error(transparent)]
    Upstream(anyhow::Error),
}

pub struct SentimentAnalyzer {
    model: Arc<dyn GenerativeModel>,
    prompt: PromptTemplate,
    normalizer: Arc<dyn TextNormalizer>,
}

impl SentimentAnalyzer {
    pub fn new(
        model: Arc<dyn GenerativeModel>,
        prompt: PromptTemplate,
        normalizer: Arc<dyn TextNormalizer>,
    ) -> Self {
        Self {
            model,
            prompt,
            normalizer,
        }
    }

    pub fn model_name(&self) -> &'static str {
        self.model.name()
    }

    /// Run one message through the model and normalize the answer.
    pub async fn analyze(&self, message: &str) -> Result<String, AnalysisError> {
        if message.trim().is_empty() {
            return Err(AnalysisError::EmptyMessage);
        }

        let full_prompt = self.prompt.build(message);
        info!(
            "Analyzing {} char message with {}",
            message.len(),
            self.model.name()
        );

        let answer = self
            .model
            .generate(&full_prompt)
            .await
            .map_err(AnalysisError::Upstream)?;

        debug!("Running {}", self.normalizer.name());
        Ok(self.normalizer.normalize(&answer))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::normalizer::ConfidenceNormalizer;
    use async_trait::async_trait;
    use tokio::sync::Mutex;

    /// Model double that records prompts and replays a fixed answer.
    pub(crate) struct ScriptedModel {
        pub answer: Result<String, String>,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedModel {
        pub(crate) fn answering(answer: &str) -> Self {
            Self {
                answer: Ok(answer.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn failing(message: &str) -> Self {
            Self {
                answer: Err(message.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        fn name(&self) -> &'static str {
            "ScriptedModel"
        }

        async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
            self.prompts.lock().await.push(prompt.to_string());
            self.answer.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    pub(crate) fn analyzer(model: Arc<ScriptedModel>) -> SentimentAnalyzer {
        SentimentAnalyzer::new(
            model,
            PromptTemplate::new("Rate it."),
            Arc::new(ConfidenceNormalizer::new().unwrap()),
        )
    }

    #[tokio::test]
    async fn test_analyze_normalizes_answer() {
        let model = Arc::new(ScriptedModel::answering(
            "**Sentiment:** Positive\nConfidence: 0.85",
        ));
        let analyzer = analyzer(model.clone());

        let result = analyzer.analyze("Great product").await.unwrap();

        assert_eq!(result, "**Sentiment:** Positive\n**Confidence:** 85%");
        let prompts = model.prompts.lock().await;
        assert_eq!(prompts.len(), 1);
        assert_eq!(
            prompts[0],
            "Rate it.\n\nAnalyze the following text:\nGreat product"
        );
    }

    #[tokio::test]
    async fn test_blank_message_skips_model() {
        let model = Arc::new(ScriptedModel::answering("unused"));
        let analyzer = analyzer(model.clone());

        let err = analyzer.analyze("   ").await.unwrap_err();

        assert!(matches!(err, AnalysisError::EmptyMessage));
        assert!(model.prompts.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_reported() {
        let analyzer = analyzer(Arc::new(ScriptedModel::failing("quota exceeded")));

        let err = analyzer.analyze("hello").await.unwrap_err();

        assert!(matches!(err, AnalysisError::Upstream(_)));
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
