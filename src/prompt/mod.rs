//! Instruction prompt sent ahead of every user message.

/// Default system prompt asking the model for the headings the normalizer expects.
pub const SENTIMENT_PROMPT: &str = "You are a sentiment analysis assistant. Analyze the text and provide:
1. Sentiment classification (Positive/Negative/Neutral)
2. Confidence score as a percentage between 0-100% (always use percentage format, not decimal)
3. Explanation of your reasoning
4. Key words/phrases that influenced your decision

Format your response with these exact headings:
**Sentiment:** [Positive/Negative/Neutral]
**Confidence:** [X]% (always include the % symbol)
**Explanation:** [Your explanation here]
**Key Indicators:** [List of words/phrases]";

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    system: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(SENTIMENT_PROMPT)
    }
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
        }
    }

    /// Uses the configured override when present, otherwise the built-in prompt.
    pub fn from_override(system: Option<&str>) -> Self {
        match system {
            Some(text) if !text.trim().is_empty() => Self::new(text),
            _ => Self::default(),
        }
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    /// Combine the system prompt with the user's message.
    pub fn build(&self, message: &str) -> String {
        format!(
            "{}\n\nAnalyze the following text:\n{}",
            self.system, message
        )
    }
}
