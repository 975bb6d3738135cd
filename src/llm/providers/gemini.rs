use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::llm::{GenerationConfig, GenerativeModel};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
    status: Option<String>,
    code: Option<u16>,
}

pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
    generation: GenerationConfig,
}

impl GeminiProvider {
    pub fn new(
        api_key: String,
        model: Option<String>,
        endpoint: Option<String>,
        generation: GenerationConfig,
    ) -> Result<Self> {
        let client = reqwest::Client::new();
        let endpoint = endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        let model = model.unwrap_or_else(|| DEFAULT_MODEL.to_string());

        info!(
            "Initialized Gemini provider with model {} at {}",
            model, endpoint
        );

        Ok(Self {
            client,
            api_key,
            endpoint,
            model,
            generation,
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

/// Joins the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .context("Gemini API returned no candidates")?;

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(anyhow::anyhow!(
            "Gemini API returned an empty answer (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        ));
    }

    Ok(text)
}

/// Renders `message (STATUS, code)`, listing only the fields the API sent.
fn describe_error(detail: &ErrorDetail) -> String {
    let mut extras = Vec::new();
    if let Some(status) = &detail.status {
        extras.push(status.clone());
    }
    if let Some(code) = detail.code {
        extras.push(code.to_string());
    }

    if extras.is_empty() {
        detail.message.clone()
    } else {
        format!("{} ({})", detail.message, extras.join(", "))
    }
}

#[async_trait]
impl GenerativeModel for GeminiProvider {
    fn name(&self) -> &'static str {
        "Gemini API"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: &self.generation,
        };

        debug!(
            "Sending {} char prompt to Gemini model {}",
            prompt.len(),
            self.model
        );

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read response body")?;

        if !status.is_success() {
            error!(
                "Gemini API request failed with status {}: {}",
                status, response_text
            );

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&response_text) {
                return Err(anyhow::anyhow!(
                    "Gemini API error: {}",
                    describe_error(&error_response.error)
                ));
            }

            return Err(anyhow::anyhow!(
                "Gemini API request failed with status {}: {}",
                status,
                response_text
            ));
        }

        let parsed: GenerateResponse = serde_json::from_str(&response_text)
            .context("Failed to parse Gemini response")?;
        let text = extract_text(parsed)?;

        info!("Generation complete: {} chars", text.len());
        debug!("Raw answer: {}", text);

        Ok(text)
    }
}
