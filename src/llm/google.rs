use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::LlmProviderTrait;
use super::prompts::PromptRequest;
use crate::error::ChatError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

pub struct GoogleProvider {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GoogleRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: SystemInstruction,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Deserialize)]
struct GoogleResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GoogleError>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct GoogleError {
    message: String,
}

impl GoogleProvider {
    pub fn new(api_key: &str, model: &str, base_url: Option<&str>) -> Result<Self, ChatError> {
        if api_key.trim().is_empty() {
            return Err(ChatError::missing_api_key());
        }

        Ok(Self {
            client: Client::new(),
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

fn to_google_request(request: &PromptRequest) -> GoogleRequest {
    GoogleRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![Part {
                text: request.user_content.clone(),
            }],
        }],
        system_instruction: SystemInstruction {
            parts: vec![Part {
                text: request.system_instruction.to_string(),
            }],
        },
        generation_config: GenerationConfig {
            temperature: request.temperature,
        },
    }
}

/// Pull the answer text out of a decoded response. All text parts of the
/// first candidate are concatenated in order.
fn response_text(response: GoogleResponse) -> Result<String> {
    if let Some(error) = response.error {
        anyhow::bail!("Google API error: {}", error.message);
    }

    let candidate = response
        .candidates
        .and_then(|c| c.into_iter().next())
        .context("No candidates in Google response")?;

    let finish_reason = candidate.finish_reason;
    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.is_empty() {
        match finish_reason {
            Some(reason) => anyhow::bail!("No content in Google response (finish reason: {reason})"),
            None => anyhow::bail!("No content in Google response"),
        }
    }

    Ok(text)
}

#[async_trait]
impl LlmProviderTrait for GoogleProvider {
    async fn generate(&self, request: &PromptRequest) -> Result<String> {
        let body = to_google_request(request);

        tracing::info!(model = %self.model, "sending generateContent request");

        let response = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Google API")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Google API error ({}): {}", status, error_text);
        }

        let response: GoogleResponse = response
            .json()
            .await
            .context("Failed to parse Google response")?;

        response_text(response)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}
