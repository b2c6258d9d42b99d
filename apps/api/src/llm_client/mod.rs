//! LLM Client: the single point of entry for all Gemini calls in InterviewHawk.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! All LLM interactions MUST go through `CompletionClient`.
//!
//! Model: gemini-1.5-flash at temperature 0.3 (hardcoded, not configurable)
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// The model used for all LLM calls in InterviewHawk.
pub const MODEL: &str = "gemini-1.5-flash";
/// Low temperature: question and grading output should be repeatable.
pub const TEMPERATURE: f32 = 0.3;

#[cfg(test)]
pub(crate) mod testing;

/// The `Display` text of each variant is what the user sees in place of a
/// model response, so keep it human-readable.
#[derive(Debug, Error, PartialEq)]
pub enum CompletionError {
    #[error("Error: API Key is missing.")]
    MissingCredential,

    #[error("Error connecting to AI: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        CompletionError::Remote(err.to_string())
    }
}

/// One blocking round trip to a hosted text-generation model.
///
/// Carried by `InterviewPipeline` as `Arc<dyn CompletionClient>` so tests can
/// script model output without a network.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        credential: &str,
        system: &str,
        prompt: &str,
    ) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        Some(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

/// Gemini `generateContent` backend.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{MODEL}:generateContent", self.base_url)
    }
}

/// `generateContent` has no system role on this path, so the instruction is
/// folded into the single user turn ahead of the prompt.
fn fold_system_into_prompt(system: &str, prompt: &str) -> String {
    format!("{system}\n\n{prompt}")
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(
        &self,
        credential: &str,
        system: &str,
        prompt: &str,
    ) -> Result<String, CompletionError> {
        if credential.trim().is_empty() {
            return Err(CompletionError::MissingCredential);
        }

        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part {
                    text: fold_system_into_prompt(system, prompt),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: TEMPERATURE,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", credential)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}: {}", status, body);
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Remote(format!(
                "status {}: {message}",
                status.as_u16()
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = body
            .text()
            .ok_or_else(|| CompletionError::Remote("model returned no content".to_string()))?;

        debug!("LLM call succeeded: {} chars", text.len());

        Ok(text)
    }
}
