use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use amplify_core::config::{LlmConfig, LlmProvider};

use crate::error::ProposalError;

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ProposalError>;
}

/// Chat-completions client for the OpenAI API.
#[derive(Clone)]
pub struct OpenAiTextGenerator {
    client: Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiTextGenerator {
    /// Returns `None` when generation is disabled, which sends every proposal
    /// through the local template.
    pub fn from_config(config: &LlmConfig) -> Result<Option<Self>, ProposalError> {
        if config.provider == LlmProvider::Disabled {
            return Ok(None);
        }
        let api_key = config.api_key.clone().ok_or_else(|| {
            ProposalError::Configuration("llm.api_key is required for openai".to_string())
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| ProposalError::Configuration(error.to_string()))?;

        Ok(Some(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, ProposalError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: prompt },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|error| {
                warn!(error = %error, "chat completion request failed");
                ProposalError::Generation(format!("chat completion request failed: {error}"))
            })?;

        if !response.status().is_success() {
            return Err(ProposalError::Generation(format!(
                "chat completion endpoint returned {}",
                response.status()
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|error| {
            ProposalError::Generation(format!("failed to decode chat completion: {error}"))
        })?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProposalError::Generation("chat completion had no content".to_string()))
    }
}
