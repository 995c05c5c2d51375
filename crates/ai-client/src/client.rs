use crate::error::AiError;
use crate::responses::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use async_trait::async_trait;
use configuration::AiSettings;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use std::sync::Arc;

/// Returned when the service answers successfully but without any text.
pub const EMPTY_RESPONSE: &str = "No analysis available";

/// The abstract interface to a text-generation service.
///
/// `FinancialAi` only depends on this trait, so the production HTTP client can be
/// swapped for an in-process stub.
#[async_trait]
pub trait NarrativeClient: Send + Sync {
    /// Sends one system/user prompt pair and returns the generated text.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, AiError>;
}

#[async_trait]
impl<T: NarrativeClient + ?Sized> NarrativeClient for Arc<T> {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, AiError> {
        (**self).complete(system_prompt, user_prompt).await
    }
}

/// A `NarrativeClient` for OpenRouter's chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f64,
}

impl OpenRouterClient {
    /// Builds the client, baking the bearer token and attribution headers into every request.
    pub fn new(settings: &AiSettings) -> Result<Self, AiError> {
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| AiError::NotConfigured("missing API key".to_string()))?;

        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| AiError::InvalidHeader("Authorization"))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            "HTTP-Referer",
            HeaderValue::from_str(&settings.referer)
                .map_err(|_| AiError::InvalidHeader("HTTP-Referer"))?,
        );
        headers.insert(
            "X-Title",
            HeaderValue::from_str(&settings.title).map_err(|_| AiError::InvalidHeader("X-Title"))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl NarrativeClient for OpenRouterClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, AiError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self.client.post(&self.base_url).json(&body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to decode error response".to_string());
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response.json().await?;
        Ok(parsed
            .into_content()
            .unwrap_or_else(|| EMPTY_RESPONSE.to_string()))
    }
}
