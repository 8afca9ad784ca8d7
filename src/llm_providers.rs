use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::ProviderConfig;
use crate::errors::ProviderError;

/// Sampling temperature sent to Groq. Gemini runs with its server default.
pub const GROQ_TEMPERATURE: f32 = 0.4;

/// A backend able to answer a single-turn text prompt.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;

    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LLMProviderType {
    Groq,
    Gemini,
}

impl LLMProviderType {
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "groq" => Some(LLMProviderType::Groq),
            "gemini" => Some(LLMProviderType::Gemini),
            _ => None,
        }
    }

    pub fn identifier(&self) -> &'static str {
        match self {
            LLMProviderType::Groq => "groq",
            LLMProviderType::Gemini => "gemini",
        }
    }

    /// Environment key holding this provider's credential
    pub fn api_key_var(&self) -> &'static str {
        match self {
            LLMProviderType::Groq => "GROQ_API_KEY",
            LLMProviderType::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl fmt::Display for LLMProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Common message structure for chat requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMMessage {
    pub role: String,
    pub content: Option<String>,
}

fn build_client(provider: &str) -> Result<Client, ProviderError> {
    Client::builder().build().map_err(|e| ProviderError::Dependency {
        provider: provider.to_string(),
        reason: e.to_string(),
    })
}

fn require_key(provider_type: LLMProviderType, api_key: &Option<String>) -> Result<&str, ProviderError> {
    match api_key.as_deref() {
        Some(key) if !key.is_empty() => Ok(key),
        _ => Err(ProviderError::MissingCredential(provider_type.api_key_var().to_string())),
    }
}

fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Groq provider, speaking the OpenAI-compatible chat completions API
#[derive(Debug, Clone)]
pub struct GroqProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

/// Groq-specific request structures
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GroqRequest {
    model: String,
    messages: Vec<LLMMessage>,
    temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GroqResponse {
    choices: Vec<GroqChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GroqChoice {
    message: LLMMessage,
}

impl GroqProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client("Groq")?,
            api_key: config.api_key.clone(),
            base_url: trim_base_url(&config.base_url),
            model: config.model_id.clone(),
        })
    }
}

#[async_trait]
impl CompletionProvider for GroqProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = require_key(LLMProviderType::Groq, &self.api_key)?;

        let request_body = GroqRequest {
            model: self.model.clone(),
            messages: vec![LLMMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
            temperature: GROQ_TEMPERATURE,
        };

        info!(
            provider = self.provider_name(),
            model = %self.model,
            base_url = %self.base_url,
            prompt_length = prompt.len(),
            "Making LLM request"
        );

        let transport = |source: reqwest::Error| ProviderError::Transport {
            provider: self.provider_name().to_string(),
            source,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                provider = self.provider_name(),
                status = %status,
                error = %error_text,
                "LLM API request failed"
            );
            return Err(ProviderError::Api {
                provider: self.provider_name().to_string(),
                status: status.as_u16(),
                body: error_text,
            });
        }

        let groq_response: GroqResponse = response.json().await.map_err(transport)?;

        let response_content = groq_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::EmptyResponse(self.provider_name().to_string()))?
            .message
            .content
            .unwrap_or_default();

        info!(
            provider = self.provider_name(),
            response_length = response_content.len(),
            "Successfully received LLM response"
        );

        Ok(response_content)
    }

    fn provider_name(&self) -> &'static str {
        "Groq"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Gemini provider implementation
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

/// Gemini-specific request structures
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

impl GeminiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client("Gemini")?,
            api_key: config.api_key.clone(),
            base_url: trim_base_url(&config.base_url),
            model: config.model_id.clone(),
        })
    }

    /// Resource path for the model, e.g. `models/gemini-2.5-flash`
    pub fn model_path(&self) -> String {
        if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        }
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = require_key(LLMProviderType::Gemini, &self.api_key)?;

        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
        };

        let url = format!("{}/{}:generateContent", self.base_url, self.model_path());

        info!(
            provider = self.provider_name(),
            model = %self.model,
            base_url = %self.base_url,
            prompt_length = prompt.len(),
            "Making LLM request"
        );

        let transport = |source: reqwest::Error| ProviderError::Transport {
            provider: self.provider_name().to_string(),
            source,
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request_body)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                provider = self.provider_name(),
                status = %status,
                error = %error_text,
                "LLM API request failed"
            );
            return Err(ProviderError::Api {
                provider: self.provider_name().to_string(),
                status: status.as_u16(),
                body: error_text,
            });
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(transport)?;

        // A candidate blocked by safety filters carries no content or no parts
        let parts = gemini_response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts)
            .filter(|parts| !parts.is_empty())
            .ok_or_else(|| ProviderError::EmptyResponse(self.provider_name().to_string()))?;

        let response_content: String = parts.into_iter().map(|part| part.text).collect();

        info!(
            provider = self.provider_name(),
            response_length = response_content.len(),
            "Successfully received LLM response"
        );

        Ok(response_content)
    }

    fn provider_name(&self) -> &'static str {
        "Gemini"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Stand-in for a provider whose HTTP client could not be built. Every call
/// reports the construction failure so the router can move on.
pub struct UnavailableProvider {
    provider_type: LLMProviderType,
    model: String,
    reason: String,
}

#[async_trait]
impl CompletionProvider for UnavailableProvider {
    async fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Dependency {
            provider: self.provider_name().to_string(),
            reason: self.reason.clone(),
        })
    }

    fn provider_name(&self) -> &'static str {
        match self.provider_type {
            LLMProviderType::Groq => "Groq",
            LLMProviderType::Gemini => "Gemini",
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Factory for creating LLM providers based on provider type
pub struct LLMProviderFactory;

impl LLMProviderFactory {
    /// Create the adapter for `provider_type`, degrading to an
    /// [`UnavailableProvider`] if its client cannot be constructed
    pub fn create_provider(
        provider_type: LLMProviderType,
        config: &ProviderConfig,
    ) -> Arc<dyn CompletionProvider> {
        let created: Result<Arc<dyn CompletionProvider>, ProviderError> = match provider_type {
            LLMProviderType::Groq => GroqProvider::new(config).map(|p| Arc::new(p) as Arc<dyn CompletionProvider>),
            LLMProviderType::Gemini => GeminiProvider::new(config).map(|p| Arc::new(p) as Arc<dyn CompletionProvider>),
        };

        created.unwrap_or_else(|e| {
            error!(provider = %provider_type, error = %e, "Failed to initialize LLM client");
            Arc::new(UnavailableProvider {
                provider_type,
                model: config.model_id.clone(),
                reason: e.to_string(),
            })
        })
    }
}
