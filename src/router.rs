use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{LLMConfig, ProviderOrder};
use crate::errors::{ProviderError, TutorError};
use crate::llm_providers::{CompletionProvider, LLMProviderFactory, LLMProviderType};

// Import logging macros
use crate::log_llm_operation;

/// Anything that can turn a prompt into raw model text.
///
/// The tutor operations depend on this rather than on the router directly so
/// they can be exercised with stubs.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, TutorError>;
}

/// Adapters keyed by provider type
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<LLMProviderType, Arc<dyn CompletionProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the real HTTP adapter for every known provider
    pub fn from_config(config: &LLMConfig) -> Self {
        let mut registry = Self::new();
        for provider_type in ProviderOrder::DEFAULT {
            let adapter = LLMProviderFactory::create_provider(provider_type, config.provider(provider_type));
            registry.register(provider_type, adapter);
        }
        registry
    }

    pub fn register(&mut self, provider_type: LLMProviderType, provider: Arc<dyn CompletionProvider>) {
        self.providers.insert(provider_type, provider);
    }

    pub fn get(&self, provider_type: LLMProviderType) -> Option<&Arc<dyn CompletionProvider>> {
        self.providers.get(&provider_type)
    }
}

/// Tries each provider in the configured order and returns the first answer.
///
/// Every call starts again from the first provider; nothing is remembered
/// between calls.
#[derive(Clone)]
pub struct FallbackRouter {
    registry: ProviderRegistry,
    order: ProviderOrder,
}

impl FallbackRouter {
    pub fn new(registry: ProviderRegistry, order: ProviderOrder) -> Self {
        Self { registry, order }
    }

    pub fn from_config(config: &LLMConfig) -> Self {
        Self::new(ProviderRegistry::from_config(config), config.order.clone())
    }

    pub fn order(&self) -> &ProviderOrder {
        &self.order
    }

    async fn attempt(&self, provider_type: LLMProviderType, prompt: &str) -> Result<String, ProviderError> {
        let provider = self
            .registry
            .get(provider_type)
            .ok_or_else(|| ProviderError::NotRegistered(provider_type.to_string()))?;
        provider.complete(prompt).await
    }
}

#[async_trait]
impl TextGenerator for FallbackRouter {
    async fn generate(&self, prompt: &str) -> Result<String, TutorError> {
        let mut last_error: Option<ProviderError> = None;

        for (index, provider_type) in self.order.providers().iter().enumerate() {
            log_llm_operation!(start, "generate", provider = provider_type, attempt = index + 1);
            let start = Instant::now();

            match self.attempt(*provider_type, prompt).await {
                Ok(text) => {
                    log_llm_operation!(
                        success,
                        "generate",
                        provider = provider_type,
                        duration_ms = start.elapsed().as_millis() as u64,
                        response_length = text.len()
                    );
                    return Ok(text);
                }
                Err(e) => {
                    log_llm_operation!(fallback, "generate", provider = provider_type, error = e);
                    last_error = Some(e);
                }
            }
        }

        let last_error = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no providers configured".to_string());
        log_llm_operation!(
            exhausted,
            "generate",
            attempts = self.order.providers().len(),
            error = last_error
        );

        Err(TutorError::ProvidersExhausted { last_error })
    }
}
