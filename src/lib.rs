pub mod api;
pub mod config;
pub mod curriculum;
pub mod errors;
pub mod llm_providers;
pub mod logging;
pub mod models;
pub mod normalizer;
pub mod prompts;
pub mod router;
pub mod tutor_service;

pub use config::{Config, ProviderConfig, ProviderOrder, SecretsStore};
pub use errors::*;
pub use llm_providers::{CompletionProvider, LLMProviderFactory, LLMProviderType};
pub use models::*;
pub use normalizer::{clean_json_text, is_number, normalize_number};
pub use router::{FallbackRouter, ProviderRegistry, TextGenerator};
pub use tutor_service::TutorService;
