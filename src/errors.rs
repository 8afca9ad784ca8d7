use crate::api::ApiResponse;
use axum::{http::StatusCode, response::Json};
use tracing::{error, warn};

/// Failure of a single provider attempt. The router treats every variant as
/// "move on to the next provider".
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{0} is not configured")]
    MissingCredential(String),

    #[error("{provider} client unavailable: {reason}")]
    Dependency { provider: String, reason: String },

    #[error("{provider} request failed: {source}")]
    Transport {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API request failed with status {status}: {body}")]
    Api {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("{0} returned no usable content")]
    EmptyResponse(String),

    #[error("no adapter registered for provider '{0}'")]
    NotRegistered(String),
}

/// Errors surfaced by the public tutor operations.
#[derive(Debug, thiserror::Error)]
pub enum TutorError {
    #[error("Could not generate a response. Last error: {last_error}")]
    ProvidersExhausted { last_error: String },

    #[error("Model response is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Model response has an unexpected shape: {0}")]
    InvalidResponse(String),
}

/// Centralized error types for consistent API error handling
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("LLM service error: {0}")]
    LLMError(String),

    #[error("Invalid model response: {0}")]
    InvalidModelResponse(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

/// Error context for structured logging
#[derive(Debug)]
pub struct ErrorContext {
    pub operation: String,
    pub grade: Option<String>,
    pub topic: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            grade: None,
            topic: None,
        }
    }

    pub fn with_grade(mut self, grade: &str) -> Self {
        self.grade = Some(grade.to_string());
        self
    }

    pub fn with_topic(mut self, topic: &str) -> Self {
        self.topic = Some(topic.to_string());
        self
    }
}

impl ApiError {
    /// Convert API error to HTTP response with consistent structure and logging
    pub fn to_response_with_context(
        self,
        context: ErrorContext,
    ) -> (StatusCode, Json<ApiResponse<()>>) {
        match &self {
            ApiError::ValidationError(_) => {
                warn!(
                    operation = %context.operation,
                    grade = ?context.grade,
                    topic = ?context.topic,
                    error = %self,
                    "Validation error"
                );
                (
                    StatusCode::BAD_REQUEST,
                    Json(ApiResponse::error(self.to_string())),
                )
            }
            ApiError::LLMError(_) => {
                error!(
                    operation = %context.operation,
                    grade = ?context.grade,
                    topic = ?context.topic,
                    error = %self,
                    "LLM service error"
                );
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(ApiResponse::error(
                        "AI service temporarily unavailable. Please try again.".to_string(),
                    )),
                )
            }
            ApiError::InvalidModelResponse(_) => {
                error!(
                    operation = %context.operation,
                    grade = ?context.grade,
                    topic = ?context.topic,
                    error = %self,
                    "Model returned an unusable response"
                );
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ApiResponse::error(
                        "The AI response could not be understood. Please try again.".to_string(),
                    )),
                )
            }
            ApiError::InternalError(_) => {
                error!(
                    operation = %context.operation,
                    grade = ?context.grade,
                    topic = ?context.topic,
                    error = %self,
                    "Internal server error"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ApiResponse::error(
                        "An internal error occurred. Please try again.".to_string(),
                    )),
                )
            }
        }
    }

    /// Simple conversion without context
    pub fn to_response(self) -> (StatusCode, Json<ApiResponse<()>>) {
        self.to_response_with_context(ErrorContext::new("unknown"))
    }
}

impl From<TutorError> for ApiError {
    fn from(err: TutorError) -> Self {
        match err {
            TutorError::ProvidersExhausted { .. } => ApiError::LLMError(err.to_string()),
            TutorError::Json(_) | TutorError::InvalidResponse(_) => {
                ApiError::InvalidModelResponse(err.to_string())
            }
        }
    }
}
