//! Structured logging macros shared by the API handlers, the fallback router
//! and startup code, so every event carries the same field names.

// ============================================================================
// API Operation Logging Macros
// ============================================================================

/// Log the start of an API operation with consistent fields
#[macro_export]
macro_rules! log_api_start {
    ($operation:expr, grade = $grade:expr, topic = $topic:expr) => {
        tracing::debug!(
            operation = $operation,
            grade = %$grade,
            topic = %$topic,
            "API operation started"
        );
    };
    ($operation:expr, grade = $grade:expr) => {
        tracing::debug!(
            operation = $operation,
            grade = %$grade,
            "API operation started"
        );
    };
    ($operation:expr) => {
        tracing::debug!(
            operation = $operation,
            "API operation started"
        );
    };
}

/// Log successful completion of an API operation
#[macro_export]
macro_rules! log_api_success {
    ($operation:expr, grade = $grade:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            grade = %$grade,
            "API operation completed: {}", $msg
        );
    };
    ($operation:expr, $msg:expr) => {
        tracing::info!(
            operation = $operation,
            "API operation completed: {}", $msg
        );
    };
}

/// Log API operation errors with consistent structure
#[macro_export]
macro_rules! log_api_error {
    ($operation:expr, grade = $grade:expr, error = $error:expr, $msg:expr) => {
        tracing::error!(
            operation = $operation,
            grade = %$grade,
            error = %$error,
            "API operation failed: {}", $msg
        );
    };
    ($operation:expr, error = $error:expr, $msg:expr) => {
        tracing::error!(
            operation = $operation,
            error = %$error,
            "API operation failed: {}", $msg
        );
    };
}

// ============================================================================
// LLM Service Logging Macros
// ============================================================================

/// Log LLM operations with provider context
#[macro_export]
macro_rules! log_llm_operation {
    (start, $operation:expr, provider = $provider:expr, attempt = $attempt:expr) => {
        tracing::debug!(
            component = "llm_router",
            operation = $operation,
            provider = %$provider,
            attempt = $attempt,
            "LLM attempt started"
        );
    };
    (success, $operation:expr, provider = $provider:expr, duration_ms = $duration:expr, response_length = $len:expr) => {
        tracing::info!(
            component = "llm_router",
            operation = $operation,
            provider = %$provider,
            duration_ms = $duration,
            response_length = $len,
            "LLM operation completed successfully"
        );
    };
    (fallback, $operation:expr, provider = $provider:expr, error = $error:expr) => {
        tracing::warn!(
            component = "llm_router",
            operation = $operation,
            provider = %$provider,
            error = %$error,
            "LLM provider failed, trying next provider"
        );
    };
    (exhausted, $operation:expr, attempts = $attempts:expr, error = $error:expr) => {
        tracing::error!(
            component = "llm_router",
            operation = $operation,
            attempts = $attempts,
            error = %$error,
            "All LLM providers failed"
        );
    };
    (warn, $operation:expr, $msg:expr) => {
        tracing::warn!(
            component = "llm_router",
            operation = $operation,
            "LLM operation warning: {}", $msg
        );
    };
}

// ============================================================================
// System Event Logging Macros
// ============================================================================

/// Log system startup and shutdown events
#[macro_export]
macro_rules! log_system_event {
    (startup, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "startup",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (config, $msg:expr) => {
        tracing::info!(event_type = "configuration", "System event: {}", $msg);
    };
}

// ============================================================================
// Validation Logging Macros
// ============================================================================

/// Log validation results consistently
#[macro_export]
macro_rules! log_validation {
    (success, $component:expr, $msg:expr) => {
        tracing::debug!(
            event_type = "validation",
            component = $component,
            result = "success",
            "Validation completed: {}", $msg
        );
    };
    (failure, $component:expr, error = $error:expr) => {
        tracing::warn!(
            event_type = "validation",
            component = $component,
            result = "failure",
            error = %$error,
            "Validation failed"
        );
    };
}
