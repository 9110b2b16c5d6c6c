//! Unified error handling
//!
//! Structured error types with context, recovery suggestions, and proper
//! error chaining. Every failure the client can encounter maps onto one of
//! these variants; presentation surfaces only ever see `user_message()`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, warn};

pub type LensResult<T> = Result<T, LensError>;

/// Error context providing additional information for debugging and recovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Timestamp when error occurred
    pub timestamp: DateTime<Utc>,
    /// Component where error originated
    pub component: String,
    /// Operation being performed when error occurred
    pub operation: Option<String>,
    /// Recovery suggestions
    pub recovery_suggestions: Vec<String>,
}

impl ErrorContext {
    pub fn new(component: &str) -> Self {
        Self {
            error_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            component: component.to_string(),
            operation: None,
            recovery_suggestions: Vec::new(),
        }
    }

    pub fn with_operation(mut self, operation: &str) -> Self {
        self.operation = Some(operation.to_string());
        self
    }

    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.recovery_suggestions.push(suggestion.to_string());
        self
    }
}

/// Main error type for the RepoLens client
#[derive(Error, Debug)]
pub enum LensError {
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
        context: ErrorContext,
    },

    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("Analysis service error: {message}")]
    Service {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        context: ErrorContext,
    },
}

impl LensError {
    /// Get the error context
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            LensError::Config { context, .. } => Some(context),
            LensError::Validation { context, .. } => Some(context),
            LensError::Network { context, .. } => Some(context),
            LensError::Service { context, .. } => Some(context),
            LensError::Internal { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Check if error is recoverable by simply trying again
    pub fn is_recoverable(&self) -> bool {
        match self {
            LensError::Network { .. } => true,
            LensError::Service { .. } => true,
            LensError::Config { .. } => false,
            LensError::Validation { .. } => false,
            _ => false,
        }
    }

    /// Short message suitable for direct display to the user
    pub fn user_message(&self) -> String {
        match self {
            LensError::Validation { message, .. } => message.clone(),
            LensError::Network { .. } => {
                "Failed to reach the analysis service. Check your network connection and try again."
                    .to_string()
            }
            LensError::Service { message, .. } => {
                format!("Failed to analyze repository: {}", message)
            }
            LensError::Config { message, .. } => {
                format!("Configuration problem: {}", message)
            }
            _ => "An unexpected error occurred. Consult the diagnostic logs for details."
                .to_string(),
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            LensError::Network { .. } | LensError::Service { .. } => {
                warn!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Service call failed (may be recoverable)"
                );
            }
            _ => {
                error!(
                    error_id = ?self.context().map(|c| &c.error_id),
                    error = %self,
                    "Error occurred"
                );
            }
        }
    }
}
