//! Analysis request controller
//!
//! Owns the lifecycle of a single analysis operation. At most one request is
//! ever outstanding: submission is refused while one is in flight, and a
//! successful result must be dismissed with `reset` before the next
//! submission. Each transition replaces the whole state value, so observers
//! never see a partially updated state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use repolens_core::{ErrorContext, LensError, LensResult};

use crate::api::AnalysisService;
use crate::normalize::build_report;
use crate::raw::RawAnalysis;
use crate::report::AnalysisReport;

/// Substring a submitted URL must contain to be considered a repository URL
pub const REPOSITORY_HOST_MARKER: &str = "github.com";

/// Externally visible lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStatus {
    /// Nothing submitted, or the prior result was dismissed
    Idle,
    /// A network call is outstanding
    Pending,
    /// The service returned a well-formed payload
    Succeeded,
    /// Validation or the network call failed
    Failed,
}

impl Default for AnalysisStatus {
    fn default() -> Self {
        Self::Idle
    }
}

/// Full controller state; the raw result and its report live only in
/// `Succeeded`, the error message only in `Failed`
enum AnalysisState {
    Idle,
    Pending {
        url: String,
    },
    Succeeded {
        url: String,
        raw: RawAnalysis,
        report: AnalysisReport,
    },
    Failed {
        url: String,
        message: String,
    },
}

/// State machine driving one analysis operation at a time
pub struct AnalysisController {
    service: Arc<dyn AnalysisService>,
    state: AnalysisState,
}

impl AnalysisController {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self {
            service,
            state: AnalysisState::Idle,
        }
    }

    pub fn status(&self) -> AnalysisStatus {
        match self.state {
            AnalysisState::Idle => AnalysisStatus::Idle,
            AnalysisState::Pending { .. } => AnalysisStatus::Pending,
            AnalysisState::Succeeded { .. } => AnalysisStatus::Succeeded,
            AnalysisState::Failed { .. } => AnalysisStatus::Failed,
        }
    }

    /// The render-ready report of the latest successful analysis
    pub fn report(&self) -> Option<&AnalysisReport> {
        match &self.state {
            AnalysisState::Succeeded { report, .. } => Some(report),
            _ => None,
        }
    }

    /// The raw payload backing the current report
    pub fn raw_result(&self) -> Option<&RawAnalysis> {
        match &self.state {
            AnalysisState::Succeeded { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// User-facing message for the latest failure
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            AnalysisState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The URL currently associated with the controller, if any
    pub fn submitted_url(&self) -> Option<&str> {
        match &self.state {
            AnalysisState::Idle => None,
            AnalysisState::Pending { url }
            | AnalysisState::Succeeded { url, .. }
            | AnalysisState::Failed { url, .. } => Some(url),
        }
    }

    /// Syntactic check that a string looks like a repository URL. Invalid
    /// values never reach the network.
    pub fn validate_url(url: &str) -> LensResult<String> {
        let trimmed = url.trim();
        if trimmed.is_empty() || !trimmed.contains(REPOSITORY_HOST_MARKER) {
            return Err(LensError::Validation {
                message: "Please enter a valid GitHub repository URL".to_string(),
                field: Some("github_url".to_string()),
                context: ErrorContext::new("analysis_controller")
                    .with_operation("validate_url")
                    .with_suggestion("Expected something like https://github.com/owner/repo"),
            });
        }
        Ok(trimmed.to_string())
    }

    /// Submit a repository URL for analysis.
    ///
    /// Valid only from `Idle` or `Failed`. A submission while a request is
    /// outstanding, or while an undismissed result is held, is rejected
    /// without touching the current state.
    pub async fn submit(&mut self, url: &str) -> LensResult<()> {
        match self.state {
            AnalysisState::Pending { .. } => {
                return Err(LensError::Validation {
                    message: "An analysis is already in progress".to_string(),
                    field: None,
                    context: ErrorContext::new("analysis_controller").with_operation("submit"),
                });
            }
            AnalysisState::Succeeded { .. } => {
                return Err(LensError::Validation {
                    message: "Dismiss the current result before starting a new analysis"
                        .to_string(),
                    field: None,
                    context: ErrorContext::new("analysis_controller")
                        .with_operation("submit")
                        .with_suggestion("Call reset() first"),
                });
            }
            AnalysisState::Idle | AnalysisState::Failed { .. } => {}
        }

        let url = match Self::validate_url(url) {
            Ok(url) => url,
            Err(e) => {
                self.state = AnalysisState::Failed {
                    url: url.trim().to_string(),
                    message: e.user_message(),
                };
                return Err(e);
            }
        };

        info!(url = %url, "Submitting analysis request");
        self.state = AnalysisState::Pending { url: url.clone() };

        match self.service.analyze(&url).await {
            Ok(raw) => {
                let report = build_report(&raw);
                info!(
                    repository = %report.repo.full_name,
                    tier = %report.metrics.complexity_tier,
                    "Analysis completed"
                );
                self.state = AnalysisState::Succeeded { url, raw, report };
                Ok(())
            }
            Err(e) => {
                e.log();
                warn!(url = %url, "Analysis request failed");
                self.state = AnalysisState::Failed {
                    url,
                    message: e.user_message(),
                };
                Err(e)
            }
        }
    }

    /// Dismiss the current result or error and return to `Idle`. Idempotent;
    /// also clears the submitted URL.
    pub fn reset(&mut self) {
        if !matches!(self.state, AnalysisState::Idle) {
            info!("Dismissing analysis state");
        }
        self.state = AnalysisState::Idle;
    }
}
