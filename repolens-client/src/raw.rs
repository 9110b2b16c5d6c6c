//! Raw analysis payload types
//!
//! These mirror the analysis service's JSON response. The service omits
//! whole sections freely (no community data for quiet repositories, no AI
//! section without a provider key) and individual fields within sections are
//! just as unreliable, so every field here is an explicit `Option`. Nothing
//! downstream reads these types directly; `normalize::build_report` resolves
//! them into defaulted view-model types exactly once.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level analysis response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAnalysis {
    /// Service envelope: "success" or "error"
    pub status: Option<String>,
    /// Error detail accompanying an error envelope
    pub message: Option<String>,
    pub repo_info: Option<RawRepoInfo>,
    pub tech_analysis: Option<RawTechAnalysis>,
    pub community_data: Option<RawCommunityData>,
    pub learning_metrics: Option<RawLearningMetrics>,
    pub ai_analysis: Option<RawAiAnalysis>,
    pub has_ai_analysis: Option<bool>,
}

impl RawAnalysis {
    /// Whether the body carries the service's error envelope
    pub fn is_error_envelope(&self) -> bool {
        self.status.as_deref() == Some("error")
    }
}

/// Repository identity and popularity metadata
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRepoInfo {
    pub full_name: Option<String>,
    pub description: Option<String>,
    pub stars: Option<u64>,
    pub forks: Option<u64>,
    pub url: Option<String>,
    pub open_issues: Option<u64>,
    pub watchers: Option<u64>,
}

/// Language breakdown and file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTechAnalysis {
    /// Language name to percentage, usually a string like "61.3%" but the
    /// service has been observed sending bare numbers as well
    pub languages: Option<Map<String, Value>>,
    pub primary_language: Option<String>,
    pub file_count: Option<u64>,
    pub sample_structure: Option<Vec<String>>,
    pub top_languages: Option<Vec<String>>,
}

/// Contributor and issue activity, absent for repositories the service
/// could not (or chose not to) enrich
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCommunityData {
    pub top_contributors: Option<Vec<RawContributor>>,
    pub active_issues: Option<Vec<RawIssue>>,
    pub contributor_count: Option<u64>,
    pub issue_engagement: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawContributor {
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub contributions: Option<u64>,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawIssue {
    pub number: Option<u64>,
    pub title: Option<String>,
    pub url: Option<String>,
    pub comments: Option<u64>,
    pub created_at: Option<String>,
    pub state: Option<String>,
}

/// Learning-oriented metrics computed by the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLearningMetrics {
    pub complexity_score: Option<f64>,
    pub complexity_level: Option<String>,
    pub recommended_start: Option<String>,
    pub community_score: Option<f64>,
}

/// AI-generated commentary, only trusted when `has_ai_analysis` is set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAiAnalysis {
    pub ai_summary: Option<String>,
    pub tech_insights: Option<Vec<String>>,
    pub learning_path: Option<Vec<String>>,
    pub patterns: Option<Vec<String>>,
    pub community_tips: Option<Vec<String>>,
}
