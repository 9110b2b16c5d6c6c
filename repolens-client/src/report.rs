//! Render-ready analysis report
//!
//! The fully-defaulted view model built once per raw result. Every
//! collection is present (possibly empty), every scalar is present
//! (zero / "Unknown" when the service omitted it), so presentation code
//! never branches on absence except to pick an empty-state message.

use serde::{Deserialize, Serialize};

/// Complete, defaulted analysis of one repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub repo: RepoOverview,
    pub tech: TechBreakdown,
    pub community: CommunitySection,
    pub metrics: LearningMetrics,
    pub ai: AiCommentary,
}

/// Repository identity and popularity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoOverview {
    pub full_name: String,
    pub description: String,
    pub stars: u64,
    pub forks: u64,
    pub url: String,
    pub open_issues: u64,
    pub watchers: u64,
}

/// Language breakdown and structure preview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechBreakdown {
    /// Top languages, sorted descending by share, capped for chart display
    pub languages: Vec<LanguageShare>,
    /// Total number of languages the service reported
    pub language_count: usize,
    pub primary_language: String,
    pub file_count: u64,
    /// First entries of the sample structure, capped at the preview limit
    pub structure_preview: Vec<String>,
    /// Files beyond the preview ("+N more"), clamped to zero
    pub hidden_file_count: u64,
}

/// One language's share of the codebase, percentage already numeric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageShare {
    pub name: String,
    pub percent: f64,
}

/// Contributor and issue activity with aggregate counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunitySection {
    pub top_contributors: Vec<Contributor>,
    pub active_issues: Vec<IssueActivity>,
    pub contributor_count: u64,
    pub issue_engagement: u64,
    /// True when the service returned any contributor or issue data
    pub has_data: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contributor {
    pub username: String,
    pub avatar_url: String,
    pub contributions: u64,
    pub profile_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueActivity {
    pub number: u64,
    pub title: String,
    pub url: String,
    pub comments: u64,
    pub created_at: String,
    pub state: String,
}

/// Complexity score and learning guidance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningMetrics {
    /// Score on the 0-10 scale, clamped
    pub complexity_score: f64,
    pub complexity_tier: ComplexityTier,
    pub recommended_start: String,
    pub community_score: f64,
}

/// AI commentary; `available` governs whether the section renders content
/// or the fixed fallback notice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiCommentary {
    pub available: bool,
    /// Absent (rather than empty) when the service sent no usable summary
    pub summary: Option<String>,
    pub tech_insights: Vec<String>,
    pub learning_path: Vec<String>,
    pub patterns: Vec<String>,
    pub community_tips: Vec<String>,
}

/// Textual difficulty bucket for a complexity score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplexityTier {
    Beginner,
    Intermediate,
    Advanced,
}

impl ComplexityTier {
    /// Derive the tier from a numeric score. The single source of truth for
    /// the thresholds: scores below 4 are Beginner, below 7 Intermediate,
    /// everything else Advanced.
    pub fn from_score(score: f64) -> Self {
        if score < 4.0 {
            ComplexityTier::Beginner
        } else if score < 7.0 {
            ComplexityTier::Intermediate
        } else {
            ComplexityTier::Advanced
        }
    }

    /// Parse a textual level the service may have sent alongside the score
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.eq_ignore_ascii_case("beginner") {
            Some(ComplexityTier::Beginner)
        } else if label.eq_ignore_ascii_case("intermediate") {
            Some(ComplexityTier::Intermediate)
        } else if label.eq_ignore_ascii_case("advanced") {
            Some(ComplexityTier::Advanced)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComplexityTier::Beginner => "Beginner",
            ComplexityTier::Intermediate => "Intermediate",
            ComplexityTier::Advanced => "Advanced",
        }
    }
}

impl std::fmt::Display for ComplexityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
