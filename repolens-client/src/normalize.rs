//! Result normalizer
//!
//! A pure function from the raw service payload to the defaulted
//! [`AnalysisReport`]. All defaulting and derivation rules live here; no
//! presentation surface re-implements them.

use serde_json::{Map, Value};

use crate::raw::{
    RawAiAnalysis, RawAnalysis, RawCommunityData, RawLearningMetrics, RawRepoInfo,
    RawTechAnalysis,
};
use crate::report::{
    AiCommentary, AnalysisReport, CommunitySection, ComplexityTier, Contributor, IssueActivity,
    LanguageShare, LearningMetrics, RepoOverview, TechBreakdown,
};

/// How many languages the chart/bar display shows
pub const LANGUAGE_CHART_LIMIT: usize = 8;

/// How many structure entries the preview shows
pub const STRUCTURE_PREVIEW_LIMIT: usize = 15;

const UNKNOWN: &str = "Unknown";
const NO_DESCRIPTION: &str = "No description available";
const DEFAULT_STARTING_POINT: &str = "README.md";

/// Build the render-ready report for a raw analysis payload
pub fn build_report(raw: &RawAnalysis) -> AnalysisReport {
    AnalysisReport {
        repo: repo_overview(raw.repo_info.as_ref()),
        tech: tech_breakdown(raw.tech_analysis.as_ref()),
        community: community_section(raw.community_data.as_ref()),
        metrics: learning_metrics(raw.learning_metrics.as_ref()),
        ai: ai_commentary(raw.has_ai_analysis.unwrap_or(false), raw.ai_analysis.as_ref()),
    }
}

fn repo_overview(raw: Option<&RawRepoInfo>) -> RepoOverview {
    let empty = RawRepoInfo::default();
    let raw = raw.unwrap_or(&empty);

    RepoOverview {
        full_name: text_or(raw.full_name.as_deref(), UNKNOWN),
        description: text_or(raw.description.as_deref(), NO_DESCRIPTION),
        stars: raw.stars.unwrap_or(0),
        forks: raw.forks.unwrap_or(0),
        url: raw.url.clone().unwrap_or_default(),
        open_issues: raw.open_issues.unwrap_or(0),
        watchers: raw.watchers.unwrap_or(0),
    }
}

fn tech_breakdown(raw: Option<&RawTechAnalysis>) -> TechBreakdown {
    let empty = RawTechAnalysis::default();
    let raw = raw.unwrap_or(&empty);

    let (languages, language_count) = language_shares(raw.languages.as_ref());
    let file_count = raw.file_count.unwrap_or(0);
    let (structure_preview, hidden_file_count) =
        structure_preview(raw.sample_structure.as_deref(), file_count);

    TechBreakdown {
        languages,
        language_count,
        primary_language: text_or(raw.primary_language.as_deref(), UNKNOWN),
        file_count,
        structure_preview,
        hidden_file_count,
    }
}

fn community_section(raw: Option<&RawCommunityData>) -> CommunitySection {
    let empty = RawCommunityData::default();
    let raw = raw.unwrap_or(&empty);

    let top_contributors: Vec<Contributor> = raw
        .top_contributors
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|c| Contributor {
            username: text_or(c.username.as_deref(), UNKNOWN),
            avatar_url: c.avatar_url.clone().unwrap_or_default(),
            contributions: c.contributions.unwrap_or(0),
            profile_url: c.profile_url.clone().unwrap_or_default(),
        })
        .collect();

    let active_issues: Vec<IssueActivity> = raw
        .active_issues
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|i| IssueActivity {
            number: i.number.unwrap_or(0),
            title: text_or(i.title.as_deref(), UNKNOWN),
            url: i.url.clone().unwrap_or_default(),
            comments: i.comments.unwrap_or(0),
            created_at: i.created_at.clone().unwrap_or_default(),
            state: text_or(i.state.as_deref(), UNKNOWN),
        })
        .collect();

    let has_data = !top_contributors.is_empty() || !active_issues.is_empty();

    CommunitySection {
        top_contributors,
        active_issues,
        contributor_count: raw.contributor_count.unwrap_or(0),
        issue_engagement: raw.issue_engagement.unwrap_or(0),
        has_data,
    }
}

fn learning_metrics(raw: Option<&RawLearningMetrics>) -> LearningMetrics {
    let empty = RawLearningMetrics::default();
    let raw = raw.unwrap_or(&empty);

    let complexity_score = raw.complexity_score.unwrap_or(0.0).clamp(0.0, 10.0);
    let complexity_tier = raw
        .complexity_level
        .as_deref()
        .and_then(ComplexityTier::from_label)
        .unwrap_or_else(|| ComplexityTier::from_score(complexity_score));

    LearningMetrics {
        complexity_score,
        complexity_tier,
        recommended_start: text_or(raw.recommended_start.as_deref(), DEFAULT_STARTING_POINT),
        community_score: raw.community_score.unwrap_or(0.0).clamp(0.0, 10.0),
    }
}

fn ai_commentary(trusted: bool, raw: Option<&RawAiAnalysis>) -> AiCommentary {
    // The flag gates the whole section even when content is present
    let section = if trusted { raw } else { None };

    match section {
        Some(raw) => AiCommentary {
            available: true,
            summary: raw
                .ai_summary
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            tech_insights: raw.tech_insights.clone().unwrap_or_default(),
            learning_path: raw.learning_path.clone().unwrap_or_default(),
            patterns: raw.patterns.clone().unwrap_or_default(),
            community_tips: raw.community_tips.clone().unwrap_or_default(),
        },
        None => AiCommentary {
            available: false,
            summary: None,
            tech_insights: Vec::new(),
            learning_path: Vec::new(),
            patterns: Vec::new(),
            community_tips: Vec::new(),
        },
    }
}

/// Sort languages descending by numeric share (stable on ties), capped for
/// chart display. Returns the capped list and the total language count.
fn language_shares(languages: Option<&Map<String, Value>>) -> (Vec<LanguageShare>, usize) {
    let Some(languages) = languages else {
        return (Vec::new(), 0);
    };

    let mut shares: Vec<LanguageShare> = languages
        .iter()
        .map(|(name, value)| LanguageShare {
            name: name.clone(),
            percent: percent_value(value),
        })
        .collect();

    let total = shares.len();
    shares.sort_by(|a, b| b.percent.total_cmp(&a.percent));
    shares.truncate(LANGUAGE_CHART_LIMIT);

    (shares, total)
}

/// Coerce a percentage value to a number. The service usually sends strings
/// like "61.3%", occasionally bare numbers; anything unparseable is 0.
fn percent_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::String(s) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .unwrap_or(0.0),
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        _ => 0.0,
    };

    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// First entries of the structure listing plus the "+N more" remainder,
/// which is `file_count - preview limit` clamped to zero.
fn structure_preview(sample: Option<&[String]>, file_count: u64) -> (Vec<String>, u64) {
    let preview: Vec<String> = sample
        .unwrap_or_default()
        .iter()
        .take(STRUCTURE_PREVIEW_LIMIT)
        .cloned()
        .collect();

    let hidden = file_count.saturating_sub(STRUCTURE_PREVIEW_LIMIT as u64);

    (preview, hidden)
}

fn text_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lang_map(pairs: &[(&str, Value)]) -> Map<String, Value> {
        let mut map = Map::new();
        for (name, value) in pairs {
            map.insert(name.to_string(), value.clone());
        }
        map
    }

    #[test]
    fn missing_community_data_defaults_to_empty_section() {
        let raw = RawAnalysis::default();
        let report = build_report(&raw);

        assert!(!report.community.has_data);
        assert!(report.community.top_contributors.is_empty());
        assert!(report.community.active_issues.is_empty());
        assert_eq!(report.community.contributor_count, 0);
        assert_eq!(report.community.issue_engagement, 0);
    }

    #[test]
    fn community_presence_follows_contributors_or_issues() {
        let raw: RawAnalysis = serde_json::from_value(json!({
            "community_data": {
                "active_issues": [
                    {"number": 7, "title": "Flaky test", "comments": 3, "state": "open"}
                ]
            }
        }))
        .unwrap();

        let report = build_report(&raw);
        assert!(report.community.has_data);
        assert_eq!(report.community.active_issues.len(), 1);
        assert_eq!(report.community.active_issues[0].number, 7);
        assert_eq!(report.community.active_issues[0].url, "");
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(ComplexityTier::from_score(0.0), ComplexityTier::Beginner);
        assert_eq!(ComplexityTier::from_score(3.99), ComplexityTier::Beginner);
        assert_eq!(ComplexityTier::from_score(4.0), ComplexityTier::Intermediate);
        assert_eq!(ComplexityTier::from_score(6.99), ComplexityTier::Intermediate);
        assert_eq!(ComplexityTier::from_score(7.0), ComplexityTier::Advanced);
        assert_eq!(ComplexityTier::from_score(10.0), ComplexityTier::Advanced);
    }

    #[test]
    fn textual_level_wins_over_score_when_recognized() {
        let raw: RawAnalysis = serde_json::from_value(json!({
            "learning_metrics": {"complexity_score": 2.0, "complexity_level": "advanced"}
        }))
        .unwrap();

        let report = build_report(&raw);
        assert_eq!(report.metrics.complexity_tier, ComplexityTier::Advanced);
    }

    #[test]
    fn unrecognized_level_falls_back_to_score() {
        let raw: RawAnalysis = serde_json::from_value(json!({
            "learning_metrics": {"complexity_score": 8.2, "complexity_level": "gnarly"}
        }))
        .unwrap();

        let report = build_report(&raw);
        assert_eq!(report.metrics.complexity_tier, ComplexityTier::Advanced);
        assert_eq!(report.metrics.complexity_score, 8.2);
    }

    #[test]
    fn score_is_clamped_to_scale() {
        let raw: RawAnalysis = serde_json::from_value(json!({
            "learning_metrics": {"complexity_score": 14.0}
        }))
        .unwrap();

        let report = build_report(&raw);
        assert_eq!(report.metrics.complexity_score, 10.0);
        assert_eq!(report.metrics.complexity_tier, ComplexityTier::Advanced);
    }

    #[test]
    fn languages_sort_numerically_with_unparseable_as_zero() {
        let map = lang_map(&[
            ("Go", json!("10%")),
            ("Rust", json!("not-a-number")),
            ("TS", json!("50%")),
        ]);

        let (shares, total) = language_shares(Some(&map));
        assert_eq!(total, 3);
        assert_eq!(shares[0], LanguageShare { name: "TS".into(), percent: 50.0 });
        assert_eq!(shares[1], LanguageShare { name: "Go".into(), percent: 10.0 });
        assert_eq!(shares[2], LanguageShare { name: "Rust".into(), percent: 0.0 });
    }

    #[test]
    fn language_ties_keep_original_order() {
        let map = lang_map(&[
            ("HTML", json!("5.0%")),
            ("CSS", json!("5.0%")),
            ("Shell", json!("90.0%")),
        ]);

        let (shares, _) = language_shares(Some(&map));
        assert_eq!(shares[0].name, "Shell");
        assert_eq!(shares[1].name, "HTML");
        assert_eq!(shares[2].name, "CSS");
    }

    #[test]
    fn languages_capped_at_chart_limit() {
        let pairs: Vec<(String, Value)> = (0..12)
            .map(|i| (format!("Lang{i}"), json!(format!("{}.0%", 12 - i))))
            .collect();
        let mut map = Map::new();
        for (name, value) in pairs {
            map.insert(name, value);
        }

        let (shares, total) = language_shares(Some(&map));
        assert_eq!(total, 12);
        assert_eq!(shares.len(), LANGUAGE_CHART_LIMIT);
        assert_eq!(shares[0].name, "Lang0");
    }

    #[test]
    fn numeric_percentages_are_accepted() {
        let map = lang_map(&[("Python", json!(87.5)), ("Make", json!("12.5%"))]);

        let (shares, _) = language_shares(Some(&map));
        assert_eq!(shares[0], LanguageShare { name: "Python".into(), percent: 87.5 });
        assert_eq!(shares[1], LanguageShare { name: "Make".into(), percent: 12.5 });
    }

    #[test]
    fn structure_preview_caps_and_reports_remainder() {
        let files: Vec<String> = (0..23).map(|i| format!("src/file_{i}.rs")).collect();

        let (preview, hidden) = structure_preview(Some(&files), 23);
        assert_eq!(preview.len(), 15);
        assert_eq!(preview[0], "src/file_0.rs");
        assert_eq!(hidden, 8);
    }

    #[test]
    fn structure_remainder_never_negative() {
        let files: Vec<String> = (0..5).map(|i| format!("src/file_{i}.rs")).collect();

        let (preview, hidden) = structure_preview(Some(&files), 5);
        assert_eq!(preview.len(), 5);
        assert_eq!(hidden, 0);
    }

    #[test]
    fn fully_empty_payload_normalizes_without_panic() {
        let report = build_report(&RawAnalysis::default());

        assert_eq!(report.repo.full_name, "Unknown");
        assert_eq!(report.repo.description, "No description available");
        assert_eq!(report.repo.stars, 0);
        assert_eq!(report.tech.primary_language, "Unknown");
        assert_eq!(report.tech.file_count, 0);
        assert!(report.tech.languages.is_empty());
        assert!(report.tech.structure_preview.is_empty());
        assert_eq!(report.metrics.complexity_tier, ComplexityTier::Beginner);
        assert_eq!(report.metrics.recommended_start, "README.md");
        assert!(!report.ai.available);
        assert!(!report.community.has_data);
    }

    #[test]
    fn ai_section_requires_the_trust_flag() {
        let raw: RawAnalysis = serde_json::from_value(json!({
            "ai_analysis": {"ai_summary": "A tidy little web framework."}
        }))
        .unwrap();

        // Section present but flag missing: fall back
        let report = build_report(&raw);
        assert!(!report.ai.available);
        assert!(report.ai.summary.is_none());
    }

    #[test]
    fn ai_subsections_are_independently_optional() {
        let raw: RawAnalysis = serde_json::from_value(json!({
            "has_ai_analysis": true,
            "ai_analysis": {
                "ai_summary": "A tidy little web framework.",
                "learning_path": ["Read the router", "Trace a request"]
            }
        }))
        .unwrap();

        let report = build_report(&raw);
        assert!(report.ai.available);
        assert_eq!(report.ai.summary.as_deref(), Some("A tidy little web framework."));
        assert_eq!(report.ai.learning_path.len(), 2);
        assert!(report.ai.tech_insights.is_empty());
        assert!(report.ai.patterns.is_empty());
    }

    #[test]
    fn blank_ai_summary_counts_as_absent() {
        let raw: RawAnalysis = serde_json::from_value(json!({
            "has_ai_analysis": true,
            "ai_analysis": {"ai_summary": "   "}
        }))
        .unwrap();

        let report = build_report(&raw);
        assert!(report.ai.available);
        assert!(report.ai.summary.is_none());
    }
}
