//! Terminal rendering of an analysis report
//!
//! The report is already fully defaulted, so rendering only decides which
//! empty-state message to show, never whether a field exists.

use repolens_client::report::{AnalysisReport, LanguageShare};

/// How many AI insights / learning steps to show
const AI_LIST_LIMIT: usize = 3;

const AI_FALLBACK_NOTICE: &str =
    "AI analysis is not available for this repository. Configure the analysis \
     service with an AI provider key to enable it.";

pub fn render_report(report: &AnalysisReport) -> String {
    let mut out = String::new();

    render_header(&mut out, report);
    render_languages(&mut out, report);
    render_structure(&mut out, report);
    render_community(&mut out, report);
    render_metrics(&mut out, report);
    render_ai(&mut out, report);

    out
}

fn render_header(out: &mut String, report: &AnalysisReport) {
    out.push_str(&format!("{}\n", report.repo.full_name));
    out.push_str(&format!("{}\n", report.repo.description));
    out.push_str(&format!(
        "{} stars | {} forks | {} files | {}\n",
        report.repo.stars, report.repo.forks, report.tech.file_count, report.tech.primary_language
    ));
    if !report.repo.url.is_empty() {
        out.push_str(&format!("{}\n", report.repo.url));
    }
    out.push('\n');
}

fn render_languages(out: &mut String, report: &AnalysisReport) {
    out.push_str(&format!(
        "Languages ({} shown of {})\n",
        report.tech.languages.len(),
        report.tech.language_count
    ));

    if report.tech.languages.is_empty() {
        out.push_str("  No language data available\n\n");
        return;
    }

    for share in &report.tech.languages {
        out.push_str(&format!("  {}\n", language_bar(share)));
    }
    out.push('\n');
}

fn language_bar(share: &LanguageShare) -> String {
    let width = (share.percent.clamp(0.0, 100.0) / 2.0).round() as usize;
    format!("{:<14} {:>5.1}%  {}", share.name, share.percent, "#".repeat(width))
}

fn render_structure(out: &mut String, report: &AnalysisReport) {
    out.push_str("Project structure\n");

    if report.tech.structure_preview.is_empty() {
        out.push_str("  No structure data available\n\n");
        return;
    }

    for path in &report.tech.structure_preview {
        out.push_str(&format!("  {}\n", path));
    }
    if report.tech.hidden_file_count > 0 {
        out.push_str(&format!("  ... +{} more files\n", report.tech.hidden_file_count));
    }
    out.push('\n');
}

fn render_community(out: &mut String, report: &AnalysisReport) {
    out.push_str("Community\n");

    if !report.community.has_data {
        out.push_str("  No community data available\n\n");
        return;
    }

    if !report.community.top_contributors.is_empty() {
        out.push_str(&format!(
            "  Top contributors ({} total)\n",
            report.community.contributor_count
        ));
        for contributor in &report.community.top_contributors {
            out.push_str(&format!(
                "    @{} - {} commits\n",
                contributor.username, contributor.contributions
            ));
        }
    }

    if !report.community.active_issues.is_empty() {
        out.push_str("  Most active issues\n");
        for issue in &report.community.active_issues {
            out.push_str(&format!(
                "    #{} {} ({} comments, {})\n",
                issue.number, issue.title, issue.comments, issue.state
            ));
        }
    }
    out.push('\n');
}

fn render_metrics(out: &mut String, report: &AnalysisReport) {
    out.push_str("Learning metrics\n");
    out.push_str(&format!(
        "  Complexity: {:.1}/10 ({})\n",
        report.metrics.complexity_score, report.metrics.complexity_tier
    ));
    out.push_str(&format!(
        "  Recommended starting point: {}\n",
        report.metrics.recommended_start
    ));
    out.push_str(&format!(
        "  Community engagement: {:.1}/10\n",
        report.metrics.community_score
    ));
    out.push('\n');
}

fn render_ai(out: &mut String, report: &AnalysisReport) {
    out.push_str("AI analysis\n");

    if !report.ai.available {
        out.push_str(&format!("  {}\n", AI_FALLBACK_NOTICE));
        return;
    }

    if let Some(summary) = &report.ai.summary {
        out.push_str(&format!("  {}\n", summary));
    }

    if !report.ai.tech_insights.is_empty() {
        out.push_str("  Technical insights\n");
        for insight in report.ai.tech_insights.iter().take(AI_LIST_LIMIT) {
            out.push_str(&format!("    - {}\n", insight));
        }
    }

    if !report.ai.learning_path.is_empty() {
        out.push_str("  Learning path\n");
        for (index, step) in report.ai.learning_path.iter().take(AI_LIST_LIMIT).enumerate() {
            out.push_str(&format!("    {}. {}\n", index + 1, step));
        }
    }

    if !report.ai.patterns.is_empty() {
        out.push_str("  Patterns\n");
        for pattern in report.ai.patterns.iter().take(AI_LIST_LIMIT) {
            out.push_str(&format!("    - {}\n", pattern));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repolens_client::{build_report, RawAnalysis};
    use serde_json::json;

    #[test]
    fn structure_remainder_renders_plus_n_more() {
        let raw: RawAnalysis = serde_json::from_value(json!({
            "tech_analysis": {
                "file_count": 23,
                "sample_structure": (0..23).map(|i| format!("src/f{i}.rs")).collect::<Vec<_>>()
            }
        }))
        .unwrap();

        let text = render_report(&build_report(&raw));
        assert!(text.contains("+8 more"));
        assert!(text.contains("src/f14.rs"));
        assert!(!text.contains("src/f15.rs"));
    }

    #[test]
    fn empty_sections_render_empty_state_messages() {
        let text = render_report(&build_report(&RawAnalysis::default()));

        assert!(text.contains("No community data available"));
        assert!(text.contains("AI analysis is not available"));
        assert!(text.contains("Unknown"));
    }

    #[test]
    fn ai_content_renders_when_trusted() {
        let raw: RawAnalysis = serde_json::from_value(json!({
            "has_ai_analysis": true,
            "ai_analysis": {
                "ai_summary": "A small build tool.",
                "tech_insights": ["Uses a worker pool", "Zero-copy parsing", "Own DSL", "Fourth"],
                "learning_path": ["Read main", "Trace a build"]
            }
        }))
        .unwrap();

        let text = render_report(&build_report(&raw));
        assert!(text.contains("A small build tool."));
        assert!(text.contains("1. Read main"));
        // Insight list is capped for display
        assert!(!text.contains("Fourth"));
    }
}
