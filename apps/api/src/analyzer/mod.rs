//! Job-fit analysis engine: posting normalization, requirement extraction,
//! resume matching, and tailoring-plan generation.
//!
//! The pipeline is stateless; every request builds its outputs fresh and
//! nothing is cached between calls.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod extractor;
pub mod fetch;
pub mod handlers;
pub mod heuristics;
pub mod matcher;
pub mod normalizer;
pub mod tailor;

use extractor::{Requirement, RequirementExtractor};
use normalizer::PostingNormalizer;

/// Structured representation of one job posting, requirements included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedPosting {
    pub url: String,
    pub title: String,
    pub company: String,
    pub location: String,

    pub requirements: Vec<Requirement>,

    // Raw sections, kept for reference.
    pub description: String,
    pub responsibilities: Vec<String>,
    pub qualifications: Vec<String>,
    pub benefits: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_policy: Option<String>,

    pub parse_confidence: f32,
    pub parse_warnings: Vec<String>,

    /// When the page was retrieved. None for caller-supplied HTML.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Normalize + extract in one step. Never fails; degraded input shows up as
/// lowered confidence and warnings on the result.
pub fn parse_posting(
    url: &str,
    html: &str,
    normalizer: &PostingNormalizer,
    extractor: &RequirementExtractor,
) -> ParsedPosting {
    let normalized = normalizer.normalize(url, html);
    let requirements = extractor.extract(&normalized.qualifications, &normalized.responsibilities);

    ParsedPosting {
        url: url.to_string(),
        title: normalized.title,
        company: normalized.company,
        location: normalized.location,
        requirements,
        description: normalized.description,
        responsibilities: normalized.responsibilities,
        qualifications: normalized.qualifications,
        benefits: normalized.benefits,
        salary_range: normalized.salary_range,
        employment_type: normalized.employment_type,
        remote_policy: normalized.remote_policy,
        parse_confidence: normalized.confidence,
        parse_warnings: normalized.warnings,
        fetched_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::extractor::RequirementCategory;

    #[test]
    fn test_parse_posting_end_to_end() {
        let html = r#"
            <h1 class="app-title">Senior Backend Engineer</h1>
            <div class="location">Remote - US</div>
            <h2>Requirements</h2>
            <ul>
              <li>5+ years of Python experience</li>
              <li>Docker and Kubernetes in production</li>
              <li>Must hold active security clearance</li>
            </ul>"#;
        let posting = parse_posting(
            "https://boards.greenhouse.io/acme/jobs/1",
            html,
            &PostingNormalizer::new(),
            &RequirementExtractor::new(),
        );

        assert_eq!(posting.title, "Senior Backend Engineer");
        assert_eq!(posting.company, "Acme");
        assert_eq!(posting.requirements.len(), 3);
        assert_eq!(
            posting.requirements[0].category,
            RequirementCategory::Experience
        );
        assert_eq!(posting.requirements[0].years_experience, Some(5));
        assert!(posting.requirements[2].is_dealbreaker);
    }

    #[test]
    fn test_fetched_at_absent_for_inline_html() {
        let posting = parse_posting(
            "",
            "<ul><li>5+ years of Python experience</li></ul>",
            &PostingNormalizer::new(),
            &RequirementExtractor::new(),
        );
        assert!(posting.fetched_at.is_none());
        let json = serde_json::to_value(&posting).unwrap();
        assert!(json.get("fetched_at").is_none());

        let mut posting = posting;
        posting.fetched_at = Some(chrono::Utc::now());
        let json = serde_json::to_value(&posting).unwrap();
        assert!(json.get("fetched_at").is_some());
    }

    #[test]
    fn test_parse_posting_on_garbage_still_returns() {
        let posting = parse_posting(
            "https://example.com/job",
            "not html",
            &PostingNormalizer::new(),
            &RequirementExtractor::new(),
        );
        assert!(posting.requirements.is_empty());
        assert!(!posting.parse_warnings.is_empty());
        assert!(posting.parse_confidence < 0.6);
    }
}
