//! Requirement Extractor — splits qualification/responsibility text into
//! discrete `Requirement` records: category, required/preferred, keywords,
//! optional years-of-experience threshold, dealbreaker flag.
//!
//! Everything here is pattern/keyword based and deterministic. Lines that
//! match no signal still become requirements (category Domain) so that the
//! downstream invariant `matches.len() == requirements.len()` can hold.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Category of a requirement, driving the matching strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementCategory {
    Experience,
    TechnicalSkills,
    SoftSkills,
    Education,
    Domain,
    Logistics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementType {
    Required,
    Preferred,
}

/// One discrete qualification statement extracted from a posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    /// The statement, with bullet/list markers stripped.
    pub text: String,
    pub category: RequirementCategory,
    pub requirement_type: RequirementType,
    /// Technical-vocabulary hits, deduplicated, in order of appearance.
    pub keywords: Vec<String>,
    pub years_experience: Option<u32>,
    pub is_dealbreaker: bool,
}

/// Phrases signalling a nice-to-have. Absence means Required.
const PREFERRED_SIGNALS: &[&str] = &[
    "nice to have",
    "nice-to-have",
    "bonus",
    "preferred",
    "ideally",
    "a plus",
    "advantage",
    "beneficial",
];

/// Technical vocabulary used for keyword extraction and the TechnicalSkills
/// category check. Matched on word boundaries so "java" does not fire inside
/// "javascript" and "ai" does not fire inside "container".
const TECH_VOCABULARY: &[&str] = &[
    "python",
    "javascript",
    "typescript",
    "java",
    "rust",
    "sql",
    "react",
    "fastapi",
    "flask",
    "django",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "api",
    "rest",
    "graphql",
    "postgresql",
    "mongodb",
    "llm",
    "ai",
    "ml",
    "machine learning",
    "analytics",
    "node",
    "vue",
    "angular",
    "redis",
    "kafka",
    "celery",
    "ci/cd",
    "git",
    "microservices",
    "terraform",
    "jenkins",
];

const EXPERIENCE_SIGNALS: &[&str] = &["year", "experience", "background"];

const EDUCATION_SIGNALS: &[&str] = &["degree", "bachelor", "master", "phd", "certification"];

pub(crate) const SOFT_SKILL_SIGNALS: &[&str] = &[
    "communication",
    "leadership",
    "team",
    "collaborate",
    "interpersonal",
    "presentation",
];

const LOGISTICS_SIGNALS: &[&str] = &[
    "location",
    "located",
    "remote",
    "hybrid",
    "travel",
    "clearance",
    "onsite",
    "on-site",
    "relocate",
    "visa",
];

/// Lines shorter than this (after marker stripping) are noise, not requirements.
const MIN_LINE_LEN: usize = 10;

/// Compiled patterns for requirement extraction. Built once at startup and
/// shared read-only across requests.
pub struct RequirementExtractor {
    vocab_re: Regex,
    years_patterns: Vec<Regex>,
    bullet_re: Regex,
    numbering_re: Regex,
    whitespace_re: Regex,
}

impl Default for RequirementExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirementExtractor {
    pub fn new() -> Self {
        let vocab_alternation = TECH_VOCABULARY
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");

        RequirementExtractor {
            vocab_re: re(&format!(r"\b(?:{vocab_alternation})\b")),
            // Checked in order; the first match wins. The range pattern comes
            // first so "3-5 years" yields the lower bound, not 5.
            years_patterns: vec![
                re(r"(\d+)\s*-\s*(?:\d+)\s*years?"),
                re(r"at least\s+(\d+)\s+years?"),
                re(r"minimum\s+(?:of\s+)?(\d+)\s+years?"),
                re(r"(\d+)\s*\+?\s*years?"),
            ],
            bullet_re: re(r"^[-*•·]\s*"),
            numbering_re: re(r"^\d+\.\s+"),
            whitespace_re: re(r"\s+"),
        }
    }

    /// Extracts requirements from qualification and responsibility lines,
    /// deduplicated on normalized text, document order preserved.
    pub fn extract(&self, qualifications: &[String], responsibilities: &[String]) -> Vec<Requirement> {
        let requirements = qualifications
            .iter()
            .chain(responsibilities.iter())
            .filter_map(|line| self.parse_line(line))
            .collect();
        self.dedupe(requirements)
    }

    /// Parses a single line into a requirement, or `None` if it is too short
    /// to carry meaning.
    pub fn parse_line(&self, line: &str) -> Option<Requirement> {
        let trimmed = line.trim();
        if trimmed.len() < MIN_LINE_LEN {
            return None;
        }

        // Strip leading bullet markers and list numbering, but not years ("5+").
        let cleaned = self.bullet_re.replace(trimmed, "");
        let cleaned = self.numbering_re.replace(&cleaned, "").trim().to_string();
        if cleaned.len() < MIN_LINE_LEN {
            return None;
        }

        let lower = cleaned.to_lowercase();
        let requirement_type = detect_requirement_type(&lower);
        let keywords = self.extract_keywords(&lower);
        let category = categorize(&lower, &keywords);
        let years_experience = self.extract_years(&lower);
        let is_dealbreaker = category == RequirementCategory::Logistics
            && (lower.contains("clearance")
                || lower.contains("must be located")
                || lower.contains("must relocate"));

        Some(Requirement {
            text: cleaned,
            category,
            requirement_type,
            keywords,
            years_experience,
            is_dealbreaker,
        })
    }

    /// Vocabulary hits in order of appearance, deduplicated within the line.
    fn extract_keywords(&self, lower: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();
        for m in self.vocab_re.find_iter(lower) {
            let kw = m.as_str().to_string();
            if seen.insert(kw.clone()) {
                found.push(kw);
            }
        }
        found
    }

    /// First years-of-experience pattern hit, if any.
    fn extract_years(&self, lower: &str) -> Option<u32> {
        for pattern in &self.years_patterns {
            if let Some(caps) = pattern.captures(lower) {
                if let Ok(years) = caps[1].parse::<u32>() {
                    return Some(years);
                }
            }
        }
        None
    }

    /// Merges requirements whose normalized (trimmed, case-folded,
    /// whitespace-collapsed) text is identical, keeping the first occurrence.
    fn dedupe(&self, requirements: Vec<Requirement>) -> Vec<Requirement> {
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for req in requirements {
            let key = self
                .whitespace_re
                .replace_all(req.text.trim().to_lowercase().as_str(), " ")
                .into_owned();
            if seen.insert(key) {
                unique.push(req);
            }
        }
        unique
    }
}

fn detect_requirement_type(lower: &str) -> RequirementType {
    if PREFERRED_SIGNALS.iter().any(|s| lower.contains(s)) {
        RequirementType::Preferred
    } else {
        // Most requirements not explicitly marked are required.
        RequirementType::Required
    }
}

/// Category classification in fixed priority order; the first match wins.
fn categorize(lower: &str, keywords: &[String]) -> RequirementCategory {
    if EXPERIENCE_SIGNALS.iter().any(|s| lower.contains(s)) {
        return RequirementCategory::Experience;
    }
    if !keywords.is_empty() {
        return RequirementCategory::TechnicalSkills;
    }
    if EDUCATION_SIGNALS.iter().any(|s| lower.contains(s)) {
        return RequirementCategory::Education;
    }
    if SOFT_SKILL_SIGNALS.iter().any(|s| lower.contains(s)) {
        return RequirementCategory::SoftSkills;
    }
    if LOGISTICS_SIGNALS.iter().any(|s| lower.contains(s)) {
        return RequirementCategory::Logistics;
    }
    RequirementCategory::Domain
}

fn re(pattern: &str) -> Regex {
    Regex::new(pattern).expect("hardcoded pattern is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> RequirementExtractor {
        RequirementExtractor::new()
    }

    fn parse(line: &str) -> Requirement {
        extractor().parse_line(line).expect("line should parse")
    }

    #[test]
    fn test_short_line_is_skipped() {
        assert!(extractor().parse_line("- Python").is_none());
        assert!(extractor().parse_line("").is_none());
    }

    #[test]
    fn test_bullet_markers_are_stripped() {
        let req = parse("• Strong knowledge of PostgreSQL and Redis");
        assert_eq!(req.text, "Strong knowledge of PostgreSQL and Redis");
    }

    #[test]
    fn test_numbered_list_markers_are_stripped_but_years_survive() {
        let req = parse("1. 5+ years of Python experience");
        assert_eq!(req.text, "5+ years of Python experience");
        assert_eq!(req.years_experience, Some(5));
    }

    #[test]
    fn test_default_type_is_required() {
        let req = parse("Experience building REST APIs in production");
        assert_eq!(req.requirement_type, RequirementType::Required);
    }

    #[test]
    fn test_preferred_signals_detected() {
        for line in [
            "Kubernetes experience is a plus",
            "Bonus: familiarity with Terraform",
            "GraphQL knowledge preferred",
            "Ideally you have worked with Kafka",
        ] {
            let req = parse(line);
            assert_eq!(req.requirement_type, RequirementType::Preferred, "{line}");
        }
    }

    #[test]
    fn test_years_threshold_line_is_experience_category() {
        let req = parse("5+ years of Python experience");
        assert_eq!(req.category, RequirementCategory::Experience);
        assert_eq!(req.years_experience, Some(5));
        assert!(req.keywords.contains(&"python".to_string()));
    }

    #[test]
    fn test_vocabulary_line_is_technical_skills() {
        let req = parse("Kubernetes/container orchestration");
        assert_eq!(req.category, RequirementCategory::TechnicalSkills);
        assert_eq!(req.keywords, vec!["kubernetes".to_string()]);
    }

    #[test]
    fn test_keyword_matching_uses_word_boundaries() {
        // "container" must not yield "ai"; "javascript" must not yield "java".
        let req = parse("Deep JavaScript expertise across the stack");
        assert_eq!(req.keywords, vec!["javascript".to_string()]);
        let req = parse("Kubernetes/container orchestration");
        assert_eq!(req.keywords, vec!["kubernetes".to_string()]);
    }

    #[test]
    fn test_short_vocabulary_terms_still_match_as_whole_words() {
        // Boundary matching must not cost legitimate short-term hits.
        let req = parse("Production experience with Java and SQL");
        assert!(req.keywords.contains(&"java".to_string()));
        assert!(req.keywords.contains(&"sql".to_string()));
        let req = parse("Applied AI and ML in shipped products");
        assert!(req.keywords.contains(&"ai".to_string()));
        assert!(req.keywords.contains(&"ml".to_string()));
    }

    #[test]
    fn test_degree_line_is_education_category() {
        let req = parse("Bachelor's degree in Computer Science or related field");
        assert_eq!(req.category, RequirementCategory::Education);
    }

    #[test]
    fn test_communication_line_is_soft_skills_category() {
        let req = parse("Excellent communication and presentation abilities");
        assert_eq!(req.category, RequirementCategory::SoftSkills);
    }

    #[test]
    fn test_clearance_line_is_logistics_dealbreaker() {
        let req = parse("Must hold active security clearance");
        assert_eq!(req.category, RequirementCategory::Logistics);
        assert!(req.is_dealbreaker);
    }

    #[test]
    fn test_location_line_is_logistics_but_not_dealbreaker() {
        let req = parse("Hybrid schedule from our Austin office");
        assert_eq!(req.category, RequirementCategory::Logistics);
        assert!(!req.is_dealbreaker);
    }

    #[test]
    fn test_must_be_located_is_dealbreaker() {
        let req = parse("Candidates must be located in the EU");
        assert!(req.is_dealbreaker);
    }

    #[test]
    fn test_unmatched_line_falls_back_to_domain() {
        let req = parse("Familiarity with healthcare billing workflows");
        assert_eq!(req.category, RequirementCategory::Domain);
        assert!(req.keywords.is_empty());
    }

    #[test]
    fn test_years_pattern_variants() {
        assert_eq!(parse("At least 3 years in a similar role").years_experience, Some(3));
        assert_eq!(parse("Minimum of 7 years of experience").years_experience, Some(7));
        assert_eq!(parse("Minimum 4 years of experience").years_experience, Some(4));
        assert_eq!(parse("10+ years of leadership experience").years_experience, Some(10));
    }

    #[test]
    fn test_year_range_takes_lower_bound() {
        assert_eq!(parse("2-4 years of experience with SQL").years_experience, Some(2));
    }

    #[test]
    fn test_no_years_pattern_yields_none() {
        assert_eq!(parse("Experience with distributed systems").years_experience, None);
    }

    #[test]
    fn test_extract_dedupes_normalized_text() {
        let qualifications = vec![
            "Strong Python skills required".to_string(),
            "  strong   python skills required ".to_string(),
            "Experience with Docker".to_string(),
        ];
        let reqs = extractor().extract(&qualifications, &[]);
        assert_eq!(reqs.len(), 2);
        assert_eq!(reqs[0].text, "Strong Python skills required");
    }

    #[test]
    fn test_extract_preserves_document_order() {
        let qualifications = vec![
            "Familiarity with fintech regulations".to_string(),
            "5+ years of backend experience".to_string(),
            "Kubernetes in production".to_string(),
        ];
        let reqs = extractor().extract(&qualifications, &[]);
        assert_eq!(reqs.len(), 3);
        assert_eq!(reqs[0].category, RequirementCategory::Domain);
        assert_eq!(reqs[1].category, RequirementCategory::Experience);
        assert_eq!(reqs[2].category, RequirementCategory::TechnicalSkills);
    }

    #[test]
    fn test_responsibilities_feed_extraction_too() {
        let responsibilities = vec!["Design and operate Terraform-managed infrastructure".to_string()];
        let reqs = extractor().extract(&[], &responsibilities);
        assert_eq!(reqs.len(), 1);
        assert!(reqs[0].keywords.contains(&"terraform".to_string()));
    }

    #[test]
    fn test_keyword_dedup_within_line() {
        let req = parse("Python scripting and Python packaging experience");
        assert_eq!(
            req.keywords.iter().filter(|k| k.as_str() == "python").count(),
            1
        );
    }
}
