//! Fit Scorer — matches every requirement against the resume and aggregates
//! the results into a `FitAnalysis`.
//!
//! Strategy dispatch is an exhaustive match over `RequirementCategory`, so a
//! new category cannot compile without a matching strategy. Every strategy
//! honors the same contract: one `RequirementMatch` per requirement, always.
//!
//! The optional LLM assist (`MatchAssist`) can refine the deterministic
//! matches per requirement batch; any failure falls back silently to the
//! keyword strategies. That fallback is a correctness requirement, not an
//! optimization.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::analyzer::extractor::{
    Requirement, RequirementCategory, RequirementType, SOFT_SKILL_SIGNALS,
};
use crate::analyzer::heuristics::Heuristics;
use crate::models::resume::ResumeRecord;

/// Ordinal rating of how well resume evidence satisfies one requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrength {
    Strong,
    Match,
    Partial,
    Weak,
    Gap,
}

/// Match result for a single requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementMatch {
    pub requirement: Requirement,
    pub strength: MatchStrength,
    /// Resume snippets supporting the rating.
    pub evidence: Vec<String>,
    pub explanation: String,
    /// Present for Partial/Gap ratings that have an actionable next step.
    pub suggestion: Option<String>,
    /// Confidence in this assessment, 0..1.
    pub confidence: f32,
}

/// Complete fit analysis result. `matches.len()` always equals the
/// requirement count of the posting it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitAnalysis {
    pub match_score: f32,
    pub match_label: String,
    pub should_apply: bool,
    pub recommendation: String,
    pub matches: Vec<RequirementMatch>,
    pub strong_matches: usize,
    pub matches_count: usize,
    pub partial_matches: usize,
    pub gaps: usize,
    /// Texts of dealbreaker requirements that resolved to Gap.
    pub dealbreakers: Vec<String>,
    pub top_suggestions: Vec<String>,
    pub missing_keywords: Vec<String>,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub struct AssistError(pub String);

/// Optional large-model assist, injected as a swappable capability so the
/// deterministic path stays testable without any network dependency.
#[async_trait]
pub trait MatchAssist: Send + Sync {
    /// Re-assesses a batch of requirements against the resume. Must return
    /// exactly one match per requirement, in order.
    async fn refine_matches(
        &self,
        requirements: &[Requirement],
        resume: &ResumeRecord,
    ) -> Result<Vec<RequirementMatch>, AssistError>;

    /// Proposes a resume summary tailored to the posting.
    async fn suggest_summary(
        &self,
        resume: &ResumeRecord,
        job_title: &str,
        company: &str,
        requirements: &[Requirement],
    ) -> Result<String, AssistError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Entry points
// ────────────────────────────────────────────────────────────────────────────

/// Full analysis with optional assist. Assist failures and malformed assist
/// output (wrong batch length) degrade to the deterministic matches.
pub async fn analyze_fit(
    resume: &ResumeRecord,
    requirements: &[Requirement],
    heuristics: &Heuristics,
    assist: Option<&dyn MatchAssist>,
) -> FitAnalysis {
    let mut matches = match_all(resume, requirements, heuristics);

    if let Some(assist) = assist {
        match assist.refine_matches(requirements, resume).await {
            Ok(refined) if refined.len() == requirements.len() => {
                debug!("assist refined {} matches", refined.len());
                matches = refined;
            }
            Ok(refined) => warn!(
                "assist returned {} matches for {} requirements; keeping deterministic results",
                refined.len(),
                requirements.len()
            ),
            Err(e) => warn!("assist unavailable, falling back to keyword strategies: {e}"),
        }
    }

    aggregate(resume, matches, heuristics)
}

/// Deterministic analysis with no assist. Repeated calls on the same inputs
/// return identical results.
pub fn analyze_fit_deterministic(
    resume: &ResumeRecord,
    requirements: &[Requirement],
    heuristics: &Heuristics,
) -> FitAnalysis {
    let matches = match_all(resume, requirements, heuristics);
    aggregate(resume, matches, heuristics)
}

fn match_all(
    resume: &ResumeRecord,
    requirements: &[Requirement],
    heuristics: &Heuristics,
) -> Vec<RequirementMatch> {
    requirements
        .iter()
        .map(|req| match_requirement(resume, req, heuristics))
        .collect()
}

/// Dispatches one requirement to its category strategy.
pub fn match_requirement(
    resume: &ResumeRecord,
    req: &Requirement,
    h: &Heuristics,
) -> RequirementMatch {
    match req.category {
        RequirementCategory::Experience => match_experience(resume, req, h),
        RequirementCategory::TechnicalSkills => match_technical(resume, req, h),
        RequirementCategory::Education => match_education(resume, req, h),
        RequirementCategory::SoftSkills => match_soft_skills(resume, req, h),
        RequirementCategory::Logistics => match_logistics(resume, req, h),
        RequirementCategory::Domain => keyword_match(resume, req, h),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-category strategies
// ────────────────────────────────────────────────────────────────────────────

fn match_experience(resume: &ResumeRecord, req: &Requirement, h: &Heuristics) -> RequirementMatch {
    let Some(required_years) = req.years_experience else {
        // No numeric threshold to compare against.
        return keyword_match(resume, req, h);
    };

    let years = resume.total_years_experience;

    if years >= required_years {
        let strength = if years >= required_years.saturating_add(h.strong_years_margin) {
            MatchStrength::Strong
        } else {
            MatchStrength::Match
        };
        RequirementMatch {
            requirement: req.clone(),
            strength,
            evidence: vec![format!("{years} years of experience")],
            explanation: format!("Resume shows {years} years, requirement is {required_years}+"),
            suggestion: None,
            confidence: h.years_met_confidence,
        }
    } else if years.saturating_add(h.partial_years_slack) >= required_years {
        RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Partial,
            evidence: vec![format!("{years} years of experience")],
            explanation: format!("Slightly under requirement ({years} vs {required_years}+)"),
            suggestion: Some("Emphasize depth of experience over tenure".to_string()),
            confidence: h.years_partial_confidence,
        }
    } else {
        RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Gap,
            evidence: vec![],
            explanation: format!("Gap: {years} years vs {required_years}+ required"),
            suggestion: Some(
                "Address the shortfall in a cover letter, focusing on quality over quantity"
                    .to_string(),
            ),
            confidence: h.years_gap_confidence,
        }
    }
}

fn match_technical(resume: &ResumeRecord, req: &Requirement, h: &Heuristics) -> RequirementMatch {
    let skills_lower: Vec<String> = resume
        .technical_skills
        .iter()
        .map(|s| s.to_lowercase())
        .collect();
    let free_text = format!(
        "{} {} {}",
        resume.summary.to_lowercase(),
        resume.bullet_text(),
        resume.project_text()
    );

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    for kw in &req.keywords {
        let hit = skills_lower.iter().any(|s| s.contains(kw.as_str()))
            || free_text.contains(kw.as_str());
        if hit {
            matched.push(kw.clone());
        } else {
            missing.push(kw.clone());
        }
    }

    if !matched.is_empty() && missing.is_empty() {
        RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Strong,
            explanation: format!("All keywords found: {}", matched.join(", ")),
            evidence: matched,
            suggestion: None,
            confidence: h.skills_full_confidence,
        }
    } else if !matched.is_empty() {
        RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Partial,
            explanation: format!(
                "Found {}; missing {}",
                matched.join(", "),
                missing.join(", ")
            ),
            evidence: matched,
            suggestion: Some(format!(
                "Add {} to the skills section if you have this experience",
                missing.join(", ")
            )),
            confidence: h.skills_partial_confidence,
        }
    } else {
        RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Gap,
            evidence: vec![],
            explanation: format!("Keywords not found: {}", req.keywords.join(", ")),
            suggestion: Some(
                "Consider adding relevant exposure or noting transferable skills".to_string(),
            ),
            confidence: h.skills_gap_confidence,
        }
    }
}

const ADVANCED_DEGREE_TERMS: &[&str] = &["master", "m.s", "mba", "phd", "doctor"];
const DEGREE_TERMS: &[&str] = &["bachelor", "b.s", "b.a", "associate", "degree", "diploma"];

fn match_education(resume: &ResumeRecord, req: &Requirement, h: &Heuristics) -> RequirementMatch {
    let req_lower = req.text.to_lowercase();

    // Certification requirements resolve against the certifications list.
    if (req_lower.contains("certification") || req_lower.contains("certified"))
        && !resume.certifications.is_empty()
    {
        return RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Match,
            evidence: resume.certifications.clone(),
            explanation: "Certifications listed on resume".to_string(),
            suggestion: None,
            confidence: h.education_confidence,
        };
    }

    if !resume.education.is_empty() {
        let edu_text = resume.education_text();
        let has_advanced = ADVANCED_DEGREE_TERMS.iter().any(|t| edu_text.contains(t));
        let has_degree = has_advanced || DEGREE_TERMS.iter().any(|t| edu_text.contains(t));

        if has_advanced && req_lower.contains("bachelor") {
            return RequirementMatch {
                requirement: req.clone(),
                strength: MatchStrength::Strong,
                evidence: vec![resume.education[0].degree.clone()],
                explanation: "Advanced degree exceeds the stated requirement".to_string(),
                suggestion: None,
                confidence: h.education_confidence,
            };
        }
        if has_degree {
            return RequirementMatch {
                requirement: req.clone(),
                strength: MatchStrength::Match,
                evidence: vec![resume.education[0].degree.clone()],
                explanation: "Education requirement met".to_string(),
                suggestion: None,
                confidence: h.education_confidence,
            };
        }
        return RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Partial,
            evidence: vec![],
            explanation: "Education listed but no recognizable degree".to_string(),
            suggestion: Some("Spell out the degree name so it is machine-readable".to_string()),
            confidence: h.education_gap_confidence,
        };
    }

    // Nothing dedicated to inspect; let the generic strategy judge keywords.
    if !req.keywords.is_empty() {
        return keyword_match(resume, req, h);
    }

    RequirementMatch {
        requirement: req.clone(),
        strength: MatchStrength::Gap,
        evidence: vec![],
        explanation: "No matching education found".to_string(),
        suggestion: Some("Add education details if you have a relevant degree".to_string()),
        confidence: h.education_gap_confidence,
    }
}

fn match_soft_skills(resume: &ResumeRecord, req: &Requirement, h: &Heuristics) -> RequirementMatch {
    let req_lower = req.text.to_lowercase();
    let terms: Vec<&str> = SOFT_SKILL_SIGNALS
        .iter()
        .copied()
        .filter(|t| req_lower.contains(t))
        .collect();

    if terms.is_empty() {
        return keyword_match(resume, req, h);
    }

    let bullets = resume.bullet_text();
    let evidenced = terms.iter().any(|t| bullets.contains(t));
    let listed: Vec<String> = resume
        .soft_skills
        .iter()
        .filter(|s| {
            let s_lower = s.to_lowercase();
            terms.iter().any(|t| s_lower.contains(t))
        })
        .cloned()
        .collect();

    if evidenced && !listed.is_empty() {
        RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Strong,
            evidence: listed,
            explanation: "Soft skill listed and evidenced in experience bullets".to_string(),
            suggestion: None,
            confidence: h.soft_evidence_confidence,
        }
    } else if evidenced {
        RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Match,
            evidence: vec!["Demonstrated in experience bullets".to_string()],
            explanation: "Soft skill evidenced in experience".to_string(),
            suggestion: None,
            confidence: h.soft_evidence_confidence,
        }
    } else if !listed.is_empty() {
        RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Partial,
            evidence: listed,
            explanation: "Soft skill listed but not demonstrated".to_string(),
            suggestion: Some("Demonstrate this skill in experience bullets".to_string()),
            confidence: h.soft_listed_confidence,
        }
    } else {
        RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Gap,
            evidence: vec![],
            explanation: "Soft skill not mentioned on resume".to_string(),
            suggestion: Some(
                "Demonstrate this skill in experience bullets with specific examples".to_string(),
            ),
            confidence: h.soft_gap_confidence,
        }
    }
}

fn match_logistics(resume: &ResumeRecord, req: &Requirement, h: &Heuristics) -> RequirementMatch {
    let req_lower = req.text.to_lowercase();

    if req_lower.contains("clearance") {
        if resume.certifications_text().contains("clearance") {
            return RequirementMatch {
                requirement: req.clone(),
                strength: MatchStrength::Match,
                evidence: vec!["Clearance noted in certifications".to_string()],
                explanation: "Clearance requirement met".to_string(),
                suggestion: None,
                confidence: h.clearance_confidence,
            };
        }
        return RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Gap,
            evidence: vec![],
            explanation: "Security clearance required but not found on resume".to_string(),
            suggestion: Some(
                "Add clearance status if you have one, or note eligibility".to_string(),
            ),
            confidence: h.clearance_gap_confidence,
        };
    }

    // Location/hybrid/onsite wording is never auto-resolved: the engine
    // cannot know the candidate's true location constraints, so this stays
    // Partial regardless of the resume's location field.
    RequirementMatch {
        requirement: req.clone(),
        strength: MatchStrength::Partial,
        evidence: vec![],
        explanation: "Location/logistics requirement; verify compatibility".to_string(),
        suggestion: Some("Confirm you can meet the location or schedule constraint".to_string()),
        confidence: h.logistics_confidence,
    }
}

/// Generic fallback: keyword search across summary, experience, and projects.
/// Outcomes limited to Match / Partial / Weak; evidence here is too indirect
/// to justify Strong or Gap.
fn keyword_match(resume: &ResumeRecord, req: &Requirement, h: &Heuristics) -> RequirementMatch {
    let text = resume.searchable_text();
    let matched: Vec<String> = req
        .keywords
        .iter()
        .filter(|kw| text.contains(kw.as_str()))
        .cloned()
        .collect();

    if !req.keywords.is_empty() && matched.len() == req.keywords.len() {
        RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Match,
            explanation: "All keywords appear in resume text".to_string(),
            evidence: matched,
            suggestion: None,
            confidence: h.generic_match_confidence,
        }
    } else if !matched.is_empty() {
        RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Partial,
            explanation: "Some keywords appear in resume text".to_string(),
            evidence: matched,
            suggestion: None,
            confidence: h.generic_partial_confidence,
        }
    } else {
        RequirementMatch {
            requirement: req.clone(),
            strength: MatchStrength::Weak,
            evidence: vec![],
            explanation: "No direct evidence found; rated by category only".to_string(),
            suggestion: None,
            confidence: h.generic_weak_confidence,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregation
// ────────────────────────────────────────────────────────────────────────────

/// Aggregates per-requirement matches into the final analysis.
pub fn aggregate(
    resume: &ResumeRecord,
    matches: Vec<RequirementMatch>,
    h: &Heuristics,
) -> FitAnalysis {
    let match_score = calculate_score(&matches, h);
    let match_label = score_label(match_score, h);

    let strong_matches = count_strength(&matches, MatchStrength::Strong);
    let matches_count = count_strength(&matches, MatchStrength::Match);
    let partial_matches = count_strength(&matches, MatchStrength::Partial);
    let gaps = count_strength(&matches, MatchStrength::Gap);

    let dealbreakers: Vec<String> = matches
        .iter()
        .filter(|m| m.requirement.is_dealbreaker && m.strength == MatchStrength::Gap)
        .map(|m| m.requirement.text.clone())
        .collect();

    let top_suggestions = collect_suggestions(&matches, h.top_suggestions_cap);
    let missing_keywords = find_missing_keywords(resume, &matches, h.missing_keywords_cap);

    let should_apply = match_score >= h.apply_floor && dealbreakers.is_empty();
    let recommendation = build_recommendation(match_score, &dealbreakers, h);

    FitAnalysis {
        match_score,
        match_label,
        should_apply,
        recommendation,
        matches,
        strong_matches,
        matches_count,
        partial_matches,
        gaps,
        dealbreakers,
        top_suggestions,
        missing_keywords,
    }
}

fn count_strength(matches: &[RequirementMatch], strength: MatchStrength) -> usize {
    matches.iter().filter(|m| m.strength == strength).count()
}

/// Weighted average of strength-base × confidence, Required weighted over
/// Preferred. Always in [0, 1].
fn calculate_score(matches: &[RequirementMatch], h: &Heuristics) -> f32 {
    if matches.is_empty() {
        return 0.0;
    }

    let mut weighted_score = 0.0_f32;
    let mut total_weight = 0.0_f32;

    for m in matches {
        let weight = match m.requirement.requirement_type {
            RequirementType::Required => h.required_weight,
            RequirementType::Preferred => h.preferred_weight,
        };
        weighted_score += h.strength_value(m.strength) * m.confidence * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        (weighted_score / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn score_label(score: f32, h: &Heuristics) -> String {
    if score >= h.strong_label_floor {
        "Strong Match"
    } else if score >= h.good_label_floor {
        "Good Match"
    } else if score >= h.moderate_label_floor {
        "Moderate Match"
    } else if score >= h.weak_label_floor {
        "Weak Match"
    } else {
        "Poor Fit"
    }
    .to_string()
}

/// Suggestions from Partial/Gap matches: Required before Preferred, Gap
/// before Partial, ties in original order, capped.
fn collect_suggestions(matches: &[RequirementMatch], cap: usize) -> Vec<String> {
    let mut candidates: Vec<&RequirementMatch> = matches
        .iter()
        .filter(|m| {
            matches!(m.strength, MatchStrength::Gap | MatchStrength::Partial)
                && m.suggestion.is_some()
        })
        .collect();

    candidates.sort_by_key(|m| {
        (
            m.requirement.requirement_type != RequirementType::Required,
            m.strength != MatchStrength::Gap,
        )
    });

    candidates
        .into_iter()
        .filter_map(|m| m.suggestion.clone())
        .take(cap)
        .collect()
}

/// Requirement keywords absent from all resume text, deduplicated with
/// insertion order preserved, capped.
fn find_missing_keywords(
    resume: &ResumeRecord,
    matches: &[RequirementMatch],
    cap: usize,
) -> Vec<String> {
    let text = resume.searchable_text();
    let mut missing = Vec::new();
    for m in matches {
        for kw in &m.requirement.keywords {
            if !text.contains(kw.as_str()) && !missing.contains(kw) {
                missing.push(kw.clone());
            }
        }
    }
    missing.truncate(cap);
    missing
}

fn build_recommendation(score: f32, dealbreakers: &[String], h: &Heuristics) -> String {
    if !dealbreakers.is_empty() {
        return format!(
            "CAUTION: Dealbreaker requirements not met: {}. Apply only if you can address these.",
            dealbreakers.join(", ")
        );
    }

    if score >= h.strong_label_floor {
        "STRONG FIT: Your background aligns well. Apply with confidence.".to_string()
    } else if score >= h.good_label_floor {
        "GOOD FIT: Solid match with minor gaps. Apply and address gaps in a cover letter."
            .to_string()
    } else if score >= h.moderate_label_floor {
        "MODERATE FIT: Core requirements are met but notable gaps remain. Apply if you can make a case for transferable skills.".to_string()
    } else if score >= h.weak_label_floor {
        "STRETCH: Significant gaps exist. Consider whether this is worth your time or a growth target.".to_string()
    } else {
        "NOT RECOMMENDED: Major misalignment with requirements. Focus energy elsewhere.".to_string()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
