//! Tailoring Planner — turns a `FitAnalysis` into a concrete edit plan.
//!
//! Only three category/strength combinations are actionable; everything else
//! produces no action. The planner never invents generic advice for
//! categories it has no strategy for.

use serde::{Deserialize, Serialize};

use crate::analyzer::extractor::{Requirement, RequirementCategory, RequirementType};
use crate::analyzer::heuristics::Heuristics;
use crate::analyzer::matcher::{FitAnalysis, MatchStrength, RequirementMatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPriority {
    High,
    Medium,
    Low,
}

/// One suggested resume edit targeting an unmet or partially-met requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoringAction {
    /// "add_skill", "add_bullet", or "add_keyword".
    pub action_type: String,
    /// Resume section the edit applies to.
    pub section: String,
    pub priority: ActionPriority,
    pub suggestion: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    /// The requirement text this action helps with.
    pub addresses_requirement: String,
}

/// Complete tailoring plan for one posting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailoringPlan {
    pub job_title: String,
    pub company: String,
    pub current_score: f32,
    /// Estimated score after applying the actions. Never below current_score.
    pub projected_score: f32,
    pub actions: Vec<TailoringAction>,
    pub keywords_to_add: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_summary: Option<String>,
    pub cover_letter_points: Vec<String>,
}

/// Builds the plan from an existing analysis. `suggested_summary` comes from
/// the optional assist and is passed through untouched when present.
pub fn build_plan(
    job_title: &str,
    company: &str,
    analysis: &FitAnalysis,
    heuristics: &Heuristics,
    suggested_summary: Option<String>,
) -> TailoringPlan {
    let mut actions: Vec<TailoringAction> = analysis
        .matches
        .iter()
        .filter(|m| matches!(m.strength, MatchStrength::Gap | MatchStrength::Partial))
        .filter_map(create_action)
        .collect();

    // High first, Medium next; ties keep extraction order.
    actions.sort_by_key(|a| {
        (
            a.priority != ActionPriority::High,
            a.priority != ActionPriority::Medium,
        )
    });

    let cover_letter_points = cover_points(analysis, heuristics.cover_points_cap);
    let projected_score = project_score(analysis.match_score, &actions, heuristics);

    TailoringPlan {
        job_title: job_title.to_string(),
        company: company.to_string(),
        current_score: analysis.match_score,
        projected_score,
        actions,
        keywords_to_add: analysis
            .missing_keywords
            .iter()
            .take(heuristics.keywords_to_add_cap)
            .cloned()
            .collect(),
        suggested_summary,
        cover_letter_points,
    }
}

/// At most one action per Partial/Gap match.
fn create_action(m: &RequirementMatch) -> Option<TailoringAction> {
    let req = &m.requirement;

    if req.category == RequirementCategory::TechnicalSkills && m.strength == MatchStrength::Gap {
        return Some(TailoringAction {
            action_type: "add_skill".to_string(),
            section: "Technical Skills".to_string(),
            priority: ActionPriority::High,
            suggestion: format!(
                "Add {} to skills if you have any experience",
                req.keywords.join(", ")
            ),
            example: None,
            addresses_requirement: req.text.clone(),
        });
    }

    if req.category == RequirementCategory::Experience && m.strength == MatchStrength::Partial {
        return Some(TailoringAction {
            action_type: "add_bullet".to_string(),
            section: "Experience".to_string(),
            priority: ActionPriority::High,
            suggestion: format!("Add a bullet demonstrating: {}", req.text),
            example: Some(bullet_example(req)),
            addresses_requirement: req.text.clone(),
        });
    }

    if req.category == RequirementCategory::TechnicalSkills && m.strength == MatchStrength::Partial
    {
        let missing: Vec<&String> = req
            .keywords
            .iter()
            .filter(|kw| !m.evidence.contains(kw))
            .collect();
        if !missing.is_empty() {
            return Some(TailoringAction {
                action_type: "add_keyword".to_string(),
                section: "Experience bullets".to_string(),
                priority: ActionPriority::Medium,
                suggestion: format!(
                    "Incorporate these keywords into existing bullets: {}",
                    missing
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                example: None,
                addresses_requirement: req.text.clone(),
            });
        }
    }

    None
}

fn bullet_example(req: &Requirement) -> String {
    if req.keywords.is_empty() {
        return "• [Action verb] + [specific achievement] demonstrating [relevant skill], \
                resulting in [measurable outcome]"
            .to_string();
    }
    let keywords_text = req
        .keywords
        .iter()
        .take(2)
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" and ");
    format!(
        "• [Action verb] + [specific achievement] using {keywords_text}, \
         resulting in [measurable outcome]"
    )
}

/// One point per Required-category Gap, capped.
fn cover_points(analysis: &FitAnalysis, cap: usize) -> Vec<String> {
    analysis
        .matches
        .iter()
        .filter(|m| {
            m.strength == MatchStrength::Gap
                && m.requirement.requirement_type == RequirementType::Required
        })
        .map(|m| {
            format!(
                "Address gap in: {} - Explain transferable skills or rapid learning ability",
                m.requirement.text
            )
        })
        .take(cap)
        .collect()
}

/// Heuristic estimate, not a re-run of the scorer. Only the first few
/// actions count, and the projection never regresses below the current score.
fn project_score(current: f32, actions: &[TailoringAction], h: &Heuristics) -> f32 {
    let improvement: f32 = actions
        .iter()
        .take(h.projection_action_cap)
        .map(|a| match a.priority {
            ActionPriority::High => h.high_action_bonus,
            ActionPriority::Medium => h.medium_action_bonus,
            ActionPriority::Low => 0.0,
        })
        .sum();
    (current + improvement).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::extractor::{RequirementCategory, RequirementType};

    fn heuristics() -> Heuristics {
        Heuristics::default()
    }

    fn make_match(
        text: &str,
        category: RequirementCategory,
        requirement_type: RequirementType,
        keywords: &[&str],
        strength: MatchStrength,
        evidence: &[&str],
    ) -> RequirementMatch {
        RequirementMatch {
            requirement: Requirement {
                text: text.to_string(),
                category,
                requirement_type,
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
                years_experience: None,
                is_dealbreaker: false,
            },
            strength,
            evidence: evidence.iter().map(|e| e.to_string()).collect(),
            explanation: String::new(),
            suggestion: None,
            confidence: 0.8,
        }
    }

    fn make_analysis(matches: Vec<RequirementMatch>, score: f32) -> FitAnalysis {
        FitAnalysis {
            match_score: score,
            match_label: "Moderate Match".to_string(),
            should_apply: true,
            recommendation: String::new(),
            matches,
            strong_matches: 0,
            matches_count: 0,
            partial_matches: 0,
            gaps: 0,
            dealbreakers: vec![],
            top_suggestions: vec![],
            missing_keywords: vec![],
        }
    }

    #[test]
    fn test_technical_gap_yields_high_priority_add_skill() {
        let analysis = make_analysis(
            vec![make_match(
                "Kubernetes in production",
                RequirementCategory::TechnicalSkills,
                RequirementType::Required,
                &["kubernetes"],
                MatchStrength::Gap,
                &[],
            )],
            0.6,
        );
        let plan = build_plan("SRE", "Acme", &analysis, &heuristics(), None);
        assert_eq!(plan.actions.len(), 1);
        assert_eq!(plan.actions[0].action_type, "add_skill");
        assert_eq!(plan.actions[0].priority, ActionPriority::High);
        assert!(plan.actions[0].suggestion.contains("kubernetes"));
    }

    #[test]
    fn test_experience_partial_yields_add_bullet_with_example() {
        let analysis = make_analysis(
            vec![make_match(
                "5+ years building APIs with Python and Go",
                RequirementCategory::Experience,
                RequirementType::Required,
                &["python", "go"],
                MatchStrength::Partial,
                &[],
            )],
            0.6,
        );
        let plan = build_plan("Backend Engineer", "Acme", &analysis, &heuristics(), None);
        assert_eq!(plan.actions[0].action_type, "add_bullet");
        let example = plan.actions[0].example.as_deref().unwrap();
        assert!(example.contains("python and go"));
    }

    #[test]
    fn test_technical_partial_yields_medium_add_keyword_for_missing_only() {
        let analysis = make_analysis(
            vec![make_match(
                "Docker and Kubernetes",
                RequirementCategory::TechnicalSkills,
                RequirementType::Required,
                &["docker", "kubernetes"],
                MatchStrength::Partial,
                &["docker"],
            )],
            0.6,
        );
        let plan = build_plan("SRE", "Acme", &analysis, &heuristics(), None);
        assert_eq!(plan.actions[0].action_type, "add_keyword");
        assert_eq!(plan.actions[0].priority, ActionPriority::Medium);
        assert!(plan.actions[0].suggestion.contains("kubernetes"));
        assert!(!plan.actions[0].suggestion.contains("docker,"));
    }

    #[test]
    fn test_unactionable_combinations_yield_no_action() {
        let analysis = make_analysis(
            vec![
                make_match(
                    "Excellent communication",
                    RequirementCategory::SoftSkills,
                    RequirementType::Required,
                    &[],
                    MatchStrength::Gap,
                    &[],
                ),
                make_match(
                    "Bachelor's degree",
                    RequirementCategory::Education,
                    RequirementType::Required,
                    &[],
                    MatchStrength::Gap,
                    &[],
                ),
                make_match(
                    "Hybrid in Austin",
                    RequirementCategory::Logistics,
                    RequirementType::Required,
                    &[],
                    MatchStrength::Partial,
                    &[],
                ),
            ],
            0.6,
        );
        let plan = build_plan("SRE", "Acme", &analysis, &heuristics(), None);
        assert!(plan.actions.is_empty());
    }

    #[test]
    fn test_actions_sorted_high_before_medium_preserving_order() {
        let analysis = make_analysis(
            vec![
                make_match(
                    "Docker and Kubernetes",
                    RequirementCategory::TechnicalSkills,
                    RequirementType::Required,
                    &["docker", "kubernetes"],
                    MatchStrength::Partial,
                    &["docker"],
                ),
                make_match(
                    "Terraform",
                    RequirementCategory::TechnicalSkills,
                    RequirementType::Required,
                    &["terraform"],
                    MatchStrength::Gap,
                    &[],
                ),
                make_match(
                    "Kafka",
                    RequirementCategory::TechnicalSkills,
                    RequirementType::Required,
                    &["kafka"],
                    MatchStrength::Gap,
                    &[],
                ),
            ],
            0.5,
        );
        let plan = build_plan("SRE", "Acme", &analysis, &heuristics(), None);
        assert_eq!(plan.actions.len(), 3);
        assert_eq!(plan.actions[0].priority, ActionPriority::High);
        assert!(plan.actions[0].addresses_requirement.contains("Terraform"));
        assert!(plan.actions[1].addresses_requirement.contains("Kafka"));
        assert_eq!(plan.actions[2].priority, ActionPriority::Medium);
    }

    #[test]
    fn test_projected_score_never_regresses_and_is_capped() {
        let gap = |kw: &str| {
            make_match(
                kw,
                RequirementCategory::TechnicalSkills,
                RequirementType::Required,
                &[kw],
                MatchStrength::Gap,
                &[],
            )
        };
        let analysis = make_analysis(
            vec![gap("a"), gap("b"), gap("c"), gap("d"), gap("e"), gap("f")],
            0.9,
        );
        let plan = build_plan("SRE", "Acme", &analysis, &heuristics(), None);
        assert!(plan.projected_score >= plan.current_score);
        // Six High actions, projection caps at the first five and at 1.0.
        assert!(plan.projected_score <= 1.0);

        let empty = make_analysis(vec![], 0.42);
        let plan = build_plan("SRE", "Acme", &empty, &heuristics(), None);
        assert_eq!(plan.projected_score, plan.current_score);
    }

    #[test]
    fn test_cover_points_only_required_gaps_capped_at_three() {
        let mut matches = Vec::new();
        for i in 0..4 {
            matches.push(make_match(
                &format!("Required thing number {i}"),
                RequirementCategory::Domain,
                RequirementType::Required,
                &[],
                MatchStrength::Gap,
                &[],
            ));
        }
        matches.push(make_match(
            "Preferred thing",
            RequirementCategory::Domain,
            RequirementType::Preferred,
            &[],
            MatchStrength::Gap,
            &[],
        ));
        let analysis = make_analysis(matches, 0.3);
        let plan = build_plan("SRE", "Acme", &analysis, &heuristics(), None);
        assert_eq!(plan.cover_letter_points.len(), 3);
        assert!(plan.cover_letter_points[0].contains("Required thing number 0"));
        assert!(plan
            .cover_letter_points
            .iter()
            .all(|p| !p.contains("Preferred thing")));
    }

    #[test]
    fn test_keywords_to_add_capped_at_five() {
        let mut analysis = make_analysis(vec![], 0.5);
        analysis.missing_keywords = (0..8).map(|i| format!("kw{i}")).collect();
        let plan = build_plan("SRE", "Acme", &analysis, &heuristics(), None);
        assert_eq!(plan.keywords_to_add.len(), 5);
        assert_eq!(plan.keywords_to_add[0], "kw0");
    }

    #[test]
    fn test_suggested_summary_passes_through() {
        let analysis = make_analysis(vec![], 0.5);
        let plan = build_plan(
            "SRE",
            "Acme",
            &analysis,
            &heuristics(),
            Some("Seasoned SRE focused on reliability".to_string()),
        );
        assert_eq!(
            plan.suggested_summary.as_deref(),
            Some("Seasoned SRE focused on reliability")
        );
    }
}
