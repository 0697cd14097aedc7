//! Tuned constants for scoring and tailoring, gathered into one injectable
//! struct instead of being scattered as literals through the strategies.
//!
//! The defaults are hand-tuned and have no empirical derivation; treat them
//! as candidates for recalibration, not ground truth.

use serde::{Deserialize, Serialize};

use crate::analyzer::matcher::MatchStrength;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Heuristics {
    // Base value per match strength, multiplied by per-match confidence.
    pub strong_value: f32,
    pub match_value: f32,
    pub partial_value: f32,
    pub weak_value: f32,
    pub gap_value: f32,

    // Requirement weighting in the aggregate score.
    pub required_weight: f32,
    pub preferred_weight: f32,

    // Label floors, checked high to low.
    pub strong_label_floor: f32,
    pub good_label_floor: f32,
    pub moderate_label_floor: f32,
    pub weak_label_floor: f32,
    /// Minimum overall score to recommend applying (dealbreakers aside).
    pub apply_floor: f32,

    // Experience strategy margins.
    /// Years above the threshold needed for a Strong rating.
    pub strong_years_margin: u32,
    /// Years below the threshold still rated Partial.
    pub partial_years_slack: u32,

    // Per-strategy confidence assignments.
    pub years_met_confidence: f32,
    pub years_partial_confidence: f32,
    pub years_gap_confidence: f32,
    pub skills_full_confidence: f32,
    pub skills_partial_confidence: f32,
    pub skills_gap_confidence: f32,
    pub education_confidence: f32,
    pub education_gap_confidence: f32,
    pub soft_evidence_confidence: f32,
    pub soft_listed_confidence: f32,
    pub soft_gap_confidence: f32,
    pub clearance_confidence: f32,
    pub clearance_gap_confidence: f32,
    /// Location/hybrid logistics are never auto-resolved, so confidence stays low.
    pub logistics_confidence: f32,
    pub generic_match_confidence: f32,
    pub generic_partial_confidence: f32,
    pub generic_weak_confidence: f32,

    // Output caps.
    pub top_suggestions_cap: usize,
    pub missing_keywords_cap: usize,
    pub keywords_to_add_cap: usize,
    pub cover_points_cap: usize,

    // Tailoring score projection.
    pub high_action_bonus: f32,
    pub medium_action_bonus: f32,
    /// Only the first N actions count toward the projection.
    pub projection_action_cap: usize,
}

impl Default for Heuristics {
    fn default() -> Self {
        Heuristics {
            strong_value: 1.0,
            match_value: 0.85,
            partial_value: 0.5,
            weak_value: 0.25,
            gap_value: 0.0,

            required_weight: 2.0,
            preferred_weight: 1.0,

            strong_label_floor: 0.85,
            good_label_floor: 0.70,
            moderate_label_floor: 0.50,
            weak_label_floor: 0.30,
            apply_floor: 0.50,

            strong_years_margin: 2,
            partial_years_slack: 1,

            years_met_confidence: 0.95,
            years_partial_confidence: 0.85,
            years_gap_confidence: 0.9,
            skills_full_confidence: 0.9,
            skills_partial_confidence: 0.8,
            skills_gap_confidence: 0.85,
            education_confidence: 0.9,
            education_gap_confidence: 0.8,
            soft_evidence_confidence: 0.75,
            soft_listed_confidence: 0.7,
            soft_gap_confidence: 0.6,
            clearance_confidence: 0.9,
            clearance_gap_confidence: 0.85,
            logistics_confidence: 0.5,
            generic_match_confidence: 0.7,
            generic_partial_confidence: 0.6,
            generic_weak_confidence: 0.5,

            top_suggestions_cap: 5,
            missing_keywords_cap: 10,
            keywords_to_add_cap: 5,
            cover_points_cap: 3,

            high_action_bonus: 0.05,
            medium_action_bonus: 0.02,
            projection_action_cap: 5,
        }
    }
}

impl Heuristics {
    /// Base value contributed by a match of the given strength.
    pub fn strength_value(&self, strength: MatchStrength) -> f32 {
        match strength {
            MatchStrength::Strong => self.strong_value,
            MatchStrength::Match => self.match_value,
            MatchStrength::Partial => self.partial_value,
            MatchStrength::Weak => self.weak_value,
            MatchStrength::Gap => self.gap_value,
        }
    }
}
