//! Prompt constants and builders for the match-refinement assist.

use anyhow::Result;

use crate::analyzer::extractor::Requirement;
use crate::models::resume::ResumeRecord;

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// System prompt for summary suggestions, which are prose rather than JSON.
pub const SUMMARY_SYSTEM: &str = "You are a career advisor. \
    Respond with the rewritten summary paragraph only: \
    no preamble, no markdown, no quotation marks. \
    Never invent experience the candidate does not have.";

const REFINE_INSTRUCTION: &str = "\
    Assess how well the candidate's resume satisfies EACH requirement below. \
    Return JSON of the form {\"matches\": [...]} with EXACTLY one entry per \
    requirement, in the same order. Each entry must echo the requirement \
    object unchanged and add: strength (one of \"strong\", \"match\", \
    \"partial\", \"weak\", \"gap\"), evidence (array of short resume quotes), \
    explanation (one sentence), suggestion (string or null), and confidence \
    (0.0 to 1.0). \
    CRITICAL: every evidence quote must appear verbatim in the resume JSON. \
    Do NOT infer skills the resume does not state.";

/// Builds the batch refinement prompt: instruction + requirements JSON +
/// resume JSON.
pub fn refine_matches_prompt(
    requirements: &[Requirement],
    resume: &ResumeRecord,
) -> Result<String> {
    let requirements_json = serde_json::to_string_pretty(requirements)?;
    let resume_json = serde_json::to_string_pretty(resume)?;
    Ok(format!(
        "{REFINE_INSTRUCTION}\n\nREQUIREMENTS:\n{requirements_json}\n\nRESUME:\n{resume_json}"
    ))
}

/// Builds the tailored-summary prompt.
pub fn summary_prompt(
    resume: &ResumeRecord,
    job_title: &str,
    company: &str,
    requirements: &[Requirement],
) -> Result<String> {
    let resume_json = serde_json::to_string_pretty(resume)?;
    let requirement_lines = requirements
        .iter()
        .map(|r| format!("- {}", r.text))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(format!(
        "Rewrite the candidate's professional summary (2-3 sentences) so it \
         targets the role of {job_title} at {company}. Emphasize the \
         candidate's strongest overlaps with these requirements:\n\
         {requirement_lines}\n\nRESUME:\n{resume_json}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::extractor::{RequirementCategory, RequirementType};

    fn sample_requirement() -> Requirement {
        Requirement {
            text: "5+ years of Python experience".to_string(),
            category: RequirementCategory::Experience,
            requirement_type: RequirementType::Required,
            keywords: vec!["python".to_string()],
            years_experience: Some(5),
            is_dealbreaker: false,
        }
    }

    #[test]
    fn test_refine_prompt_embeds_requirements_and_resume() {
        let resume = ResumeRecord {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        let prompt = refine_matches_prompt(&[sample_requirement()], &resume).unwrap();
        assert!(prompt.contains("5+ years of Python experience"));
        assert!(prompt.contains("ada@example.com"));
        assert!(prompt.contains("EXACTLY one entry per"));
    }

    #[test]
    fn test_summary_prompt_names_role_and_company() {
        let resume = ResumeRecord::default();
        let prompt = summary_prompt(&resume, "SRE", "Acme", &[sample_requirement()]).unwrap();
        assert!(prompt.contains("SRE at Acme"));
        assert!(prompt.contains("- 5+ years of Python experience"));
    }
}
