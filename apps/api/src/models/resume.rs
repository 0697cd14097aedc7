//! Resume input types. The resume arrives fully structured from the caller
//! (the tracker app owns parsing and storage); the engine only reads it.

use serde::{Deserialize, Serialize};

/// One job held by the candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub school: String,
    #[serde(default)]
    pub year: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

/// Structured candidate data supplied in full by the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub technical_skills: Vec<String>,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub experiences: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub total_years_experience: u32,
    #[serde(default)]
    pub industries: Vec<String>,
}

impl ResumeRecord {
    /// A score computed against an empty resume is meaningless, so matching
    /// refuses to start unless at least one of skills/experiences is present.
    pub fn validate_for_matching(&self) -> Result<(), String> {
        if self.technical_skills.is_empty() && self.experiences.is_empty() {
            return Err(
                "resume must include technical_skills or experiences before analysis".to_string(),
            );
        }
        Ok(())
    }

    /// Lowercased experience bullet text, joined.
    pub fn bullet_text(&self) -> String {
        self.experiences
            .iter()
            .flat_map(|e| e.bullets.iter())
            .map(|b| b.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Lowercased project names, descriptions, and technologies, joined.
    pub fn project_text(&self) -> String {
        self.projects
            .iter()
            .map(|p| {
                format!("{} {} {}", p.name, p.description, p.technologies.join(" ")).to_lowercase()
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Lowercased degree + school text across all education entries.
    pub fn education_text(&self) -> String {
        self.education
            .iter()
            .map(|e| format!("{} {}", e.degree, e.school).to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Lowercased certifications, joined.
    pub fn certifications_text(&self) -> String {
        self.certifications.join(" ").to_lowercase()
    }

    /// Every piece of free text the keyword strategies search over:
    /// summary, role titles/companies, bullets, projects, skills, certs.
    pub fn searchable_text(&self) -> String {
        let mut parts: Vec<String> = vec![self.summary.to_lowercase()];
        for exp in &self.experiences {
            parts.push(format!("{} {}", exp.title, exp.company).to_lowercase());
        }
        parts.push(self.bullet_text());
        parts.push(self.project_text());
        parts.push(
            self.technical_skills
                .iter()
                .chain(self.soft_skills.iter())
                .map(|s| s.to_lowercase())
                .collect::<Vec<_>>()
                .join(" "),
        );
        parts.push(self.certifications_text());
        parts.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_resume_fails_validation() {
        let resume = ResumeRecord::default();
        assert!(resume.validate_for_matching().is_err());
    }

    #[test]
    fn test_skills_only_resume_passes_validation() {
        let resume = ResumeRecord {
            technical_skills: vec!["Python".to_string()],
            ..Default::default()
        };
        assert!(resume.validate_for_matching().is_ok());
    }

    #[test]
    fn test_experiences_only_resume_passes_validation() {
        let resume = ResumeRecord {
            experiences: vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                bullets: vec![],
            }],
            ..Default::default()
        };
        assert!(resume.validate_for_matching().is_ok());
    }

    #[test]
    fn test_searchable_text_is_lowercased_and_covers_sections() {
        let resume = ResumeRecord {
            summary: "Backend Engineer".to_string(),
            technical_skills: vec!["Docker".to_string()],
            experiences: vec![ExperienceEntry {
                title: "SRE".to_string(),
                company: "Acme".to_string(),
                bullets: vec!["Migrated CI/CD to GitHub Actions".to_string()],
            }],
            projects: vec![ProjectEntry {
                name: "Homelab".to_string(),
                description: "Self-hosted services".to_string(),
                technologies: vec!["Terraform".to_string()],
            }],
            certifications: vec!["AWS Solutions Architect".to_string()],
            ..Default::default()
        };
        let text = resume.searchable_text();
        assert!(text.contains("backend engineer"));
        assert!(text.contains("docker"));
        assert!(text.contains("github actions"));
        assert!(text.contains("terraform"));
        assert!(text.contains("aws solutions architect"));
        assert_eq!(text, text.to_lowercase());
    }

    #[test]
    fn test_resume_deserializes_with_missing_optional_fields() {
        let json = r#"{"name": "Ada", "email": "ada@example.com"}"#;
        let resume: ResumeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(resume.name, "Ada");
        assert!(resume.technical_skills.is_empty());
        assert_eq!(resume.total_years_experience, 0);
    }
}
