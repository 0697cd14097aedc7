use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analyzer::matcher::{analyze_fit, FitAnalysis};
use crate::analyzer::tailor::{build_plan, TailoringPlan};
use crate::analyzer::{fetch::fetch_posting, parse_posting, ParsedPosting};
use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub job_url: Option<String>,
    /// Raw page content supplied by the caller (e.g. a browser extension).
    /// When present, no fetch happens and this wins over job_url.
    #[serde(default)]
    pub job_html: Option<String>,
    pub resume: ResumeRecord,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub posting: ParsedPosting,
    pub analysis: FitAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub job_html: Option<String>,
    pub resume: ResumeRecord,
    pub analysis: FitAnalysis,
}

#[derive(Debug, Deserialize)]
pub struct QuickCheckRequest {
    #[serde(default)]
    pub job_url: Option<String>,
    #[serde(default)]
    pub job_html: Option<String>,
}

/// Resolves posting content: inline HTML wins, otherwise the URL is fetched.
/// Neither present is a caller error.
async fn resolve_posting(
    state: &AppState,
    job_url: Option<&str>,
    job_html: Option<String>,
) -> Result<ParsedPosting, AppError> {
    let url = job_url.unwrap_or("");
    let (html, fetched_at) = match job_html {
        Some(html) => (html, None),
        None => {
            if url.is_empty() {
                return Err(AppError::Validation(
                    "either job_url or job_html must be provided".to_string(),
                ));
            }
            let page = fetch_posting(url, &state.config).await?;
            (page.html, Some(page.fetched_at))
        }
    };

    let mut posting = parse_posting(url, &html, &state.normalizer, &state.extractor);
    posting.fetched_at = fetched_at;
    Ok(posting)
}

/// POST /api/v1/analyzer/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    req.resume
        .validate_for_matching()
        .map_err(AppError::Validation)?;

    let posting = resolve_posting(&state, req.job_url.as_deref(), req.job_html).await?;
    info!(
        title = %posting.title,
        company = %posting.company,
        requirements = posting.requirements.len(),
        confidence = posting.parse_confidence,
        "posting parsed"
    );

    let analysis = analyze_fit(
        &req.resume,
        &posting.requirements,
        &state.heuristics,
        state.assist.as_deref(),
    )
    .await;

    Ok(Json(AnalyzeResponse { posting, analysis }))
}

/// POST /api/v1/analyzer/tailor
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(req): Json<TailorRequest>,
) -> Result<Json<TailoringPlan>, AppError> {
    req.resume
        .validate_for_matching()
        .map_err(AppError::Validation)?;

    let posting = resolve_posting(&state, req.job_url.as_deref(), req.job_html).await?;

    // The summary suggestion needs the assist; absence or failure just means
    // no suggestion in the plan.
    let suggested_summary = match &state.assist {
        Some(assist) => match assist
            .suggest_summary(
                &req.resume,
                &posting.title,
                &posting.company,
                &posting.requirements,
            )
            .await
        {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("summary suggestion unavailable: {e}");
                None
            }
        },
        None => None,
    };

    let plan = build_plan(
        &posting.title,
        &posting.company,
        &req.analysis,
        &state.heuristics,
        suggested_summary,
    );

    Ok(Json(plan))
}

/// POST /api/v1/analyzer/quick-check
/// Parses the posting only; no resume, no scoring.
pub async fn handle_quick_check(
    State(state): State<AppState>,
    Json(req): Json<QuickCheckRequest>,
) -> Result<Json<ParsedPosting>, AppError> {
    let posting = resolve_posting(&state, req.job_url.as_deref(), req.job_html).await?;
    Ok(Json(posting))
}
