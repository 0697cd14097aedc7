use std::sync::Arc;

use crate::analyzer::extractor::RequirementExtractor;
use crate::analyzer::heuristics::Heuristics;
use crate::analyzer::matcher::MatchAssist;
use crate::analyzer::normalizer::PostingNormalizer;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub heuristics: Heuristics,
    /// Compiled regexes; built once at startup and shared across requests.
    pub normalizer: Arc<PostingNormalizer>,
    pub extractor: Arc<RequirementExtractor>,
    /// Optional match-refinement assist. None means deterministic-only.
    pub assist: Option<Arc<dyn MatchAssist>>,
}
