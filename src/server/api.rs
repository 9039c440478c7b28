use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::{rank_by_marginal_utility, AnalysisCache, AnalysisReport, RankedStat, StressTest};
use crate::archetype::{Archetype, ArchetypeGenerator, DEFAULT_BOOST_SCALE};
use crate::catalog::{default_catalog, StatCatalog};
use crate::combat::{DuelSimulator, Opponent, DEFAULT_MAX_ROUNDS};
use crate::config::{AnalysisConfig, DEFAULT_REPETITIONS};
use crate::error::AnalysisError;

pub const MAX_REPETITIONS: usize = 100_000;
pub const MAX_ROUNDS: u32 = 1_000;
const ENGINE: &str = "utility_analyzer_v1";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArchetypesRequest {
    pub catalog: Option<StatCatalog>,
    pub boost_scale: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ArchetypesResponse {
    pub status: &'static str,
    pub count: usize,
    pub archetypes: Vec<Archetype>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    pub catalog: Option<StatCatalog>,
    pub repetitions: Option<usize>,
    pub seed: Option<u64>,
    pub opponent: Option<Opponent>,
    pub max_rounds: Option<u32>,
    pub parallel: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse<'a> {
    pub status: &'static str,
    pub engine: &'static str,
    pub report: &'a AnalysisReport,
    pub ranking: Vec<RankedStat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub field: &'static str,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationErrorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub errors: Vec<ValidationIssue>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("invalid analysis request")]
    Validation(ValidationErrorResponse),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("failed to serialize response: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl ApiError {
    /// Client mistakes are 400s; a failing simulator or pool is a 500.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Parse(_) | Self::Validation(_) => true,
            Self::Analysis(AnalysisError::InvalidCatalog(_))
            | Self::Analysis(AnalysisError::InvalidRepetitions(_))
            | Self::Analysis(AnalysisError::InvalidBoostScale(_))
            | Self::Analysis(AnalysisError::InvalidThresholds { .. })
            | Self::Analysis(AnalysisError::MissingBaseline) => true,
            Self::Analysis(_) | Self::Serialize(_) => false,
        }
    }
}

pub fn health_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({
        "status": "ok",
        "service": "balance-lab-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn catalog_payload() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&default_catalog())
}

fn parse_body<T: Default + for<'de> Deserialize<'de>>(body: &str) -> Result<T, ApiError> {
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(body).map_err(ApiError::Parse)
}

pub fn archetypes_payload(body: &str) -> Result<String, ApiError> {
    let request: ArchetypesRequest = parse_body(body)?;
    let boost_scale = request.boost_scale.unwrap_or(DEFAULT_BOOST_SCALE);
    if !boost_scale.is_finite() || boost_scale < 0.0 {
        return Err(ApiError::Validation(single_issue(
            "boost_scale",
            format!("must be a finite, non-negative number (got {boost_scale})"),
        )));
    }
    let catalog = request.catalog.unwrap_or_else(default_catalog);
    if let Err(err) = catalog.check_boost_scale(boost_scale) {
        return Err(ApiError::Validation(single_issue("catalog", err.to_string())));
    }
    let archetypes = ArchetypeGenerator::with_boost_scale(&catalog, boost_scale).generate_all();
    serde_json::to_string_pretty(&ArchetypesResponse {
        status: "ok",
        count: archetypes.len(),
        archetypes,
    })
    .map_err(ApiError::Serialize)
}

pub fn analyze_payload(body: &str, cache: &AnalysisCache) -> Result<String, ApiError> {
    let request: AnalyzeRequest = parse_body(body)?;
    let (test, simulator) = analyze_request_to_stress_test(request)?;

    let report = cache.get_or_compute(&(&test, &simulator), || test.run_concurrent(&simulator))?;
    let ranking = rank_by_marginal_utility(&report.marginal_utilities);
    serde_json::to_string_pretty(&AnalyzeResponse {
        status: "ok",
        engine: ENGINE,
        report: &report,
        ranking,
    })
    .map_err(ApiError::Serialize)
}

fn analyze_request_to_stress_test(
    request: AnalyzeRequest,
) -> Result<(StressTest, DuelSimulator), ApiError> {
    let mut errors = Vec::new();

    let repetitions = request.repetitions.unwrap_or(DEFAULT_REPETITIONS);
    if !(1..=MAX_REPETITIONS).contains(&repetitions) {
        errors.push(ValidationIssue {
            field: "repetitions",
            messages: vec![format!("must be between 1 and {MAX_REPETITIONS} (got {repetitions})")],
        });
    }
    let max_rounds = request.max_rounds.unwrap_or(DEFAULT_MAX_ROUNDS);
    if !(1..=MAX_ROUNDS).contains(&max_rounds) {
        errors.push(ValidationIssue {
            field: "max_rounds",
            messages: vec![format!("must be between 1 and {MAX_ROUNDS} (got {max_rounds})")],
        });
    }
    if let Some(catalog) = &request.catalog {
        if catalog.is_empty() {
            errors.push(ValidationIssue {
                field: "catalog",
                messages: vec!["must contain at least one stat".to_string()],
            });
        }
    }
    if !errors.is_empty() {
        return Err(ApiError::Validation(ValidationErrorResponse {
            status: "error",
            message: "Validation failed",
            errors,
        }));
    }

    let config = AnalysisConfig {
        repetitions,
        seed: request.seed.unwrap_or(0),
        parallel: request.parallel.unwrap_or(true),
        ..AnalysisConfig::default()
    };
    let test = StressTest::new(request.catalog.unwrap_or_else(default_catalog), config);
    let simulator = DuelSimulator::new(request.opponent.unwrap_or_default(), max_rounds);
    Ok((test, simulator))
}

fn single_issue(field: &'static str, message: String) -> ValidationErrorResponse {
    ValidationErrorResponse {
        status: "error",
        message: "Validation failed",
        errors: vec![ValidationIssue {
            field,
            messages: vec![message],
        }],
    }
}
