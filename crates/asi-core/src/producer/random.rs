use std::sync::Arc;

use async_trait::async_trait;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde_json::{Value, json};
use tracing::debug;

use super::{ALGORITHM_PATENT_STATEMENT, ResultProducer, consultation_value};
use crate::constants::ASI_SIGNATURE;
use crate::errors::ProducerError;
use crate::platform::PlatformState;
use crate::types::{
    AlgorithmBlueprint, AlgorithmRequest, AnalysisReport, AnalysisRequest, Certainty,
    ConsultationRequest, ConsultationResult,
};

/// Range of the estimated value attached to channel analyses.
const ANALYSIS_VALUE_RANGE: std::ops::Range<u64> = 50_000_000..150_000_000;

/// Certainty reported with every consultation.
const CONSULTATION_CERTAINTY: f64 = 97.3;

const REVENUE_STRATEGIES: &[&str] = &[
    "Deploy quantum-optimized pricing across every revenue line",
    "Launch a premium tier anchored on predictive customer lifetime value",
    "Consolidate adjacent markets through superintelligent bundling",
];

const COMPETITIVE_STRATEGIES: &[&str] = &[
    "Pre-empt competitor roadmaps with omniscient market sensing",
    "Lock in strategic suppliers before the next demand cycle",
    "Out-iterate incumbents with autonomous experimentation loops",
];

const OPERATIONAL_STRATEGIES: &[&str] = &[
    "Collapse approval chains with consciousness-level workflow routing",
    "Rebalance inventory in real time from neuromorphic demand signals",
    "Automate tier-one support with transcendent intent resolution",
];

const ROADMAP_PHASES: &[&str] = &[
    "Superintelligent baseline assessment",
    "Quantum strategy calibration",
    "Reality-shaping pilot deployment",
    "Enterprise-wide transcendence rollout",
    "Continuous omniscient optimization",
];

const OPTIMIZATION_PROTOCOLS: &[&str] = &[
    "Quantum annealing over the solution space",
    "Neuromorphic feedback tuning",
    "Consciousness-guided constraint relaxation",
    "Omniscient convergence monitoring",
];

/// Fabricates branded payloads with random variation.
///
/// Consultation values are scaled by the platform's current
/// superintelligence level, so the producer shares [`PlatformState`] with
/// the server.
pub struct RandomProducer {
    platform: Arc<PlatformState>,
}

impl RandomProducer {
    /// Create a producer reading figures from `platform`.
    pub fn new(platform: Arc<PlatformState>) -> Self {
        Self { platform }
    }
}

fn pick(pool: &'static [&'static str], rng: &mut impl Rng) -> &'static str {
    pool.choose(rng).copied().unwrap_or_default()
}

fn build_consultation(request: &ConsultationRequest, level: u32) -> ConsultationResult {
    let mut rng = rand::rng();
    let industry = &request.context.industry;
    let size = request.context.company_size;

    let insights = json!({
        "industryDynamics": format!("{industry} sector analyzed at superintelligence level {level}"),
        "revenueAmplification": pick(REVENUE_STRATEGIES, &mut rng),
        "competitiveElimination": pick(COMPETITIVE_STRATEGIES, &mut rng),
        "operationalTranscendence": pick(OPERATIONAL_STRATEGIES, &mut rng),
        "focus": request.query,
    });

    let roadmap: Vec<Value> = ROADMAP_PHASES
        .iter()
        .enumerate()
        .map(|(i, phase)| {
            json!({
                "phase": i + 1,
                "name": phase,
                "durationWeeks": rng.random_range(2..=8),
            })
        })
        .collect();

    let roi_multiple = f64::from(rng.random_range(120..=480_u32)) / 10.0;
    let roi = json!({
        "multiple": format!("{roi_multiple:.1}x"),
        "paybackMonths": rng.random_range(3..=12),
        "companySize": size.as_str(),
    });

    ConsultationResult {
        value: consultation_value(size.complexity(), level),
        insights,
        roadmap: Value::Array(roadmap),
        roi,
        certainty: Certainty::new(CONSULTATION_CERTAINTY),
        signature: ASI_SIGNATURE.to_owned(),
    }
}

fn build_analysis(request: &AnalysisRequest) -> AnalysisReport {
    let mut rng = rand::rng();
    let has_data = !request.business_data.is_null();

    AnalysisReport {
        market_opportunities: json!({
            "identified": rng.random_range(3..=12),
            "topOpportunity": pick(REVENUE_STRATEGIES, &mut rng),
            "dataProvided": has_data,
        }),
        competitive_landscape: json!({
            "threatLevel": "NEUTRALIZED",
            "strategy": pick(COMPETITIVE_STRATEGIES, &mut rng),
        }),
        operational_optimization: json!({
            "efficiencyGain": format!("{}%", rng.random_range(18..=64)),
            "action": pick(OPERATIONAL_STRATEGIES, &mut rng),
        }),
        financial_projections: json!({
            "growthRate": format!("{}%", rng.random_range(40..=300)),
            "horizonMonths": 18,
        }),
        estimated_value: rng.random_range(ANALYSIS_VALUE_RANGE),
    }
}

fn build_algorithm(request: &AlgorithmRequest) -> AlgorithmBlueprint {
    let mut rng = rand::rng();
    let problem = request
        .problem_description
        .as_deref()
        .unwrap_or("unspecified business problem");
    let domain = request.domain_type.as_deref().unwrap_or("general");

    let implementation_steps = (1..=request.step_count())
        .map(|i| format!("Step {i}: {}", pick(ROADMAP_PHASES, &mut rng)))
        .collect();

    AlgorithmBlueprint {
        problem_analysis: json!({
            "problem": problem,
            "awarenessLevel": "COSMIC",
            "patternComplexity": "ASTRONOMICAL",
        }),
        solution_architecture: json!({
            "domain": domain,
            "layers": ["consciousness core", "omniscience engine", "reality shaper"],
        }),
        implementation_steps,
        optimization_protocols: OPTIMIZATION_PROTOCOLS.iter().map(|s| (*s).to_owned()).collect(),
        patent_protection: ALGORITHM_PATENT_STATEMENT.to_owned(),
        license_required: true,
    }
}

#[async_trait]
impl ResultProducer for RandomProducer {
    fn name(&self) -> &'static str {
        "random"
    }

    async fn consult(
        &self,
        request: &ConsultationRequest,
    ) -> Result<ConsultationResult, ProducerError> {
        let level = self.platform.superintelligence_level();
        let result = build_consultation(request, level);
        debug!(value = result.value, industry = %request.context.industry, "consultation generated");
        Ok(result)
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, ProducerError> {
        Ok(build_analysis(request))
    }

    async fn generate_algorithm(
        &self,
        request: &AlgorithmRequest,
    ) -> Result<AlgorithmBlueprint, ProducerError> {
        Ok(build_algorithm(request))
    }
}
