use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use super::{ALGORITHM_PATENT_STATEMENT, ResultProducer};
use crate::constants::ASI_SIGNATURE;
use crate::errors::ProducerError;
use crate::types::{
    AlgorithmBlueprint, AlgorithmRequest, AnalysisReport, AnalysisRequest, Certainty,
    ConsultationRequest, ConsultationResult,
};

/// Deterministic producer.
///
/// Returns the same payloads on every call, optionally after a delay or with
/// a configured failure. Used by tests and by `producer.kind = "fixed"`.
#[derive(Clone, Debug)]
pub struct FixedProducer {
    value: u64,
    certainty: f64,
    delay: Option<Duration>,
    failure: Option<ProducerError>,
}

impl Default for FixedProducer {
    fn default() -> Self {
        Self {
            value: 1_000_000,
            certainty: 97.3,
            delay: None,
            failure: None,
        }
    }
}

impl FixedProducer {
    /// Producer with default fixed payloads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `value` as the consultation and analysis value.
    #[must_use]
    pub fn with_value(mut self, value: u64) -> Self {
        self.value = value;
        self
    }

    /// Report `certainty` (clamped on output).
    #[must_use]
    pub fn with_certainty(mut self, certainty: f64) -> Self {
        self.certainty = certainty;
        self
    }

    /// Sleep for `delay` before every result.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every call with `error`.
    #[must_use]
    pub fn failing(mut self, error: ProducerError) -> Self {
        self.failure = Some(error);
        self
    }

    async fn settle(&self) -> Result<(), ProducerError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResultProducer for FixedProducer {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn consult(
        &self,
        request: &ConsultationRequest,
    ) -> Result<ConsultationResult, ProducerError> {
        self.settle().await?;
        Ok(ConsultationResult {
            value: self.value,
            insights: json!({"focus": request.query, "industry": request.context.industry}),
            roadmap: json!(["assess", "deploy"]),
            roi: json!({"multiple": "10.0x"}),
            certainty: Certainty::new(self.certainty),
            signature: ASI_SIGNATURE.to_owned(),
        })
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, ProducerError> {
        self.settle().await?;
        Ok(AnalysisReport {
            market_opportunities: json!({"input": request.business_data}),
            competitive_landscape: json!({}),
            operational_optimization: json!({}),
            financial_projections: json!({}),
            estimated_value: self.value,
        })
    }

    async fn generate_algorithm(
        &self,
        request: &AlgorithmRequest,
    ) -> Result<AlgorithmBlueprint, ProducerError> {
        self.settle().await?;
        Ok(AlgorithmBlueprint {
            problem_analysis: json!({"problem": request.problem_description}),
            solution_architecture: json!({"domain": request.domain_type}),
            implementation_steps: (1..=request.step_count())
                .map(|i| format!("Step {i}"))
                .collect(),
            optimization_protocols: vec!["baseline".to_owned()],
            patent_protection: ALGORITHM_PATENT_STATEMENT.to_owned(),
            license_required: true,
        })
    }
}
