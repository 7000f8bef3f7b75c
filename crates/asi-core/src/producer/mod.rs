//! Result production.
//!
//! Every payload the server returns is generated behind the [`ResultProducer`]
//! capability. The default [`RandomProducer`] fabricates branded figures;
//! [`FixedProducer`] returns deterministic output for tests and demos.
//!
//! Callers never await a producer directly. [`run_guarded`] bounds each call
//! by a timeout and converts a panic into [`ProducerError::Panicked`], so a
//! misbehaving producer can only ever surface as an error value.

mod fixed;
mod random;

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;

use crate::errors::ProducerError;
use crate::types::{
    AlgorithmBlueprint, AlgorithmRequest, AnalysisReport, AnalysisRequest, ConsultationRequest,
    ConsultationResult,
};

pub use fixed::FixedProducer;
pub use random::RandomProducer;

/// Baseline consultation value before scaling, in whole currency units.
pub const CONSULTATION_BASELINE: u64 = 750_000_000;

/// Confidence reported with every channel analysis.
pub const ANALYSIS_CONFIDENCE: f64 = 97.3;

/// Processing time label reported with every channel analysis.
pub const ANALYSIS_PROCESSING_TIME: &str = "0.003 seconds";

/// Patent statement embedded in generated algorithms.
pub const ALGORITHM_PATENT_STATEMENT: &str =
    "This algorithm generated using patent-protected technology";

/// Generates consultation, analysis and algorithm payloads.
///
/// Implementors must be `Send + Sync`; one instance is shared by every
/// handler and every spawned analysis task.
#[async_trait]
pub trait ResultProducer: Send + Sync {
    /// Short name for logs (e.g. `"random"`).
    fn name(&self) -> &'static str;

    /// Produce a consultation for a validated request.
    async fn consult(
        &self,
        request: &ConsultationRequest,
    ) -> Result<ConsultationResult, ProducerError>;

    /// Produce a channel analysis report.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisReport, ProducerError>;

    /// Produce an algorithm blueprint.
    async fn generate_algorithm(
        &self,
        request: &AlgorithmRequest,
    ) -> Result<AlgorithmBlueprint, ProducerError>;
}

/// Scale the baseline by company complexity and superintelligence level.
pub fn consultation_value(complexity: f64, superintelligence_level: u32) -> u64 {
    let scaled =
        CONSULTATION_BASELINE as f64 * complexity * f64::from(superintelligence_level) / 100.0;
    if scaled.is_finite() && scaled > 0.0 {
        scaled.round() as u64
    } else {
        0
    }
}

/// Await `fut` under a time bound, mapping timeouts and panics to errors.
pub async fn run_guarded<T, F>(timeout: Duration, fut: F) -> Result<T, ProducerError>
where
    F: Future<Output = Result<T, ProducerError>>,
{
    match tokio::time::timeout(timeout, AssertUnwindSafe(fut).catch_unwind()).await {
        Ok(Ok(result)) => result,
        Ok(Err(_panic)) => Err(ProducerError::Panicked),
        Err(_elapsed) => Err(ProducerError::Timeout(timeout)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn consultation_value_scales() {
        assert_eq!(consultation_value(1.0, 100), 750_000_000);
        assert_eq!(consultation_value(1.0, 156), 1_170_000_000);
        assert_eq!(consultation_value(2.0, 156), 2_340_000_000);
        assert_eq!(consultation_value(0.5, 156), 585_000_000);
    }

    #[test]
    fn consultation_value_never_negative() {
        assert_eq!(consultation_value(-1.0, 156), 0);
        assert_eq!(consultation_value(f64::NAN, 156), 0);
        assert_eq!(consultation_value(1.0, 0), 0);
    }

    #[tokio::test]
    async fn run_guarded_passes_through_ok() {
        let out = run_guarded(Duration::from_secs(1), async { Ok::<_, ProducerError>(7) }).await;
        assert_eq!(out, Ok(7));
    }

    #[tokio::test]
    async fn run_guarded_passes_through_err() {
        let out: Result<u8, _> = run_guarded(Duration::from_secs(1), async {
            Err(ProducerError::Unavailable("down".into()))
        })
        .await;
        assert_matches!(out, Err(ProducerError::Unavailable(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn run_guarded_times_out() {
        let out: Result<u8, _> = run_guarded(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(1)
        })
        .await;
        assert_eq!(out, Err(ProducerError::Timeout(Duration::from_millis(50))));
    }

    #[tokio::test]
    async fn run_guarded_catches_panic() {
        let out: Result<u8, _> = run_guarded(Duration::from_secs(1), async {
            panic!("producer exploded");
        })
        .await;
        assert_eq!(out, Err(ProducerError::Panicked));
    }
}
