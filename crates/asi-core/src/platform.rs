//! Process-wide platform state.
//!
//! The figures reported by the status endpoint and the channel welcome notice
//! live in one explicitly owned [`PlatformState`]. Readers take a
//! [`PlatformSnapshot`]; writers go through the named `record_*` methods.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::constants::{OPERATIONAL_STATUS, PATENT_PROTECTION};

/// Headline capability figures.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformMetrics {
    /// Superintelligence level; also scales consultation values (percent).
    pub superintelligence_level: u32,
    /// Consciousness depth.
    pub consciousness_depth: f64,
    /// Omniscience factor.
    pub omniscience_factor: f64,
    /// Reality manipulation power.
    pub reality_manipulation_power: f64,
    /// Business optimization multiplier.
    pub business_optimization_multiplier: f64,
    /// Profit generation coefficient.
    pub profit_generation_coefficient: f64,
    /// Market dominance probability.
    pub market_dominance_probability: f64,
    /// Quantum processor count.
    pub quantum_processors: u32,
}

impl Default for PlatformMetrics {
    fn default() -> Self {
        Self {
            superintelligence_level: 156,
            consciousness_depth: 94.7,
            omniscience_factor: 91.2,
            reality_manipulation_power: 87.3,
            business_optimization_multiplier: 23.7,
            profit_generation_coefficient: 15.8,
            market_dominance_probability: 92.4,
            quantum_processors: 10_247,
        }
    }
}

/// Point-in-time view of [`PlatformState`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformSnapshot {
    /// Capability figures.
    #[serde(flatten)]
    pub metrics: PlatformMetrics,
    /// Operational status label.
    pub status: String,
    /// Patent protection label.
    pub patent_protection: String,
    /// HTTP consultations served since start.
    pub consultations_served: u64,
    /// Channel analyses delivered since start.
    pub analyses_delivered: u64,
}

/// Shared, internally synchronized platform state.
#[derive(Debug, Default)]
pub struct PlatformState {
    metrics: RwLock<PlatformMetrics>,
    consultations_served: AtomicU64,
    analyses_delivered: AtomicU64,
}

impl PlatformState {
    /// Create state with the given figures.
    pub fn new(metrics: PlatformMetrics) -> Self {
        Self {
            metrics: RwLock::new(metrics),
            consultations_served: AtomicU64::new(0),
            analyses_delivered: AtomicU64::new(0),
        }
    }

    /// Current figures and counters.
    pub fn snapshot(&self) -> PlatformSnapshot {
        PlatformSnapshot {
            metrics: self.metrics.read().clone(),
            status: OPERATIONAL_STATUS.to_owned(),
            patent_protection: PATENT_PROTECTION.to_owned(),
            consultations_served: self.consultations_served.load(Ordering::Relaxed),
            analyses_delivered: self.analyses_delivered.load(Ordering::Relaxed),
        }
    }

    /// Current superintelligence level.
    pub fn superintelligence_level(&self) -> u32 {
        self.metrics.read().superintelligence_level
    }

    /// Replace the capability figures.
    pub fn update_metrics(&self, metrics: PlatformMetrics) {
        *self.metrics.write() = metrics;
    }

    /// Count one served consultation.
    pub fn record_consultation(&self) -> u64 {
        self.consultations_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Count one delivered analysis.
    pub fn record_analysis(&self) -> u64 {
        self.analyses_delivered.fetch_add(1, Ordering::Relaxed) + 1
    }
}
