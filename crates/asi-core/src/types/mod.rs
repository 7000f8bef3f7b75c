//! Request and response schemas for every endpoint.

pub mod algorithm;
pub mod analysis;
pub mod consultation;

pub use algorithm::{AlgorithmBlueprint, AlgorithmRequest};
pub use analysis::{AnalysisReport, AnalysisRequest, format_usd};
pub use consultation::{
    Certainty, ClientContext, ClientContextBody, CompanySize, ConsultationBody,
    ConsultationRequest, ConsultationResult,
};
