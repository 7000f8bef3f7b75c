//! Consultation request/result schemas and boundary validation.
//!
//! [`ConsultationBody`] is the permissive wire shape: every field is optional
//! so that a missing `businessQuery` decodes successfully and is then rejected
//! by [`ConsultationBody::validate`] with a precise [`ValidationError`]
//! instead of an opaque decode failure.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ValidationError;

/// Maximum accepted length of a business query, in bytes.
pub const MAX_QUERY_LENGTH: usize = 8_192;

/// Size bracket of the client company.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanySize {
    /// Early-stage company.
    Startup,
    /// Mid-sized company.
    Mid,
    /// Large company.
    Large,
    /// Enterprise.
    Enterprise,
}

impl CompanySize {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Mid => "mid",
            Self::Large => "large",
            Self::Enterprise => "enterprise",
        }
    }

    /// Complexity multiplier applied to the consultation baseline.
    pub fn complexity(self) -> f64 {
        match self {
            Self::Startup => 0.5,
            Self::Mid => 1.0,
            Self::Large => 1.5,
            Self::Enterprise => 2.0,
        }
    }
}

impl fmt::Display for CompanySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanySize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "startup" => Ok(Self::Startup),
            "mid" => Ok(Self::Mid),
            "large" => Ok(Self::Large),
            "enterprise" => Ok(Self::Enterprise),
            other => Err(format!(
                "unknown size '{other}', expected one of startup, mid, large, enterprise"
            )),
        }
    }
}

/// Raw `clientContext` object as received.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientContextBody {
    /// Industry of the client.
    pub industry: Option<String>,
    /// Company size bracket, validated into [`CompanySize`].
    pub company_size: Option<String>,
    /// Any other fields the client attached.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Raw `POST /api/v1/consultation` body as received.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationBody {
    /// Free-text business question.
    pub business_query: Option<String>,
    /// Structured client context.
    pub client_context: Option<ClientContextBody>,
    /// Informational tier tag.
    pub consultation_tier: Option<String>,
}

/// Validated client context.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientContext {
    /// Industry of the client (non-empty).
    pub industry: String,
    /// Company size bracket.
    pub company_size: CompanySize,
    /// Extension fields, passed through untouched.
    pub extra: Map<String, Value>,
}

/// A validated consultation request.
#[derive(Clone, Debug, PartialEq)]
pub struct ConsultationRequest {
    /// Business question (non-empty, trimmed).
    pub query: String,
    /// Client context.
    pub context: ClientContext,
    /// Informational tier tag.
    pub tier: Option<String>,
}

fn required_text(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    let text = value.map(|v| v.trim().to_owned()).unwrap_or_default();
    if text.is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(text)
}

impl ConsultationBody {
    /// Check required fields and convert into a [`ConsultationRequest`].
    pub fn validate(self) -> Result<ConsultationRequest, ValidationError> {
        let query = required_text(self.business_query, "businessQuery")?;
        if query.len() > MAX_QUERY_LENGTH {
            return Err(ValidationError::InvalidField {
                field: "businessQuery",
                reason: format!("exceeds maximum length ({} > {MAX_QUERY_LENGTH})", query.len()),
            });
        }

        let context = self
            .client_context
            .ok_or(ValidationError::MissingField { field: "clientContext" })?;
        let industry = required_text(context.industry, "clientContext.industry")?;
        let size = required_text(context.company_size, "clientContext.companySize")?;
        let company_size = size
            .parse::<CompanySize>()
            .map_err(|reason| ValidationError::InvalidField {
                field: "clientContext.companySize",
                reason,
            })?;

        Ok(ConsultationRequest {
            query,
            context: ClientContext {
                industry,
                company_size,
                extra: context.extra,
            },
            tier: self.consultation_tier.filter(|t| !t.trim().is_empty()),
        })
    }
}

/// Percentage confined to `[0, 100]`.
///
/// Construction clamps out-of-range input and maps `NaN` to zero, so a
/// `Certainty` can never be reported outside its bounds.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Certainty(f64);

impl Certainty {
    /// Lower bound.
    pub const MIN: f64 = 0.0;
    /// Upper bound.
    pub const MAX: f64 = 100.0;

    /// Clamp `value` into range.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(Self::MIN)
        } else {
            Self(value.clamp(Self::MIN, Self::MAX))
        }
    }

    /// The percentage.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Certainty {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Certainty> for f64 {
    fn from(c: Certainty) -> Self {
        c.0
    }
}

/// Generated consultation, serialized with the wire names clients expect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsultationResult {
    /// Monetary magnitude in whole currency units.
    #[serde(rename = "consultationValue")]
    pub value: u64,
    /// Insight section.
    #[serde(rename = "strategicInsights")]
    pub insights: Value,
    /// Roadmap section.
    #[serde(rename = "implementationPlan")]
    pub roadmap: Value,
    /// Return-on-investment section.
    #[serde(rename = "projectedROI")]
    pub roi: Value,
    /// Certainty percentage.
    #[serde(rename = "certaintyLevel")]
    pub certainty: Certainty,
    /// Provenance tag of the generating instance.
    #[serde(rename = "superintelligenceSignature")]
    pub signature: String,
}
