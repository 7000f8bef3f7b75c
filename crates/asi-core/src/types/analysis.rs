//! Channel analysis request and report.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of a `requestSuperintelligentAnalysis` message.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Opaque business data to analyze; absent decodes as `null`.
    #[serde(default)]
    pub business_data: Value,
    /// Client-chosen correlation id, echoed on the reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// Generated analysis report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// Market opportunities section.
    pub market_opportunities: Value,
    /// Competitive landscape section.
    pub competitive_landscape: Value,
    /// Operational optimization section.
    pub operational_optimization: Value,
    /// Financial projections section.
    pub financial_projections: Value,
    /// Estimated value in whole currency units.
    pub estimated_value: u64,
}

impl AnalysisReport {
    /// Estimated value rendered as `$N,NNN`.
    pub fn value_generated(&self) -> String {
        format_usd(self.estimated_value)
    }
}

/// Render an amount as US dollars with thousands separators.
pub fn format_usd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
