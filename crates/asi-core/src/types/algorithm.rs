//! Algorithm generation request and blueprint.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/v1/algorithm-generation`. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmRequest {
    /// Problem statement.
    #[serde(default)]
    pub problem_description: Option<String>,
    /// Business domain the problem belongs to.
    #[serde(default)]
    pub domain_type: Option<String>,
    /// Requested complexity, as a number or a label.
    #[serde(default)]
    pub complexity_level: Option<Value>,
}

impl AlgorithmRequest {
    /// Number of implementation steps implied by `complexityLevel`, in `1..=10`.
    ///
    /// Numbers are rounded and clamped; the labels `low`, `medium` and `high`
    /// map to 3, 5 and 8. Anything else falls back to 5.
    pub fn step_count(&self) -> usize {
        match &self.complexity_level {
            Some(Value::Number(n)) => n
                .as_f64()
                .filter(|f| f.is_finite())
                .map_or(5, |f| f.round().clamp(1.0, 10.0) as usize),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "low" => 3,
                "high" => 8,
                _ => 5,
            },
            _ => 5,
        }
    }
}

/// Generated algorithm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmBlueprint {
    /// Problem analysis section.
    pub problem_analysis: Value,
    /// Solution architecture section.
    pub solution_architecture: Value,
    /// Ordered implementation steps.
    pub implementation_steps: Vec<String>,
    /// Optimization protocols.
    pub optimization_protocols: Vec<String>,
    /// Patent statement.
    pub patent_protection: String,
    /// Whether a license is required to use it.
    pub license_required: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> AlgorithmRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn empty_request_decodes() {
        assert_eq!(request(json!({})), AlgorithmRequest::default());
    }

    #[test]
    fn request_reads_camel_case() {
        let req = request(json!({"problemDescription": "route trucks", "domainType": "logistics"}));
        assert_eq!(req.problem_description.as_deref(), Some("route trucks"));
        assert_eq!(req.domain_type.as_deref(), Some("logistics"));
        assert!(req.complexity_level.is_none());
    }

    #[test]
    fn step_count_from_number() {
        assert_eq!(request(json!({"complexityLevel": 7})).step_count(), 7);
        assert_eq!(request(json!({"complexityLevel": 42})).step_count(), 10);
        assert_eq!(request(json!({"complexityLevel": -1})).step_count(), 1);
    }

    #[test]
    fn step_count_from_label() {
        assert_eq!(request(json!({"complexityLevel": "HIGH"})).step_count(), 8);
        assert_eq!(request(json!({"complexityLevel": "low"})).step_count(), 3);
        assert_eq!(request(json!({"complexityLevel": "cosmic"})).step_count(), 5);
        assert_eq!(request(json!({})).step_count(), 5);
    }
}
