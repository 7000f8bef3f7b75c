//! Wire format of the real-time channel.
//!
//! Every server frame is a [`ChannelEvent`] envelope:
//! `{ "type", "timestamp", "sessionId"?, "data" }`.

use asi_core::constants::CAPABILITY_STATUS;
use asi_core::ids::SessionId;
use asi_core::platform::PlatformSnapshot;
use asi_core::producer::{ANALYSIS_CONFIDENCE, ANALYSIS_PROCESSING_TIME};
use asi_core::types::{AnalysisReport, AnalysisRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Sent once after a connection is accepted.
pub const ASI_WELCOME: &str = "asiWelcome";
/// Client request for an asynchronous analysis.
pub const REQUEST_ANALYSIS: &str = "requestSuperintelligentAnalysis";
/// Successful analysis reply.
pub const SUPERINTELLIGENT_INSIGHTS: &str = "superintelligentInsights";
/// Failure notice.
pub const ASI_ERROR: &str = "asiError";

/// Greeting carried by the welcome notice.
pub const WELCOME_MESSAGE: &str = "Welcome to R³ ASI Enterprise Platform";

/// Server-to-client envelope.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelEvent<T> {
    /// Event type tag.
    #[serde(rename = "type")]
    pub event_type: &'static str,
    /// RFC 3339 emission time.
    pub timestamp: String,
    /// Target session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    /// Event payload.
    pub data: T,
}

impl<T> ChannelEvent<T> {
    /// Wrap a payload addressed to `session_id`.
    pub fn new(event_type: &'static str, session_id: &SessionId, data: T) -> Self {
        Self {
            event_type,
            timestamp: chrono::Utc::now().to_rfc3339(),
            session_id: Some(session_id.clone()),
            data,
        }
    }
}

/// Payload of `asiWelcome`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomePayload {
    /// Greeting text.
    pub message: &'static str,
    /// Session id assigned to the connection.
    pub session_id: SessionId,
    /// Current superintelligence level.
    pub superintelligence_level: u32,
    /// Capability status tag.
    pub capability_status: &'static str,
    /// Platform metrics at connect time.
    pub metrics: PlatformSnapshot,
}

impl WelcomePayload {
    /// Build the welcome for a session from the current platform snapshot.
    pub fn new(session_id: SessionId, metrics: PlatformSnapshot) -> Self {
        Self {
            message: WELCOME_MESSAGE,
            session_id,
            superintelligence_level: metrics.metrics.superintelligence_level,
            capability_status: CAPABILITY_STATUS,
            metrics,
        }
    }
}

/// Payload of `superintelligentInsights`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsPayload {
    /// The generated report.
    pub analysis: AnalysisReport,
    /// Confidence percentage.
    pub confidence_level: f64,
    /// Reported processing time.
    pub processing_time: &'static str,
    /// Estimated value as a dollar string.
    pub value_generated: String,
    /// Sequence number of the originating request.
    pub sequence: u64,
    /// Echo of the client's correlation id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl InsightsPayload {
    /// Wrap a report for the request tagged `sequence`.
    pub fn new(analysis: AnalysisReport, sequence: u64, request_id: Option<String>) -> Self {
        Self {
            value_generated: analysis.value_generated(),
            analysis,
            confidence_level: ANALYSIS_CONFIDENCE,
            processing_time: ANALYSIS_PROCESSING_TIME,
            sequence,
            request_id,
        }
    }
}

/// Payload of `asiError`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorNotice {
    /// Human readable failure.
    pub error: String,
    /// What the client can do about it.
    pub recommendation: String,
    /// Machine-readable code.
    pub code: &'static str,
    /// Sequence of the failed request, when one was allocated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u64>,
    /// Echo of the client's correlation id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorNotice {
    /// Analysis production failed.
    pub fn processing_failed(sequence: u64, request_id: Option<String>) -> Self {
        Self {
            error: "Superintelligent processing temporarily limited".into(),
            recommendation: "Upgrade to Enterprise ASI for unlimited access".into(),
            code: "PROCESSING_FAILED",
            sequence: Some(sequence),
            request_id,
        }
    }

    /// The peer exhausted its rate limit window.
    pub fn rate_limited(retry_after_secs: u64, sequence: u64, request_id: Option<String>) -> Self {
        Self {
            error: "Too many analysis requests".into(),
            recommendation: format!("Retry in {retry_after_secs} seconds"),
            code: "RATE_LIMITED",
            sequence: Some(sequence),
            request_id,
        }
    }

    /// The inbound frame could not be understood.
    pub fn invalid_message(err: &InboundError) -> Self {
        let code = match err {
            InboundError::Malformed(_) => "INVALID_MESSAGE",
            InboundError::UnknownType(_) => "UNKNOWN_MESSAGE_TYPE",
        };
        Self {
            error: err.to_string(),
            recommendation: format!(
                "Send {{\"type\":\"{REQUEST_ANALYSIS}\",\"data\":{{\"businessData\":...}}}}"
            ),
            code,
            sequence: None,
            request_id: None,
        }
    }
}

/// Decoded client frame.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientMessage {
    /// `requestSuperintelligentAnalysis`.
    RequestAnalysis(AnalysisRequest),
}

/// Why an inbound frame was refused.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InboundError {
    /// Not a JSON object with a string `type`.
    #[error("malformed message: {0}")]
    Malformed(String),
    /// Well-formed but of a type the server does not handle.
    #[error("unknown message type '{0}'")]
    UnknownType(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawClientMessage {
    #[serde(rename = "type")]
    message_type: String,
    #[serde(default)]
    request_id: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Decode a client text frame.
///
/// `requestId` may sit at the top level or inside `data`; the top level wins.
pub fn parse_client_message(text: &str) -> Result<ClientMessage, InboundError> {
    let raw: RawClientMessage =
        serde_json::from_str(text).map_err(|e| InboundError::Malformed(e.to_string()))?;

    match raw.message_type.as_str() {
        REQUEST_ANALYSIS => {
            let mut request = match raw.data {
                Value::Null => AnalysisRequest::default(),
                data @ Value::Object(_) => serde_json::from_value::<AnalysisRequest>(data)
                    .map_err(|e| InboundError::Malformed(e.to_string()))?,
                _ => {
                    return Err(InboundError::Malformed(
                        "'data' must be an object".into(),
                    ));
                }
            };
            if raw.request_id.is_some() {
                request.request_id = raw.request_id;
            }
            Ok(ClientMessage::RequestAnalysis(request))
        }
        other => Err(InboundError::UnknownType(other.to_owned())),
    }
}
