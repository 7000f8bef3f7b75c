//! Push dispatcher: produces channel analyses off the read loop and delivers
//! them to the requesting session if it is still connected.
//!
//! Delivery is at most once. A spawned task holds only the session id and
//! re-resolves it through the registry after production, so a session that
//! disconnected in the meantime simply loses its result.

use std::sync::Arc;
use std::time::{Duration, Instant};

use asi_core::ids::SessionId;
use asi_core::platform::PlatformState;
use asi_core::producer::{ResultProducer, run_guarded};
use asi_core::types::AnalysisRequest;
use metrics::{counter, histogram};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::limiter::{Admission, RateLimiter, retry_after_secs};
use crate::metrics::{
    ASI_ANALYSES_TOTAL, ASI_DELIVERIES_DROPPED_TOTAL, ASI_PRODUCTION_DURATION_SECONDS,
    ASI_RATE_LIMIT_REJECTIONS_TOTAL,
};

use super::messages::{
    ASI_ERROR, ASI_WELCOME, ChannelEvent, ErrorNotice, InboundError, InsightsPayload,
    SUPERINTELLIGENT_INSIGHTS, WelcomePayload,
};
use super::registry::{SendError, Session, SessionRegistry};

/// What happened to one push.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Queued for the writer task.
    Delivered,
    /// The session was gone; the payload was discarded.
    Dropped,
    /// The session's outbound queue was full; the payload was discarded.
    QueueFull,
}

/// Result of [`PushDispatcher::request_analysis`].
#[derive(Debug)]
pub enum Dispatch {
    /// Production is running; the handle resolves to the delivery outcome.
    Spawned(JoinHandle<DeliveryOutcome>),
    /// Refused by the rate limiter; an `asiError` notice was pushed instead.
    Rejected(DeliveryOutcome),
    /// No such session.
    SessionGone,
}

/// Routes produced results to channel sessions.
#[derive(Clone)]
pub struct PushDispatcher {
    registry: Arc<SessionRegistry>,
    producer: Arc<dyn ResultProducer>,
    platform: Arc<PlatformState>,
    limiter: Option<Arc<RateLimiter>>,
    production_timeout: Duration,
}

impl PushDispatcher {
    /// Create a dispatcher with no channel rate limiting.
    pub fn new(
        registry: Arc<SessionRegistry>,
        producer: Arc<dyn ResultProducer>,
        platform: Arc<PlatformState>,
        production_timeout: Duration,
    ) -> Self {
        Self {
            registry,
            producer,
            platform,
            limiter: None,
            production_timeout,
        }
    }

    /// Charge analysis requests against `limiter`, keyed by the session peer.
    #[must_use]
    pub fn with_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// Push the `asiWelcome` notice. Best effort.
    pub fn welcome(&self, session: &Session) -> DeliveryOutcome {
        let payload = WelcomePayload::new(session.id.clone(), self.platform.snapshot());
        deliver(session, &ChannelEvent::new(ASI_WELCOME, &session.id, payload))
    }

    /// Push an `asiError` for a frame that could not be decoded.
    pub fn reject_message(&self, session: &Session, err: &InboundError) -> DeliveryOutcome {
        debug!(session_id = %session.id, error = %err, "rejecting client message");
        let notice = ErrorNotice::invalid_message(err);
        deliver(session, &ChannelEvent::new(ASI_ERROR, &session.id, notice))
    }

    /// Start producing an analysis for `session_id`.
    ///
    /// Returns immediately. The request is tagged with the session's next
    /// sequence number, and the reply echoes it along with `requestId`.
    pub fn request_analysis(&self, session_id: &SessionId, request: AnalysisRequest) -> Dispatch {
        let Ok(session) = self.registry.resolve(session_id) else {
            debug!(session_id = %session_id, "analysis requested for unknown session");
            return Dispatch::SessionGone;
        };
        let sequence = session.next_sequence();

        if let Some(limiter) = &self.limiter {
            if let Admission::Rejected { retry_after } = limiter.consume(&session.peer) {
                counter!(ASI_RATE_LIMIT_REJECTIONS_TOTAL, "surface" => "channel").increment(1);
                debug!(session_id = %session_id, peer = %session.peer, sequence, "channel request rate limited");
                let notice = ErrorNotice::rate_limited(
                    retry_after_secs(retry_after),
                    sequence,
                    request.request_id,
                );
                let outcome = deliver(&session, &ChannelEvent::new(ASI_ERROR, &session.id, notice));
                return Dispatch::Rejected(outcome);
            }
        }

        let dispatcher = self.clone();
        let session_id = session_id.clone();
        Dispatch::Spawned(tokio::spawn(async move {
            dispatcher
                .produce_and_deliver(session_id, sequence, request)
                .await
        }))
    }

    async fn produce_and_deliver(
        self,
        session_id: SessionId,
        sequence: u64,
        request: AnalysisRequest,
    ) -> DeliveryOutcome {
        let started = Instant::now();
        let result = run_guarded(self.production_timeout, self.producer.analyze(&request)).await;
        histogram!(ASI_PRODUCTION_DURATION_SECONDS, "kind" => "analysis")
            .record(started.elapsed().as_secs_f64());

        if let Err(err) = &result {
            error!(
                session_id = %session_id,
                sequence,
                producer = self.producer.name(),
                error = %err,
                "analysis production failed"
            );
            counter!(ASI_ANALYSES_TOTAL, "outcome" => "failed").increment(1);
        }

        let Ok(session) = self.registry.resolve(&session_id) else {
            debug!(session_id = %session_id, sequence, "session gone, dropping analysis");
            counter!(ASI_DELIVERIES_DROPPED_TOTAL).increment(1);
            return DeliveryOutcome::Dropped;
        };

        match result {
            Ok(report) => {
                let payload = InsightsPayload::new(report, sequence, request.request_id);
                let outcome = deliver(
                    &session,
                    &ChannelEvent::new(SUPERINTELLIGENT_INSIGHTS, &session.id, payload),
                );
                if outcome == DeliveryOutcome::Delivered {
                    let _ = self.platform.record_analysis();
                    counter!(ASI_ANALYSES_TOTAL, "outcome" => "delivered").increment(1);
                }
                outcome
            }
            Err(_) => {
                let notice = ErrorNotice::processing_failed(sequence, request.request_id);
                deliver(&session, &ChannelEvent::new(ASI_ERROR, &session.id, notice))
            }
        }
    }
}

fn deliver<T: Serialize>(session: &Session, event: &ChannelEvent<T>) -> DeliveryOutcome {
    match session.send_json(event) {
        Ok(()) => DeliveryOutcome::Delivered,
        Err(SendError::Full) => {
            warn!(session_id = %session.id, event = event.event_type, "outbound queue full, dropping push");
            DeliveryOutcome::QueueFull
        }
        Err(SendError::Closed) => {
            debug!(session_id = %session.id, event = event.event_type, "session closed, dropping push");
            counter!(ASI_DELIVERIES_DROPPED_TOTAL).increment(1);
            DeliveryOutcome::Dropped
        }
        Err(SendError::Encode(e)) => {
            error!(session_id = %session.id, event = event.event_type, error = %e, "failed to encode push");
            DeliveryOutcome::Dropped
        }
    }
}
