//! `AsiServer`: Axum HTTP + `WebSocket` server.

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use asi_core::platform::PlatformState;
use asi_core::producer::ResultProducer;
use axum::extract::{DefaultBodyLimit, State, WebSocketUpgrade};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use metrics::counter;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::api::{self, ClientKey};
use crate::api::errors::{CONSULTATION_FAILED, CONSULTATION_FALLBACK};
use crate::config::ServerConfig;
use crate::health::{self, HealthResponse};
use crate::limiter::RateLimiter;
use crate::metrics::WS_CONNECTIONS_REJECTED_TOTAL;
use crate::shutdown::ShutdownCoordinator;
use crate::websocket::{Heartbeat, PushDispatcher, SessionRegistry, run_ws_session};

const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Shared state accessible from Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live channel sessions.
    pub registry: Arc<SessionRegistry>,
    /// One permit per open channel socket, bounded by `max_connections`.
    pub connection_slots: Arc<Semaphore>,
    /// Per-client admission control.
    pub limiter: Arc<RateLimiter>,
    /// Channel push dispatcher.
    pub dispatcher: PushDispatcher,
    /// Result producer shared by every surface.
    pub producer: Arc<dyn ResultProducer>,
    /// Process-wide figures and counters.
    pub platform: Arc<PlatformState>,
    /// Shutdown coordinator.
    pub shutdown: Arc<ShutdownCoordinator>,
    /// When the server started.
    pub start_time: Instant,
    /// Prometheus render handle.
    pub metrics_handle: PrometheusHandle,
}

/// The ASI consultation server.
pub struct AsiServer {
    state: AppState,
}

impl AsiServer {
    /// Create a new server around a producer and platform state.
    pub fn new(
        config: ServerConfig,
        producer: Arc<dyn ResultProducer>,
        platform: Arc<PlatformState>,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        let registry = Arc::new(SessionRegistry::new(config.outbound_queue));
        let limiter = Arc::new(RateLimiter::new(config.limiter()));
        let mut dispatcher = PushDispatcher::new(
            Arc::clone(&registry),
            Arc::clone(&producer),
            Arc::clone(&platform),
            config.production_timeout(),
        );
        if config.rate_limit_channel {
            dispatcher = dispatcher.with_limiter(Arc::clone(&limiter));
        }

        Self {
            state: AppState {
                connection_slots: Arc::new(Semaphore::new(config.max_connections)),
                config: Arc::new(config),
                registry,
                limiter,
                dispatcher,
                producer,
                platform,
                shutdown: Arc::new(ShutdownCoordinator::new()),
                start_time: Instant::now(),
                metrics_handle,
            },
        }
    }

    /// Build the Axum router with all routes and layers.
    pub fn router(&self) -> Router {
        let config = &self.state.config;
        let middleware = ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::X_FRAME_OPTIONS,
                HeaderValue::from_static("SAMEORIGIN"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                header::REFERRER_POLICY,
                HeaderValue::from_static("no-referrer"),
            ))
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(config));

        Router::new()
            .route("/", get(index_handler))
            .route("/health", get(health_handler))
            .route("/metrics", get(metrics_handler))
            .route("/ws", get(ws_handler))
            .nest("/api/v1", api::routes())
            .layer(DefaultBodyLimit::max(config.body_limit_bytes))
            .layer(middleware)
            .with_state(self.state.clone())
    }

    /// Bind and serve in the background. Returns the bound address.
    ///
    /// The listener and the rate limit sweeper are tracked by the shutdown
    /// coordinator; [`ShutdownCoordinator::graceful_shutdown`] stops both.
    pub async fn listen(&self) -> std::io::Result<SocketAddr> {
        let config = &self.state.config;
        let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
        let addr = listener.local_addr()?;

        let app = self
            .router()
            .into_make_service_with_connect_info::<SocketAddr>();
        let token = self.state.shutdown.token();
        self.state.shutdown.track(tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(token.cancelled_owned())
                .await
            {
                error!(error = %e, "server error");
            }
        }));

        self.state.shutdown.track(
            Arc::clone(&self.state.limiter)
                .spawn_sweeper(config.sweep_interval(), self.state.shutdown.token()),
        );

        info!(%addr, "ASI server listening");
        Ok(addr)
    }

    /// Get the shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.state.shutdown
    }

    /// Get the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    /// Get the session registry.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.state.registry
    }

    /// Channel sockets currently holding a connection slot.
    pub fn open_connections(&self) -> usize {
        open_connections(&self.state)
    }

    /// Get the rate limiter.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.state.limiter
    }

    /// Get the platform state.
    pub fn platform(&self) -> &Arc<PlatformState> {
        &self.state.platform
    }
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    if config.allows_any_origin() {
        return cors.allow_origin(AnyOrigin);
    }
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid allowed origin");
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

fn open_connections(state: &AppState) -> usize {
    state
        .config
        .max_connections
        .saturating_sub(state.connection_slots.available_permits())
}

/// Whether a channel handshake's `Origin` passes `allowed_origins`.
///
/// Clients that send no `Origin` (non-browser clients) are accepted.
fn origin_allowed(config: &ServerConfig, origin: Option<&HeaderValue>) -> bool {
    if config.allows_any_origin() {
        return true;
    }
    let Some(origin) = origin else { return true };
    origin
        .to_str()
        .is_ok_and(|o| config.allowed_origins.iter().any(|allowed| allowed == o))
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "success": false,
            "error": CONSULTATION_FAILED,
            "fallbackRecommendation": CONSULTATION_FALLBACK,
        })),
    )
        .into_response()
}

/// GET /
async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(
        state.start_time,
        open_connections(&state),
        state.registry.count(),
        state.limiter.tracked_keys(),
    ))
}

/// GET /metrics
async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::render(&state.metrics_handle),
    )
}

/// GET /ws
async fn ws_handler(
    ws: WebSocketUpgrade,
    ClientKey(peer): ClientKey,
    headers: HeaderMap,
    State(state): State<AppState>,
) -> Response {
    if !origin_allowed(&state.config, headers.get(header::ORIGIN)) {
        counter!(WS_CONNECTIONS_REJECTED_TOTAL, "reason" => "origin").increment(1);
        debug!(%peer, origin = ?headers.get(header::ORIGIN), "origin not allowed, refusing upgrade");
        return (StatusCode::FORBIDDEN, "origin not allowed").into_response();
    }

    // The slot is held until the session ends, or released if the upgrade fails.
    let Ok(slot) = Arc::clone(&state.connection_slots).try_acquire_owned() else {
        counter!(WS_CONNECTIONS_REJECTED_TOTAL, "reason" => "capacity").increment(1);
        warn!(
            max = state.config.max_connections,
            "connection limit reached, refusing upgrade"
        );
        return (StatusCode::SERVICE_UNAVAILABLE, "connection limit reached").into_response();
    };

    let heartbeat = Heartbeat {
        interval: state.config.heartbeat_interval(),
        timeout: state.config.heartbeat_timeout(),
    };
    ws.max_message_size(state.config.max_message_size)
        .on_upgrade(move |socket| async move {
            run_ws_session(socket, peer, state.registry, state.dispatcher, heartbeat).await;
            drop(slot);
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use asi_core::errors::ProducerError;
    use asi_core::producer::FixedProducer;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::metrics::detached_handle;

    fn make_server_with(config: ServerConfig, producer: FixedProducer) -> AsiServer {
        AsiServer::new(
            config,
            Arc::new(producer),
            Arc::new(PlatformState::default()),
            detached_handle(),
        )
    }

    fn make_server() -> AsiServer {
        make_server_with(ServerConfig::default(), FixedProducer::new())
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        let body = axum::body::to_bytes(resp.into_body(), 1_000_000)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn valid_consultation() -> Value {
        json!({
            "businessQuery": "reduce churn",
            "clientContext": {"industry": "retail", "companySize": "mid"}
        })
    }

    #[test]
    fn server_with_default_config() {
        let server = make_server();
        assert_eq!(server.config().host, "127.0.0.1");
        assert_eq!(server.config().port, 0);
        assert!(!server.shutdown().is_shutting_down());
        assert_eq!(server.registry().count(), 0);
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let resp = make_server().router().oneshot(get_req("/health")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let parsed = body_json(resp).await;
        assert_eq!(parsed["status"], "ok");
        assert!(parsed.get("uptime_secs").is_some());
        assert!(parsed.get("connections").is_some());
        assert!(parsed.get("active_sessions").is_some());
    }

    #[tokio::test]
    async fn landing_page_is_html() {
        let resp = make_server().router().oneshot(get_req("/")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/html"));
    }

    #[tokio::test]
    async fn metrics_endpoint_is_text() {
        let resp = make_server().router().oneshot(get_req("/metrics")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/plain"));
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let resp = make_server()
            .router()
            .oneshot(get_req("/nonexistent"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ws_without_upgrade_headers_is_rejected() {
        let resp = make_server().router().oneshot(get_req("/ws")).await.unwrap();
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn consultation_success_shape() {
        let server = make_server_with(
            ServerConfig::default(),
            FixedProducer::new().with_value(5_000).with_certainty(150.0),
        );
        let resp = server
            .router()
            .oneshot(post_json("/api/v1/consultation", &valid_consultation()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["patentProtected"], true);
        assert_eq!(body["asiSignature"], "R³-ASI-ENTERPRISE-v1.0");
        assert!(body["timestamp"].is_string());
        assert_eq!(body["consultation"]["consultationValue"], 5_000);
        assert_eq!(body["consultation"]["certaintyLevel"], 100.0);
        assert_eq!(server.platform().snapshot().consultations_served, 1);
    }

    #[tokio::test]
    async fn consultation_missing_query_is_400() {
        let resp = make_server()
            .router()
            .oneshot(post_json(
                "/api/v1/consultation",
                &json!({"clientContext": {"industry": "retail", "companySize": "mid"}}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "MISSING_FIELD");
    }

    #[tokio::test]
    async fn consultation_bad_company_size_is_400() {
        let resp = make_server()
            .router()
            .oneshot(post_json(
                "/api/v1/consultation",
                &json!({
                    "businessQuery": "grow",
                    "clientContext": {"industry": "retail", "companySize": "galactic"}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["code"], "INVALID_FIELD");
    }

    #[tokio::test]
    async fn consultation_malformed_json_is_400() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/consultation")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let resp = make_server().router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["code"], "MALFORMED_BODY");
    }

    #[tokio::test]
    async fn consultation_producer_failure_is_500() {
        let server = make_server_with(
            ServerConfig::default(),
            FixedProducer::new().failing(ProducerError::Unavailable("boom".into())),
        );
        let resp = server
            .router()
            .oneshot(post_json("/api/v1/consultation", &valid_consultation()))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["error"], CONSULTATION_FAILED);
        assert_eq!(body["fallbackRecommendation"], CONSULTATION_FALLBACK);
        assert_eq!(server.platform().snapshot().consultations_served, 0);
    }

    #[tokio::test]
    async fn consultation_rate_limited_before_validation() {
        let server = make_server_with(
            ServerConfig {
                rate_limit_points: 2,
                ..ServerConfig::default()
            },
            FixedProducer::new(),
        );
        let router = server.router();
        for _ in 0..2 {
            let resp = router
                .clone()
                .oneshot(post_json("/api/v1/consultation", &valid_consultation()))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }

        // Even an invalid body is refused with 429 once the window is spent.
        let resp = router
            .clone()
            .oneshot(post_json("/api/v1/consultation", &json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key(header::RETRY_AFTER));
        let body = body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["retryAfterSecs"].as_u64().unwrap() >= 1);
        assert_eq!(server.platform().snapshot().consultations_served, 2);
    }

    #[tokio::test]
    async fn consultation_body_over_limit_is_413() {
        let server = make_server_with(
            ServerConfig {
                body_limit_bytes: 64,
                ..ServerConfig::default()
            },
            FixedProducer::new(),
        );
        let big = json!({"businessQuery": "x".repeat(500)});
        let resp = server
            .router()
            .oneshot(post_json("/api/v1/consultation", &big))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn status_reports_platform() {
        let resp = make_server()
            .router()
            .oneshot(get_req("/api/v1/asi-status"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["superintelligenceLevel"], 156);
        assert_eq!(body["quantumProcessors"], 10_247);
        assert_eq!(body["status"], "TRANSCENDENT_OPERATIONAL");
        assert_eq!(body["patentProtection"], "FORTRESS_LEVEL_ACTIVE");
    }

    #[tokio::test]
    async fn algorithm_generation_shape() {
        let resp = make_server()
            .router()
            .oneshot(post_json(
                "/api/v1/algorithm-generation",
                &json!({"problemDescription": "route trucks", "domainType": "logistics", "complexityLevel": 4}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["licenseRequired"], true);
        assert_eq!(body["contactInfo"], "licensing@r3-asi-enterprise.com");
        assert_eq!(
            body["algorithm"]["implementationSteps"]
                .as_array()
                .unwrap()
                .len(),
            4
        );
    }

    #[tokio::test]
    async fn algorithm_generation_without_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/api/v1/algorithm-generation")
            .body(Body::empty())
            .unwrap();
        let resp = make_server().router().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["success"], true);
    }

    #[tokio::test]
    async fn algorithm_generation_failure_is_500() {
        let server = make_server_with(
            ServerConfig::default(),
            FixedProducer::new().failing(ProducerError::Panicked),
        );
        let resp = server
            .router()
            .oneshot(post_json("/api/v1/algorithm-generation", &json!({})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(resp).await["error"],
            "Algorithm generation requires proper licensing"
        );
    }

    #[tokio::test]
    async fn cors_preflight_allows_configured_origin() {
        let server = make_server_with(
            ServerConfig {
                allowed_origins: vec!["https://app.example".into()],
                ..ServerConfig::default()
            },
            FixedProducer::new(),
        );
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/api/v1/consultation")
            .header(header::ORIGIN, "https://app.example")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let resp = server.router().oneshot(req).await.unwrap();
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example"
        );
    }

    #[tokio::test]
    async fn cors_defaults_to_any_origin() {
        let req = Request::builder()
            .uri("/api/v1/asi-status")
            .header(header::ORIGIN, "https://elsewhere.example")
            .body(Body::empty())
            .unwrap();
        let resp = make_server().router().oneshot(req).await.unwrap();
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[test]
    fn panic_response_is_generic_500() {
        let resp = panic_response(Box::new("boom"));
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn listen_binds_and_shuts_down() {
        let server = make_server();
        let addr = server.listen().await.unwrap();
        assert_ne!(addr.port(), 0);
        assert_eq!(server.shutdown().tracked(), 2);

        server
            .shutdown()
            .graceful_shutdown(Some(std::time::Duration::from_secs(5)))
            .await;
        assert!(server.shutdown().is_shutting_down());
    }

    #[tokio::test]
    async fn security_headers_on_every_response() {
        let router = make_server().router();
        for uri in ["/", "/api/v1/asi-status"] {
            let resp = router.clone().oneshot(get_req(uri)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
            let headers = resp.headers();
            assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff", "{uri}");
            assert_eq!(headers[header::X_FRAME_OPTIONS], "SAMEORIGIN", "{uri}");
            assert_eq!(headers[header::REFERRER_POLICY], "no-referrer", "{uri}");
        }
    }

    #[test]
    fn origin_allowed_permissive_by_default() {
        let config = ServerConfig::default();
        let origin = HeaderValue::from_static("https://anywhere.example");
        assert!(origin_allowed(&config, Some(&origin)));
        assert!(origin_allowed(&config, None));
    }

    #[test]
    fn origin_allowed_checks_configured_list() {
        let config = ServerConfig {
            allowed_origins: vec!["https://app.example".into()],
            ..ServerConfig::default()
        };
        let listed = HeaderValue::from_static("https://app.example");
        let other = HeaderValue::from_static("https://evil.example");
        assert!(origin_allowed(&config, Some(&listed)));
        assert!(!origin_allowed(&config, Some(&other)));
        assert!(origin_allowed(&config, None));
    }

    #[test]
    fn wildcard_origin_allows_everything() {
        let config = ServerConfig {
            allowed_origins: vec!["*".into()],
            ..ServerConfig::default()
        };
        let origin = HeaderValue::from_static("https://evil.example");
        assert!(origin_allowed(&config, Some(&origin)));
    }

    #[tokio::test]
    async fn health_reports_held_connection_slots() {
        let server = make_server();
        let slot = Arc::clone(&server.state.connection_slots)
            .try_acquire_owned()
            .unwrap();
        assert_eq!(server.open_connections(), 1);

        let parsed = body_json(server.router().oneshot(get_req("/health")).await.unwrap()).await;
        assert_eq!(parsed["connections"], 1);
        assert_eq!(parsed["active_sessions"], 0);

        drop(slot);
        assert_eq!(server.open_connections(), 0);
    }

    #[test]
    fn connection_slots_are_bounded() {
        let server = make_server_with(
            ServerConfig {
                max_connections: 2,
                ..ServerConfig::default()
            },
            FixedProducer::new(),
        );
        let slots = &server.state.connection_slots;
        let a = Arc::clone(slots).try_acquire_owned().unwrap();
        let _b = Arc::clone(slots).try_acquire_owned().unwrap();
        assert!(Arc::clone(slots).try_acquire_owned().is_err());
        assert_eq!(server.open_connections(), 2);

        drop(a);
        assert!(Arc::clone(slots).try_acquire_owned().is_ok());
    }
}
