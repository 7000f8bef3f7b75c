//! # asi-server
//!
//! Axum HTTP + `WebSocket` server for the ASI consultation platform.
//!
//! - HTTP endpoints: consultation, status, algorithm generation, health, metrics, landing page
//! - Per-client fixed-window rate limiting shared by HTTP and the push channel
//! - Session registry for real-time connections, with heartbeat
//! - Push dispatcher delivering asynchronous analyses at most once
//! - Graceful shutdown via `CancellationToken`

#![deny(unsafe_code)]

pub mod api;
pub mod config;
pub mod health;
pub mod limiter;
pub mod metrics;
pub mod server;
pub mod shutdown;
pub mod websocket;
