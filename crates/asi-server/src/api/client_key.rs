//! Rate limit key extraction.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

/// Key used when the peer address is not available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// The caller's network origin, used as the rate limit key.
///
/// Falls back to [`UNKNOWN_CLIENT`] when the router was not served with
/// connect info (e.g. in-process router tests), so all such callers share
/// one window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientKey(pub String);

impl ClientKey {
    /// Key for an optional peer address.
    pub fn from_addr(addr: Option<SocketAddr>) -> Self {
        Self(addr.map_or_else(|| UNKNOWN_CLIENT.to_owned(), |a| a.ip().to_string()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientKey {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let addr = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self::from_addr(addr))
    }
}
