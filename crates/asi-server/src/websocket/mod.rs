//! Real-time channel: session registry, wire messages, push dispatch and
//! the per-connection session loop.

pub mod dispatch;
pub mod messages;
pub mod registry;
pub mod session;

pub use dispatch::{DeliveryOutcome, Dispatch, PushDispatcher};
pub use registry::{RegistryError, SendError, Session, SessionRegistry, SessionState};
pub use session::{Heartbeat, run_ws_session};
