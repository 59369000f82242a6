//! Session state shared between screens: the API gateway, the current-case
//! channel and the liveness probe.

pub mod channel;
pub mod gateway;
pub mod liveness;

pub use channel::{CaseChannel, CaseSubscription};
pub use gateway::SessionGateway;
pub use liveness::{DEFAULT_LIVENESS_INTERVAL, LivenessProbe, LivenessStatus, ping_alive};
