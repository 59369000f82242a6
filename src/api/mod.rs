//! AetherOne server API
//!
//! Thin HTTP layer over the server's REST endpoints: liveness, case storage
//! and plugin discovery. Everything above this module talks to the
//! [`AetherApi`] trait rather than to reqwest directly.

pub mod client;
pub mod constants;
pub mod error;
pub mod models;

pub use client::{AetherApi, AetherClient};
pub use error::ApiError;
pub use models::{Case, PluginDescriptor, PluginList};
