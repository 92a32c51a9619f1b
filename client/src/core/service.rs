//! # Service Traits
//!
//! Seams for dependency injection. The API client is built from a transport,
//! a session store and a navigator; production wires reqwest, a token file
//! and the CLI's login prompt, tests wire in-memory doubles.

use crate::core::error::Result;
use crate::services::api::request::{Envelope, RawResponse, TransportError};
use async_trait::async_trait;

/// Performs exactly one HTTP exchange. No retries, no classification.
///
/// Returning `Ok` means a response arrived, whatever its status.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, envelope: Envelope<'_>) -> std::result::Result<RawResponse, TransportError>;
}

/// Durable home of the bearer token. Absence means unauthenticated.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<String>;

    fn save(&self, token: &str) -> Result<()>;

    /// Remove the token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

/// Where the user is sent when the session ends underneath them.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}
