//! # Services Module
//!
//! External service integrations. Today that is the backend REST API only.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  queries / app (descriptors, auth context)   │
//! └──────────────────────┬───────────────────────┘
//!                        │ endpoint fns (&ApiClient)
//! ┌──────────────────────▼───────────────────────┐
//! │  ApiClient  ── retry, bearer, 401 ──┐        │
//! │                                     ▼        │
//! │                         dyn Transport        │
//! └─────────────────────────────────────┬────────┘
//!                                       │ HTTP/JSON
//!                              Backend (/api/*)
//! ```

pub mod api;
