//! HTTP middleware and extractors for the API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Identity is not a layer: the auth extractors resolve the trusted
//! upstream subject header to a user row per handler, so the caller's
//! context is always explicit in the handler signature.

pub mod auth;
pub mod request_id;

pub use auth::{Identity, OptionalAuth, RequireAdmin, RequireAuth};
pub use request_id::request_id_middleware;
