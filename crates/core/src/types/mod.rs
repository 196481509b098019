//! Core types for Shopdex.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod geo;
pub mod id;
pub mod status;

pub use geo::{GeoError, GeoPoint};
pub use id::*;
pub use status::*;
