//! Talking to the analytics backend.
//!
//! Requests go through a [`Gateway`], which maps the fixed API path prefix onto
//! whatever backend host is configured. [`AnalyticsBackend`] is the seam the
//! request orchestration depends on; [`HttpAnalyticsBackend`] is the real one.

mod client;
mod error;
pub mod gateway;

pub use client::{AnalyticsBackend, HttpAnalyticsBackend};
pub use error::FetchError;
pub use gateway::{Gateway, GatewayError};
