//! HTTP surface modules (router, endpoints, problem documents).

/// Shared constants and header names.
pub mod constants;
/// Problem response helpers.
pub mod errors;
/// Health and metrics endpoints.
pub mod health;
/// Router construction and server host.
pub mod router;
