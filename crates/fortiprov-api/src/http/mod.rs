//! HTTP API layer for FortiProv.
//!
//! Axum-based API under `/api/` used by the browser front end: device login,
//! collection read/replace, and provisioning runs. Errors are returned as
//! `{"detail": "..."}` bodies.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;
