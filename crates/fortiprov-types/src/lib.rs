//! Shared domain types for FortiProv.
//!
//! This crate contains the types passed between the layers of the
//! provisioning service: the stored collection and its steps, provisioning
//! requests and results, login payloads, service configuration, and the
//! error enums.
//!
//! Zero infrastructure dependencies -- only serde, serde_json, thiserror, secrecy.

pub mod collection;
pub mod config;
pub mod error;
pub mod login;
pub mod provision;
