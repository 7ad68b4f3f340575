//! Provisioning logic and port definitions for FortiProv.
//!
//! This crate defines the "ports" (transport and store traits) that the
//! infrastructure layer implements, plus the pure pieces of the provisioning
//! flow: placeholder substitution, reply classification, the sequential
//! executor, and the login exchange. It depends only on `fortiprov-types` --
//! never on `fortiprov-infra` or any HTTP/filesystem crate.

pub mod classify;
pub mod executor;
pub mod login;
pub mod store;
pub mod substitute;
pub mod transport;
