//! Infrastructure layer for FortiProv.
//!
//! Contains implementations of the ports defined in `fortiprov-core`: the
//! reqwest-based device JSON-RPC transport and the file-backed collection
//! store, plus the `fortiprov.toml` configuration loader.

pub mod collection;
pub mod config;
pub mod rpc;
