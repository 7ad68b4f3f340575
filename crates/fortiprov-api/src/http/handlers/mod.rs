//! HTTP request handlers for the API.

pub mod collection;
pub mod login;
pub mod provision;
