//! Web server module for the collaborative editing host.
//!
//! This module contains the Axum router that exposes a [`NetworkServer`] over
//! HTTP.
//!
//! [`NetworkServer`]: crate::network::NetworkServer

pub mod routes;

// Re-export main server functionality
pub use routes::*;
