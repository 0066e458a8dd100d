//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Completion clients (Azure OpenAI on your data, offline mock)
//! - Credential providers (environment, managed identity, chain)
//! - Settings loading
//! - CLI wiring (container, router, controllers)

pub mod adapter;
pub mod api;
pub mod config;

pub use adapter::*;
pub use config::*;
