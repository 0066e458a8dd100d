//! # Domain Layer
//!
//! Conversation, citation and response models, retrieval configuration and settings.
//! This layer is independent of external frameworks and infrastructure.

mod error;
pub mod models;

pub use error::*;
pub use models::*;
