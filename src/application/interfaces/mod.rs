mod completion_client;
mod credential_provider;

pub use completion_client::*;
pub use credential_provider::*;
