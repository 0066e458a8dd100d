mod azure_openai_client;
pub mod credentials;
mod mock_completion_client;

pub use azure_openai_client::*;
pub use credentials::*;
pub use mock_completion_client::*;
