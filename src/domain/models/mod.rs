mod chat_message;
mod chat_response;
mod citation;
mod completion;
mod data_source;
mod settings;

pub use chat_message::*;
pub use chat_response::*;
pub use citation::*;
pub use completion::*;
pub use data_source::*;
pub use settings::*;
