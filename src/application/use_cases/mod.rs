mod get_chat_completion;

pub use get_chat_completion::*;
