pub mod ask_controller;
pub mod chat_controller;
pub mod response_format;
pub mod settings_controller;

pub use ask_controller::AskController;
pub use chat_controller::ChatController;
pub use response_format::format_response;
pub use settings_controller::SettingsController;
