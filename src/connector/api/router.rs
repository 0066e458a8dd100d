use anyhow::Result;
use tokio::io::BufReader;

use crate::Commands;

use super::container::Container;
use super::controller::{AskController, ChatController, SettingsController};

pub struct Router<'a> {
    ask_controller: AskController<'a>,
    chat_controller: ChatController<'a>,
    settings_controller: SettingsController<'a>,
}

impl<'a> Router<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self {
            ask_controller: AskController::new(container),
            chat_controller: ChatController::new(container),
            settings_controller: SettingsController::new(container),
        }
    }

    pub async fn route(&self, command: Commands) -> Result<String> {
        match command {
            Commands::Ask { question, json } => self.ask_controller.ask(question, json).await,
            Commands::Chat => {
                let input = BufReader::new(tokio::io::stdin());
                let answered = self.chat_controller.run(input, tokio::io::stdout()).await?;
                Ok(format!("Answered {answered} questions."))
            }
            Commands::Settings => self.settings_controller.show().await,
        }
    }
}
