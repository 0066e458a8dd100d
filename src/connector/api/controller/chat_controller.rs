use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::ChatMessage;

use super::super::Container;
use super::response_format::format_response;

const PROMPT: &str = "> ";
const RESET_COMMAND: &str = "/reset";
const EXIT_COMMAND: &str = "/exit";

/// Interactive conversation loop. Owns the conversation and appends each grounded
/// answer (with its citations) so follow-up questions keep their context.
pub struct ChatController<'a> {
    container: &'a Container,
}

impl<'a> ChatController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    /// Read questions line by line until EOF or `/exit`. Returns the number of
    /// questions answered.
    pub async fn run<R, W>(&self, input: R, mut output: W) -> Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let use_case = self.container.chat_use_case();
        let mut history: Vec<ChatMessage> = Vec::new();
        let mut answered = 0;
        let mut lines = input.lines();

        output
            .write_all(b"Ask a question. /reset clears the conversation, /exit quits.\n")
            .await?;

        loop {
            output.write_all(PROMPT.as_bytes()).await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let question = line.trim();

            match question {
                "" => continue,
                EXIT_COMMAND => break,
                RESET_COMMAND => {
                    history.clear();
                    output.write_all(b"Conversation cleared.\n").await?;
                    continue;
                }
                _ => {}
            }

            history.push(ChatMessage::user(question));
            let response = use_case.execute(&history).await;

            match response.to_assistant_message() {
                Some(answer) => {
                    history.push(answer);
                    answered += 1;
                }
                // Drop the unanswered question so a retry does not send it twice.
                None => {
                    history.pop();
                }
            }

            output
                .write_all(format!("{}\n\n", format_response(&response)).as_bytes())
                .await?;
        }

        output.flush().await?;
        Ok(answered)
    }
}
