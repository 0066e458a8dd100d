use serde::{Deserialize, Serialize};

use super::{Citation, ContentPart};

/// Retrieval annotations the service attaches to a grounded answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContext {
    pub citations: Vec<Citation>,
    /// The search intent the service derived from the conversation, if reported.
    pub intent: Option<String>,
}

impl MessageContext {
    pub fn new(citations: Vec<Citation>) -> Self {
        Self {
            citations,
            intent: None,
        }
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }
}

/// Raw result of one successful completion call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    pub content: Vec<ContentPart>,
    pub context: Option<MessageContext>,
}

impl Completion {
    pub fn new(content: Vec<ContentPart>) -> Self {
        Self {
            content,
            context: None,
        }
    }

    pub fn with_context(mut self, context: MessageContext) -> Self {
        self.context = Some(context);
        self
    }
}
