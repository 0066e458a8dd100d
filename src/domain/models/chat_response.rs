use serde::{Deserialize, Serialize};

use super::{ChatMessage, Citation, ContentPart, Role};

/// Normalized result of one chat completion.
///
/// A successful call fills `content` (and `citations` when the answer was grounded);
/// a failed call fills only `error`. A success with no content is legal and means
/// there is nothing to show.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: Vec<ContentPart>,
    pub citations: Vec<Citation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn success(content: Vec<ContentPart>, citations: Vec<Citation>) -> Self {
        Self {
            content,
            citations,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            content: Vec::new(),
            citations: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.citations.is_empty() && self.error.is_none()
    }

    pub fn text(&self) -> String {
        self.content
            .iter()
            .map(ContentPart::as_str)
            .collect::<Vec<_>>()
            .join("")
    }

    /// Turn a successful response into the assistant message a caller appends to
    /// its conversation. Returns `None` for failures.
    pub fn to_assistant_message(&self) -> Option<ChatMessage> {
        if self.is_error() {
            return None;
        }
        let message = ChatMessage::new(Role::Assistant, self.content.clone());
        if self.citations.is_empty() {
            Some(message)
        } else {
            Some(message.with_citations(self.citations.clone()))
        }
    }

    /// Citations referenced by `[docN]` markers in the answer text, as
    /// `(N, citation)` pairs in order of first appearance. Markers pointing past the
    /// end of the citation list are ignored.
    pub fn referenced_citations(&self) -> Vec<(usize, &Citation)> {
        let mut seen = Vec::new();
        for index in doc_markers(&self.text()) {
            if index == 0 || index > self.citations.len() || seen.contains(&index) {
                continue;
            }
            seen.push(index);
        }
        seen.into_iter()
            .map(|index| (index, &self.citations[index - 1]))
            .collect()
    }
}

fn doc_markers(text: &str) -> Vec<usize> {
    const OPEN: &str = "[doc";
    let mut markers = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find(OPEN) {
        rest = &rest[start + OPEN.len()..];
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        if digits.is_empty() || !rest[digits.len()..].starts_with(']') {
            continue;
        }
        if let Ok(index) = digits.parse::<usize>() {
            markers.push(index);
        }
        rest = &rest[digits.len() + 1..];
    }
    markers
}
