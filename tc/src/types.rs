//! Chat request/response types for tutorchat
//!
//! These types model the chat-completions wire format (OpenAI-compatible)
//! used by the upstream service.

use serde::{Deserialize, Serialize};

use crate::prompts::PromptMode;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A message in the conversation
///
/// Callers supply `user`/`assistant` turns; the client prepends exactly one
/// `system` turn built from the prompt mode and optional study context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a system message
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: text.into(),
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

/// A chat request - everything needed for one completion call
///
/// Each request is independent; no conversation state is held by the client.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// User/assistant turns, oldest first
    pub messages: Vec<Message>,

    /// Which instructional template prefixes the conversation
    pub mode: PromptMode,

    /// Optional study-material block appended to the system prompt
    pub context: Option<String>,
}

impl ChatRequest {
    /// Create a request with the default (knowledge) mode and no context
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            mode: PromptMode::default(),
            context: None,
        }
    }

    /// Set the prompt mode
    pub fn with_mode(mut self, mode: PromptMode) -> Self {
        self.mode = mode;
        self
    }

    /// Attach a study-material context block
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.content, "Hello");

        let msg = Message::assistant("Hi there");
        assert_eq!(msg.role, Role::Assistant);

        let msg = Message::system("Be helpful");
        assert_eq!(msg.role, Role::System);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = Message::user("x");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "x");
    }

    #[test]
    fn test_request_defaults_to_knowledge_mode() {
        let req = ChatRequest::new(vec![Message::user("what is a derivative?")]);
        assert_eq!(req.mode, PromptMode::Knowledge);
        assert!(req.context.is_none());
    }

    #[test]
    fn test_request_builder() {
        let req = ChatRequest::new(vec![])
            .with_mode(PromptMode::Homework)
            .with_context("slope of a line");
        assert_eq!(req.mode, PromptMode::Homework);
        assert_eq!(req.context.as_deref(), Some("slope of a line"));
    }
}
