//! TutorChat - chat-completion client for the mathtutor study assistant
//!
//! Translates a conversation plus a prompt mode and optional knowledge-graph
//! context into a request against a chat-completions service, returning the
//! reply either whole or as streamed fragments.
//!
//! # Example
//!
//! ```ignore
//! use tutorchat::{ChatClient, ChatConfig, ChatRequest, Message, PromptMode};
//!
//! let client = ChatClient::new(ChatConfig::default())?;
//! let request = ChatRequest::new(vec![Message::user("What is a derivative?")])
//!     .with_mode(PromptMode::Knowledge);
//! let reply = client.complete(&request).await?;
//! ```

pub mod cli;
mod client;
pub mod config;
mod context;
mod error;
mod prompts;
mod types;

pub use client::ChatClient;
pub use config::ChatConfig;
pub use context::{CATEGORY_LABELS, KnowledgeNode, LEVEL_LABELS, build_context};
pub use error::ChatError;
pub use prompts::{CONTEXT_FOOTER, CONTEXT_HEADER, PromptMode, SystemPrompts};
pub use types::{ChatRequest, Message, Role};
