//! Chat-completion client
//!
//! Sends a conversation plus a prompt mode and optional study context to the
//! chat-completions endpoint, either blocking (full reply) or streaming
//! (fragments over a channel as they arrive). Each call is stateless and
//! independent; no conversation state is held between calls.

use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::config::ChatConfig;
use crate::error::ChatError;
use crate::prompts::SystemPrompts;
use crate::types::ChatRequest;

/// Chat-completion client
pub struct ChatClient {
    config: ChatConfig,
    prompts: SystemPrompts,
    http: Client,
}

impl ChatClient {
    /// Create a client from configuration
    ///
    /// Does not validate the credential; that happens per call so a missing
    /// key is a recoverable call-time error rather than a startup failure.
    pub fn new(config: ChatConfig) -> Result<Self, ChatError> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(ChatError::Network)?;

        Ok(Self {
            config,
            prompts: SystemPrompts::default(),
            http,
        })
    }

    /// The prompt template registry, for registering additional modes
    pub fn prompts_mut(&mut self) -> &mut SystemPrompts {
        &mut self.prompts
    }

    /// Build the JSON request body for the chat-completions endpoint
    fn build_request_body(&self, request: &ChatRequest) -> serde_json::Value {
        let system_prompt = self.prompts.compose(request.mode, request.context.as_deref());

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": system_prompt,
        })];
        messages.extend(request.messages.iter().map(|m| serde_json::json!(m)));

        serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        })
    }

    /// Send a completion request and return the full reply text
    ///
    /// Returns the first choice's content, or the empty string when the
    /// response carries no choices. No retries; callers decide retry policy.
    pub async fn complete(&self, request: &ChatRequest) -> Result<String, ChatError> {
        let api_key = self.config.api_key()?;
        debug!(mode = ?request.mode, message_count = request.messages.len(), "complete: called");

        let body = self.build_request_body(request);

        let response = self
            .http
            .post(&self.config.base_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(ChatError::Network)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(service_error(status, &text));
        }

        let text = response.text().await.map_err(ChatError::Network)?;
        let api_response: ChatResponse = serde_json::from_str(&text)?;
        Ok(extract_content(api_response))
    }

    /// Send a streaming completion request
    ///
    /// Text fragments are sent over `fragment_tx` in arrival order; the full
    /// accumulated reply is returned once the transport signals end-of-stream.
    /// A mid-stream transport error aborts and propagates; fragments already
    /// delivered are not retracted.
    pub async fn complete_streaming(
        &self,
        request: &ChatRequest,
        fragment_tx: mpsc::Sender<String>,
    ) -> Result<String, ChatError> {
        let api_key = self.config.api_key()?;
        debug!(mode = ?request.mode, message_count = request.messages.len(), "complete_streaming: called");

        let mut body = self.build_request_body(request);
        body["stream"] = serde_json::json!(true);

        let response = self
            .http
            .post(&self.config.base_url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(ChatError::Network)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let text = response.text().await.unwrap_or_default();
            return Err(service_error(status, &text));
        }

        let mut stream = response.bytes_stream();
        let mut lines = SseLineBuffer::default();
        let mut full_content = String::new();

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(ChatError::Network)?;
            for line in lines.push(&chunk) {
                if let Some(fragment) = parse_sse_line(&line) {
                    full_content.push_str(&fragment);
                    let _ = fragment_tx.send(fragment).await;
                }
            }
        }

        debug!(reply_len = full_content.len(), "complete_streaming: stream ended");
        Ok(full_content)
    }
}

/// Map a non-success HTTP response to a service error
///
/// Uses the service's own `error.message` when the body parses, otherwise the
/// raw body, otherwise a generic message.
fn service_error(status: u16, body: &str) -> ChatError {
    warn!(status, "chat service returned an error");
    let message = serde_json::from_str::<ServiceErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                "chat completion request failed".to_string()
            } else {
                body.trim().to_string()
            }
        });
    ChatError::Api { status, message }
}

/// First choice's content, or empty string when there are no choices
fn extract_content(response: ChatResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default()
}

/// Parse one complete SSE line into a text fragment
///
/// Blank lines, the `[DONE]` sentinel, non-data lines, and payloads that fail
/// to parse are all skipped; transport end-of-stream is the authoritative
/// termination signal, not the sentinel.
fn parse_sse_line(line: &str) -> Option<String> {
    let data = line.strip_prefix("data: ")?;
    if data == "[DONE]" {
        return None;
    }
    let event: StreamEvent = serde_json::from_str(data).ok()?;
    event
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.delta.content)
        .filter(|content| !content.is_empty())
}

/// Reassembles complete lines from network chunks
///
/// SSE lines can be split across reads at arbitrary byte boundaries,
/// including inside a multi-byte UTF-8 character. Raw bytes are buffered and
/// only complete lines are decoded, so partial trailing data is held back
/// until its newline arrives and no fragment is dropped or corrupted.
#[derive(Default)]
struct SseLineBuffer {
    buffer: Vec<u8>,
}

impl SseLineBuffer {
    /// Append a chunk and drain the complete lines it finishes
    fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(line_end) = self.buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = self.buffer.drain(..=line_end).collect();
            let line = String::from_utf8_lossy(&line_bytes[..line_end]).trim().to_string();
            if !line.is_empty() {
                lines.push(line);
            }
        }
        lines
    }
}

// Chat-completions wire types

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamEvent {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Debug, Deserialize)]
struct StreamDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    error: Option<ServiceErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorDetail {
    message: Option<String>,
}
