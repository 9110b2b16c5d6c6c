//! Codebase chat round-trip lifecycle
//!
//! A session is an append-only list of user/assistant messages. Sending a
//! message appends the user turn optimistically, ships the whole session to
//! the conversational endpoint, and appends the single assistant reply. A
//! failed round trip keeps the user turn, records a short error, and appends
//! nothing.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use repolens_core::LensResult;

use crate::api::AnalysisService;

/// Who authored a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of the conversation, exactly the shape the wire contract uses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant<S: Into<String>>(content: S) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Append-only message list for one conversation
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Explicit user action; the only way messages ever leave the session
    fn clear(&mut self) {
        self.messages.clear();
    }
}

/// Drives one chat session against the conversational endpoint
pub struct ChatConversation {
    service: Arc<dyn AnalysisService>,
    session: ChatSession,
    last_error: Option<String>,
}

impl ChatConversation {
    pub fn new(service: Arc<dyn AnalysisService>) -> Self {
        Self {
            service,
            session: ChatSession::new(),
            last_error: None,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.session.messages()
    }

    /// Short user-facing message from the most recent failed round trip
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Send one user message and wait for the assistant reply.
    ///
    /// Empty or whitespace-only input is a no-op: nothing is appended and no
    /// request is issued. Otherwise the user message is appended before the
    /// network call, so it survives a failed round trip.
    pub async fn send(&mut self, text: &str) -> LensResult<Option<&ChatMessage>> {
        if text.trim().is_empty() {
            return Ok(None);
        }

        self.last_error = None;
        self.session.append(ChatMessage::user(text));

        match self.service.chat(self.session.messages()).await {
            Ok(reply) => {
                debug!(turns = self.session.messages().len(), "Chat round trip completed");
                self.session.append(ChatMessage::assistant(reply.response));
                Ok(self.session.messages().last())
            }
            Err(e) => {
                e.log();
                self.last_error = Some(e.user_message());
                Err(e)
            }
        }
    }

    /// Drop the whole conversation (explicit user action)
    pub fn clear(&mut self) {
        self.session.clear();
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ChatReply;
    use crate::raw::RawAnalysis;
    use async_trait::async_trait;
    use repolens_core::{ErrorContext, LensError};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StubChatService {
        calls: AtomicUsize,
        fail: bool,
    }

    impl StubChatService {
        fn replying() -> Self {
            Self { calls: AtomicUsize::new(0), fail: false }
        }

        fn failing() -> Self {
            Self { calls: AtomicUsize::new(0), fail: true }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisService for StubChatService {
        async fn analyze(&self, _github_url: &str) -> LensResult<RawAnalysis> {
            Ok(RawAnalysis::default())
        }

        async fn chat(&self, messages: &[ChatMessage]) -> LensResult<ChatReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(LensError::Network {
                    message: "connection reset".to_string(),
                    source: None,
                    context: ErrorContext::new("stub"),
                });
            }
            Ok(ChatReply {
                response: format!("echo: {}", messages.last().unwrap().content),
            })
        }

        async fn health(&self) -> LensResult<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn blank_input_is_a_no_op() {
        let service = Arc::new(StubChatService::replying());
        let mut chat = ChatConversation::new(service.clone());

        assert!(chat.send("").await.unwrap().is_none());
        assert!(chat.send("   \t\n").await.unwrap().is_none());
        assert!(chat.messages().is_empty());
        assert_eq!(service.calls(), 0);
    }

    #[tokio::test]
    async fn round_trip_appends_user_then_assistant() {
        let service = Arc::new(StubChatService::replying());
        let mut chat = ChatConversation::new(service.clone());

        let reply = chat.send("where does routing live?").await.unwrap();
        assert_eq!(
            reply.map(|m| m.content.as_str()),
            Some("echo: where does routing live?")
        );

        let messages = chat.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].content, "where does routing live?");
        assert_eq!(messages[1].role, ChatRole::Assistant);
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn failed_round_trip_keeps_user_message() {
        let service = Arc::new(StubChatService::failing());
        let mut chat = ChatConversation::new(service.clone());

        let result = chat.send("hello?").await;
        assert!(result.is_err());

        let messages = chat.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, ChatRole::User);
        assert!(chat.last_error().is_some());
    }

    #[tokio::test]
    async fn clear_empties_session_and_error() {
        let service = Arc::new(StubChatService::failing());
        let mut chat = ChatConversation::new(service);

        let _ = chat.send("hello?").await;
        chat.clear();

        assert!(chat.messages().is_empty());
        assert!(chat.last_error().is_none());
    }

    #[test]
    fn wire_roles_serialize_lowercase() {
        let message = ChatMessage::user("hi");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "user");

        let message = ChatMessage::assistant("hello");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "assistant");
    }
}
