//! The core models for a chat held on the client.
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::openai::Role;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn new(role: Role, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// Text to show for this message. Empty assistant replies are
    /// shown as a placeholder.
    pub fn display_text(&self) -> &str {
        if self.role == Role::Assistant && self.content.is_empty() {
            "No reply"
        } else {
            &self.content
        }
    }
}

/// An ordered, append-only log of messages. Messages can't be changed
/// once they are pushed.
#[derive(Clone, Debug)]
pub struct Conversation {
    id: String,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn push(&mut self, msg: ChatMessage) {
        self.messages.push(msg)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
