//! Chat transcript shown to the user.
//!
//! The transcript only ever contains the user's case submissions and the
//! Moderator's replies. Moderator replies arrive token by token, so the last
//! entry may be an *open* message that is still growing; it is closed when an
//! authoritative version of it arrives.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Who wrote a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatRole {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "Moderator")]
    Moderator,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatRole::User => f.write_str("user"),
            ChatRole::Moderator => f.write_str("Moderator"),
        }
    }
}

/// A single transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Model that produced the message; empty while streaming or for user input.
    #[serde(default)]
    pub model: String,
    /// Still receiving tokens.
    #[serde(skip)]
    open: bool,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            model: String::new(),
            open: false,
        }
    }

    /// A finalized Moderator message.
    pub fn moderator(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Moderator,
            content: content.into(),
            model: model.into(),
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

/// Ordered, append-only transcript (except for the open Moderator message).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Append the user's case text.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(ChatMessage::user(content));
    }

    /// The still-streaming Moderator message, if the last entry is one.
    fn open_moderator_mut(&mut self) -> Option<&mut ChatMessage> {
        self.messages
            .last_mut()
            .filter(|msg| msg.role == ChatRole::Moderator && msg.open)
    }

    /// Append a streamed Moderator fragment, opening a new message if needed.
    pub fn append_moderator_token(&mut self, content: &str) {
        if let Some(open) = self.open_moderator_mut() {
            open.content.push_str(content);
            return;
        }
        self.messages.push(ChatMessage {
            role: ChatRole::Moderator,
            content: content.to_string(),
            model: String::new(),
            open: true,
        });
    }

    /// Apply an authoritative Moderator message.
    ///
    /// Overwrites and closes the open message if there is one, otherwise
    /// appends a closed message.
    pub fn finalize_moderator(&mut self, content: &str, model: &str) {
        if let Some(open) = self.open_moderator_mut() {
            open.content = content.to_string();
            open.model = model.to_string();
            open.open = false;
            return;
        }
        self.messages.push(ChatMessage::moderator(content, model));
    }
}
