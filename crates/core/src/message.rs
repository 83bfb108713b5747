//! Transcript messages and user feedback

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Unique message identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Speaker of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single transcript entry
///
/// Content and options never change after creation. Only the feedback
/// counters move, and only through [`Feedback`].
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    id: MessageId,
    role: Role,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Vec<String>>,
    timestamp: DateTime<Utc>,
    likes: u32,
    dislikes: u32,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>, options: Option<Vec<String>>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            options,
            timestamp: Utc::now(),
            likes: 0,
            dislikes: 0,
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, None)
    }

    /// Create an assistant message offering quick replies
    pub fn assistant<I, S>(content: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        let options = if options.is_empty() { None } else { Some(options) };
        Self::new(Role::Assistant, content, options)
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Suggested replies, if any
    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn likes(&self) -> u32 {
        self.likes
    }

    pub fn dislikes(&self) -> u32 {
        self.dislikes
    }
}

/// Feedback capability for one transcript entry
pub struct Feedback<'a> {
    message: &'a mut Message,
}

impl Feedback<'_> {
    /// Increment the like counter, returning the new count
    pub fn like(self) -> u32 {
        self.message.likes = self.message.likes.saturating_add(1);
        self.message.likes
    }

    /// Increment the dislike counter, returning the new count
    pub fn dislike(self) -> u32 {
        self.message.dislikes = self.message.dislikes.saturating_add(1);
        self.message.dislikes
    }
}

/// Append-only sequence of messages
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its id
    pub fn push(&mut self, message: Message) -> MessageId {
        let id = message.id();
        self.messages.push(message);
        id
    }

    pub fn get(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id() == id)
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Most recent assistant message
    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role() == Role::Assistant)
    }

    /// Whether the most recent message carries suggested replies.
    ///
    /// Presentation layers disable free-text entry while this holds.
    pub fn awaiting_option(&self) -> bool {
        self.last().is_some_and(|m| m.options().is_some())
    }

    /// Feedback handle for a message
    pub fn feedback(&mut self, id: MessageId) -> Option<Feedback<'_>> {
        self.messages
            .iter_mut()
            .find(|m| m.id() == id)
            .map(|message| Feedback { message })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
