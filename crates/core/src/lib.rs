//! Core types for the tax filing assistant
//!
//! This crate provides the value types shared by the other crates:
//! - Income sources, amount bands and the income record
//! - Conversation steps
//! - Transcript messages with feedback counters
//! - Error types

pub mod conversation;
pub mod error;
pub mod income;
pub mod message;

pub use conversation::ConversationStep;
pub use error::{Error, Result};
pub use income::{IncomeRecord, IncomeSource, AMOUNT_BANDS};
pub use message::{Feedback, Message, MessageId, Role, Transcript};
