//! Tax filing dialogue agent
//!
//! Features:
//! - Scripted, step-based dialogue over a fixed set of prompts
//! - Intent classification from quick replies and free text
//! - Income record accumulation
//! - ITR form recommendation and tax-saving suggestions

pub mod controller;
pub mod intent;
pub mod recommendation;
pub mod script;

pub use controller::{DialogueController, StepTransition, TransitionReason, Turn};
pub use intent::{classify, normalize_source, resolve_source, InputKind, Intent};
pub use recommendation::{recommend, recommend_form, render_tax_saving, Recommendation};

use taxmate_config::ConfigError;
use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
