//! Intent classification for dialogue replies
//!
//! Quick replies are matched exactly against the options the assistant just
//! offered. Anything else falls back to case-insensitive substring triggers,
//! so free text such as "yes please" or "ok, Tell Me More" still matches.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use taxmate_config::SourceMatching;
use taxmate_core::{ConversationStep, IncomeSource};

use crate::script;

static NON_LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z]+").expect("valid regex"));

/// How a reply reached the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Typed by the user
    FreeText,
    /// A previously offered quick reply
    Option,
}

/// User intent at an intent-driven step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    LearnMore,
    Begin,
    Affirm,
    Proceed,
    ShowTaxSaving,
    StartOver,
    Decline,
    Unrecognized,
}

impl Intent {
    /// Whether the intent has a branch at the given step
    pub fn applies_to(&self, step: ConversationStep) -> bool {
        match step {
            ConversationStep::Welcome => matches!(self, Intent::LearnMore | Intent::Begin),
            ConversationStep::AddMoreIncome => matches!(self, Intent::Affirm | Intent::Proceed),
            ConversationStep::TaxSaving | ConversationStep::Idle => matches!(
                self,
                Intent::ShowTaxSaving | Intent::StartOver | Intent::Decline
            ),
            ConversationStep::IncomeSource | ConversationStep::Amount(_) => false,
        }
    }
}

/// Classify a reply at the current step
///
/// `offered` are the options of the most recent assistant message.
pub fn classify(step: ConversationStep, input: &str, kind: InputKind, offered: &[String]) -> Intent {
    if kind == InputKind::Option && offered.iter().any(|o| o == input) {
        if let Some(intent) = script::option_intent(input).filter(|i| i.applies_to(step)) {
            return intent;
        }
    }
    classify_text(step, input)
}

fn classify_text(step: ConversationStep, input: &str) -> Intent {
    let lower = input.to_lowercase();
    match step {
        ConversationStep::Welcome => {
            if lower.contains("tell me more") {
                Intent::LearnMore
            } else if lower.contains("yes") {
                Intent::Begin
            } else {
                Intent::Unrecognized
            }
        },
        ConversationStep::AddMoreIncome => {
            if lower.contains("yes") {
                Intent::Affirm
            } else {
                Intent::Proceed
            }
        },
        ConversationStep::TaxSaving | ConversationStep::Idle => {
            if lower.contains("tax-saving") {
                Intent::ShowTaxSaving
            } else if lower.contains("start over") {
                Intent::StartOver
            } else {
                Intent::Unrecognized
            }
        },
        ConversationStep::IncomeSource | ConversationStep::Amount(_) => Intent::Unrecognized,
    }
}

/// Lower-case and drop every character outside `a-z`
///
/// "Business/Profession" becomes "businessprofession".
pub fn normalize_source(input: &str) -> String {
    NON_LETTERS.replace_all(&input.to_lowercase(), "").into_owned()
}

/// Resolve an income-source reply to a source
pub fn resolve_source(input: &str, matching: SourceMatching) -> Option<IncomeSource> {
    let normalized = normalize_source(input);
    match matching {
        SourceMatching::Literal => IncomeSource::from_key(&normalized).ok(),
        SourceMatching::Canonical => IncomeSource::OFFERED.iter().copied().find(|source| {
            source.key() == normalized || normalize_source(source.option_label()) == normalized
        }),
    }
}
