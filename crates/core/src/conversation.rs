//! Conversation steps of the scripted filing dialogue

use serde::{Serialize, Serializer};

use crate::error::Error;
use crate::income::IncomeSource;

const AMOUNT_SUFFIX: &str = "_amount";

/// Position of the controller in the scripted dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConversationStep {
    /// Greeting shown, waiting for the user to begin
    #[default]
    Welcome,
    /// Waiting for an income source
    IncomeSource,
    /// Waiting for the amount band of a source
    Amount(IncomeSource),
    /// Asking whether there are further sources
    AddMoreIncome,
    /// Recommendation shown, tax-saving options on offer
    TaxSaving,
    /// Tax-saving options shown; only "start over" moves on
    Idle,
}

impl ConversationStep {
    /// Token form of the step ("welcome", "salary_amount", ...)
    pub fn token(&self) -> String {
        match self {
            ConversationStep::Welcome => "welcome".to_string(),
            ConversationStep::IncomeSource => "income_source".to_string(),
            ConversationStep::Amount(source) => format!("{}{}", source.key(), AMOUNT_SUFFIX),
            ConversationStep::AddMoreIncome => "add_more_income".to_string(),
            ConversationStep::TaxSaving => "tax_saving".to_string(),
            ConversationStep::Idle => "idle".to_string(),
        }
    }

    /// Source awaited by an amount step
    pub fn amount_source(&self) -> Option<IncomeSource> {
        match self {
            ConversationStep::Amount(source) => Some(*source),
            _ => None,
        }
    }

    pub fn is_amount(&self) -> bool {
        self.amount_source().is_some()
    }
}

impl std::fmt::Display for ConversationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.token())
    }
}

impl std::str::FromStr for ConversationStep {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "welcome" => Ok(ConversationStep::Welcome),
            "income_source" => Ok(ConversationStep::IncomeSource),
            "add_more_income" => Ok(ConversationStep::AddMoreIncome),
            "tax_saving" => Ok(ConversationStep::TaxSaving),
            "idle" => Ok(ConversationStep::Idle),
            other => match other.strip_suffix(AMOUNT_SUFFIX) {
                Some(key) => IncomeSource::from_key(key)
                    .map(ConversationStep::Amount)
                    .map_err(|_| Error::InvalidStep(other.to_string())),
                None => Err(Error::InvalidStep(other.to_string())),
            },
        }
    }
}

impl Serialize for ConversationStep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.token())
    }
}
