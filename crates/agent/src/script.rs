//! Prompt texts and quick-reply options of the filing dialogue

use taxmate_core::{IncomeSource, AMOUNT_BANDS};

use crate::intent::Intent;

pub const BEGIN: &str = "Yes, let's begin";
pub const LEARN_MORE: &str = "Tell me more about ITR forms";
pub const YES: &str = "Yes";
pub const PROCEED: &str = "No, proceed with recommendations";
pub const SHOW_TAX_SAVING: &str = "Yes, show tax-saving options";
pub const START_OVER: &str = "Yes, start over";
pub const NO_THANKS: &str = "No, thank you";

pub const GREETING: &str = "Hi! I'm Tax Mate, your friendly tax filing assistant. I'll help you \
                            choose the right ITR form and discover the best tax-saving options. \
                            Ready to get started?";

pub const FORM_EXPLAINER: &str = "I can help you choose between:\n\n\
    • ITR-1 (Sahaj): For salaried individuals with simple income sources\n\
    • ITR-2: For those with capital gains or multiple properties\n\
    • ITR-3: For business owners and professionals\n\n\
    Shall we determine which form suits you best?";

pub const PRIMARY_SOURCE: &str =
    "Great! Let's start by understanding your income sources. What's your primary source of income?";

pub const OTHER_SOURCE: &str = "What other source of income do you have?";

pub const ADD_MORE: &str = "Do you have any other sources of income?";

pub fn greeting_options() -> Vec<&'static str> {
    vec![BEGIN, LEARN_MORE]
}

pub fn explainer_options() -> Vec<&'static str> {
    vec![BEGIN]
}

/// Source labels in offered order
pub fn source_options() -> Vec<&'static str> {
    IncomeSource::OFFERED
        .iter()
        .map(IncomeSource::option_label)
        .collect()
}

pub fn amount_prompt(source: IncomeSource) -> String {
    format!("Please enter your {} amount:", source.prompt_noun())
}

pub fn amount_options() -> Vec<&'static str> {
    AMOUNT_BANDS.to_vec()
}

pub fn add_more_options() -> Vec<&'static str> {
    vec![YES, PROCEED]
}

pub fn recommendation_options() -> Vec<&'static str> {
    vec![SHOW_TAX_SAVING, NO_THANKS]
}

pub fn tax_saving_options() -> Vec<&'static str> {
    vec![START_OVER, NO_THANKS]
}

/// Intent carried by an offered quick reply
pub fn option_intent(option: &str) -> Option<Intent> {
    match option {
        BEGIN => Some(Intent::Begin),
        LEARN_MORE => Some(Intent::LearnMore),
        YES => Some(Intent::Affirm),
        PROCEED => Some(Intent::Proceed),
        SHOW_TAX_SAVING => Some(Intent::ShowTaxSaving),
        START_OVER => Some(Intent::StartOver),
        NO_THANKS => Some(Intent::Decline),
        _ => None,
    }
}
