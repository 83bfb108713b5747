//! Dialogue controller
//!
//! Owns the transcript, the income record and the current step of one
//! session. Every inbound reply appends exactly one user message and at most
//! one assistant message. Replies with no branch at the current step are
//! ignored: no transition, no assistant message.

use std::sync::Arc;

use taxmate_config::{DialogueConfig, KnowledgeBase, Settings};
use taxmate_core::{
    ConversationStep, Feedback, IncomeRecord, IncomeSource, Message, MessageId, Transcript,
};

use crate::intent::{self, InputKind, Intent};
use crate::recommendation::{self, Recommendation};
use crate::script;
use crate::AgentError;

/// Why the step changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionReason {
    /// Intent detected at an intent-driven step
    Intent(Intent),
    /// Income source chosen
    SourceSelected(IncomeSource),
    /// Amount band stored for a source
    AmountRecorded(IncomeSource),
    /// "Start over" cleared the session
    Restart,
}

/// Recorded step change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTransition {
    pub from: ConversationStep,
    pub to: ConversationStep,
    pub reason: TransitionReason,
}

/// Messages appended by one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    /// The recorded user message. A start over clears it from the transcript
    /// together with everything before it.
    pub user: MessageId,
    /// Assistant reply, if any branch matched
    pub reply: Option<MessageId>,
    /// Step after the dispatch
    pub step: ConversationStep,
}

/// Scripted filing dialogue for one session
pub struct DialogueController {
    config: DialogueConfig,
    knowledge: Arc<KnowledgeBase>,
    step: ConversationStep,
    record: IncomeRecord,
    transcript: Transcript,
    history: Vec<StepTransition>,
    last_recommendation: Option<Recommendation>,
}

impl DialogueController {
    pub fn new(config: DialogueConfig, knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            config,
            knowledge,
            step: ConversationStep::Welcome,
            record: IncomeRecord::new(),
            transcript: Transcript::new(),
            history: Vec::new(),
            last_recommendation: None,
        }
    }

    /// Build a controller from application settings
    pub fn from_settings(settings: &Settings) -> Result<Self, AgentError> {
        let knowledge = settings.knowledge_base()?;
        Ok(Self::new(settings.dialogue.clone(), knowledge))
    }

    pub fn step(&self) -> ConversationStep {
        self.step
    }

    pub fn record(&self) -> &IncomeRecord {
        &self.record
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn history(&self) -> &[StepTransition] {
        &self.history
    }

    pub fn last_recommendation(&self) -> Option<&Recommendation> {
        self.last_recommendation.as_ref()
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Feedback capability of a transcript entry
    pub fn feedback(&mut self, id: MessageId) -> Option<Feedback<'_>> {
        self.transcript.feedback(id)
    }

    /// Emit the greeting into an empty transcript
    ///
    /// Called by the presentation layer once its intro is done. Returns `None`
    /// when the conversation has already started.
    pub fn start(&mut self) -> Option<MessageId> {
        if !self.transcript.is_empty() {
            return None;
        }
        Some(self.greet())
    }

    /// Handle a typed reply
    pub fn submit(&mut self, input: &str) -> Turn {
        self.dispatch(input, InputKind::FreeText)
    }

    /// Handle a quick reply chosen from the last assistant message
    pub fn select_option(&mut self, option: &str) -> Turn {
        self.dispatch(option, InputKind::Option)
    }

    /// Drop transcript, record and history and return to the welcome step
    pub fn restart(&mut self) {
        self.transcript.clear();
        self.record.clear();
        self.history.clear();
        self.last_recommendation = None;
        self.step = ConversationStep::Welcome;
        tracing::debug!("Dialogue restarted");
    }

    fn dispatch(&mut self, input: &str, kind: InputKind) -> Turn {
        let offered: Vec<String> = self
            .transcript
            .last_assistant()
            .and_then(|m| m.options())
            .map(<[String]>::to_vec)
            .unwrap_or_default();

        let user = self.transcript.push(Message::user(input));

        let current = self.step;
        let reply = match current {
            ConversationStep::Amount(source) => Some(self.record_amount(source, input)),
            ConversationStep::IncomeSource => self.select_source(input),
            step => {
                let intent = intent::classify(step, input, kind, &offered);
                tracing::debug!(step = %step, ?intent, ?kind, "Classified reply");
                self.apply_intent(step, intent)
            },
        };

        if reply.is_none() {
            tracing::debug!(step = %self.step, input, "Ignoring unrecognized reply");
        }

        Turn {
            user,
            reply,
            step: self.step,
        }
    }

    fn apply_intent(&mut self, step: ConversationStep, intent: Intent) -> Option<MessageId> {
        match (step, intent) {
            (ConversationStep::Welcome, Intent::LearnMore) => Some(self.say(
                script::FORM_EXPLAINER.to_string(),
                script::explainer_options(),
            )),
            (ConversationStep::Welcome, Intent::Begin) => {
                self.transition(ConversationStep::IncomeSource, TransitionReason::Intent(intent));
                Some(self.say(script::PRIMARY_SOURCE.to_string(), script::source_options()))
            },
            (ConversationStep::AddMoreIncome, Intent::Affirm) => {
                self.transition(ConversationStep::IncomeSource, TransitionReason::Intent(intent));
                Some(self.say(script::OTHER_SOURCE.to_string(), script::source_options()))
            },
            (ConversationStep::AddMoreIncome, Intent::Proceed) => Some(self.recommend(intent)),
            (ConversationStep::TaxSaving | ConversationStep::Idle, Intent::ShowTaxSaving) => {
                let text = recommendation::render_tax_saving(&self.knowledge.tax_saving);
                self.transition(ConversationStep::Idle, TransitionReason::Intent(intent));
                Some(self.say(text, script::tax_saving_options()))
            },
            (ConversationStep::TaxSaving | ConversationStep::Idle, Intent::StartOver) => {
                self.restart();
                // The cleared history starts with the restart itself
                self.history.push(StepTransition {
                    from: step,
                    to: ConversationStep::Welcome,
                    reason: TransitionReason::Restart,
                });
                tracing::debug!(from = %step, "Started over");
                Some(self.greet())
            },
            _ => None,
        }
    }

    fn select_source(&mut self, input: &str) -> Option<MessageId> {
        let source = intent::resolve_source(input, self.config.source_matching)?;
        self.transition(
            ConversationStep::Amount(source),
            TransitionReason::SourceSelected(source),
        );
        Some(self.say(script::amount_prompt(source), script::amount_options()))
    }

    fn record_amount(&mut self, source: IncomeSource, band: &str) -> MessageId {
        if let Some(previous) = self.record.insert(source, band) {
            tracing::debug!(source = %source, previous = %previous, band, "Overwrote income band");
        }
        self.transition(
            ConversationStep::AddMoreIncome,
            TransitionReason::AmountRecorded(source),
        );
        self.say(script::ADD_MORE.to_string(), script::add_more_options())
    }

    fn recommend(&mut self, intent: Intent) -> MessageId {
        let rec = recommendation::recommend(&self.record, &self.knowledge.forms);
        tracing::info!(
            form = %rec.form,
            sources = self.record.len(),
            "Recommended ITR form"
        );
        let id = self.say(rec.explanation.clone(), script::recommendation_options());
        self.last_recommendation = Some(rec);
        self.transition(ConversationStep::TaxSaving, TransitionReason::Intent(intent));
        id
    }

    fn greet(&mut self) -> MessageId {
        self.say(script::GREETING.to_string(), script::greeting_options())
    }

    fn say(&mut self, text: String, options: Vec<&'static str>) -> MessageId {
        self.transcript.push(Message::assistant(text, options))
    }

    fn transition(&mut self, to: ConversationStep, reason: TransitionReason) {
        let from = self.step;
        self.step = to;
        self.history.push(StepTransition { from, to, reason });
        tracing::debug!(from = %from, to = %to, ?reason, "Step transition");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taxmate_config::SourceMatching;
    use taxmate_core::Role;

    fn controller() -> DialogueController {
        let mut c = DialogueController::new(DialogueConfig::default(), KnowledgeBase::builtin());
        c.start();
        c
    }

    fn last_text(c: &DialogueController) -> &str {
        c.transcript().last().map(|m| m.content()).unwrap_or_default()
    }

    fn last_options(c: &DialogueController) -> Vec<String> {
        c.transcript()
            .last()
            .and_then(|m| m.options())
            .map(<[String]>::to_vec)
            .unwrap_or_default()
    }

    #[test]
    fn test_start_emits_greeting_once() {
        let mut c = DialogueController::new(DialogueConfig::default(), KnowledgeBase::builtin());
        assert!(c.transcript().is_empty());

        assert!(c.start().is_some());
        assert!(c.start().is_none());
        assert_eq!(c.transcript().len(), 1);
        assert_eq!(last_text(&c), script::GREETING);
        assert_eq!(last_options(&c), vec![script::BEGIN, script::LEARN_MORE]);
        assert_eq!(c.step(), ConversationStep::Welcome);
    }

    #[test]
    fn test_tell_me_more_keeps_step() {
        let mut c = controller();
        let turn = c.select_option(script::LEARN_MORE);

        assert!(turn.reply.is_some());
        assert_eq!(turn.step, ConversationStep::Welcome);
        assert!(last_text(&c).starts_with("I can help you choose between:"));
        assert_eq!(last_options(&c), vec![script::BEGIN]);
    }

    #[test]
    fn test_begin_offers_sources() {
        let mut c = controller();
        c.submit("Yes, let's begin");

        assert_eq!(c.step(), ConversationStep::IncomeSource);
        assert_eq!(last_text(&c), script::PRIMARY_SOURCE);
        assert_eq!(last_options(&c).len(), 5);
    }

    #[test]
    fn test_unrecognized_welcome_reply_is_ignored() {
        let mut c = controller();
        let turn = c.submit("what is this?");

        assert!(turn.reply.is_none());
        assert_eq!(c.step(), ConversationStep::Welcome);
        assert_eq!(c.transcript().len(), 2);
        assert_eq!(c.transcript().last().map(|m| m.role()), Some(Role::User));
        assert!(c.history().is_empty());
    }

    #[test]
    fn test_amount_is_stored_verbatim() {
        let mut c = controller();
        c.submit("yes");
        c.select_option("Salary");
        assert_eq!(c.step(), ConversationStep::Amount(IncomeSource::Salary));

        c.submit("around 7 lakh, I think");
        assert_eq!(
            c.record().get(IncomeSource::Salary),
            Some("around 7 lakh, I think")
        );
        assert_eq!(c.step(), ConversationStep::AddMoreIncome);
    }

    #[test]
    fn test_literal_matching_ignores_unmatched_label() {
        let config = DialogueConfig {
            source_matching: SourceMatching::Literal,
            ..DialogueConfig::default()
        };
        let mut c = DialogueController::new(config, KnowledgeBase::builtin());
        c.start();
        c.submit("yes");
        let turn = c.select_option("Business/Profession");

        assert!(turn.reply.is_none());
        assert_eq!(c.step(), ConversationStep::IncomeSource);
        assert!(c.record().is_empty());
    }

    #[test]
    fn test_default_matching_accepts_label() {
        let mut c = controller();
        c.submit("yes");
        c.select_option("Business/Profession");

        assert_eq!(c.step(), ConversationStep::Amount(IncomeSource::Business));
        assert_eq!(last_text(&c), "Please enter your business income amount:");
    }

    #[test]
    fn test_history_records_transitions() {
        let mut c = controller();
        c.submit("yes");
        c.select_option("Salary");
        c.select_option("Above ₹50L");

        let reasons: Vec<_> = c.history().iter().map(|t| t.reason).collect();
        assert_eq!(
            reasons,
            vec![
                TransitionReason::Intent(Intent::Begin),
                TransitionReason::SourceSelected(IncomeSource::Salary),
                TransitionReason::AmountRecorded(IncomeSource::Salary),
            ]
        );
        assert_eq!(c.history()[1].to, ConversationStep::Amount(IncomeSource::Salary));
    }

    #[test]
    fn test_tax_saving_then_idle() {
        let mut c = controller();
        c.submit("yes");
        c.select_option("Salary");
        c.select_option("₹5L to ₹10L");
        c.select_option(script::PROCEED);
        assert_eq!(c.step(), ConversationStep::TaxSaving);

        c.select_option(script::SHOW_TAX_SAVING);
        assert_eq!(c.step(), ConversationStep::Idle);
        assert!(last_text(&c).starts_with("Here are some tax-saving investment options"));
        assert_eq!(last_options(&c), vec![script::START_OVER, script::NO_THANKS]);

        // The record survives until an explicit start over
        assert!(c.record().contains(IncomeSource::Salary));
    }

    #[test]
    fn test_no_thanks_is_ignored() {
        let mut c = controller();
        c.submit("yes");
        c.select_option("Salary");
        c.select_option("₹5L to ₹10L");
        c.select_option(script::PROCEED);

        let before = c.transcript().len();
        let turn = c.select_option(script::NO_THANKS);
        assert!(turn.reply.is_none());
        assert_eq!(c.transcript().len(), before + 1);
        assert_eq!(c.step(), ConversationStep::TaxSaving);
    }

    #[test]
    fn test_feedback_through_controller() {
        let mut c = controller();
        let greeting = c.transcript().last().map(|m| m.id()).unwrap();

        assert_eq!(c.feedback(greeting).map(Feedback::like), Some(1));
        assert_eq!(c.feedback(greeting).map(Feedback::dislike), Some(1));
        assert_eq!(c.transcript().get(greeting).map(|m| m.likes()), Some(1));
    }

    #[test]
    fn test_start_over_is_recorded_in_history() {
        let mut c = controller();
        c.submit("yes");
        c.select_option("Salary");
        c.select_option("Above ₹50L");
        c.select_option(script::PROCEED);
        c.select_option(script::SHOW_TAX_SAVING);
        assert_eq!(c.history().len(), 5);

        c.select_option(script::START_OVER);
        assert_eq!(
            c.history(),
            &[StepTransition {
                from: ConversationStep::Idle,
                to: ConversationStep::Welcome,
                reason: TransitionReason::Restart,
            }]
        );
        assert_eq!(c.step(), ConversationStep::Welcome);

        c.submit("yes");
        assert_eq!(c.history().len(), 2);
        assert_eq!(c.history()[1].reason, TransitionReason::Intent(Intent::Begin));
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut c = controller();
        c.submit("yes");
        c.select_option("Salary");
        c.select_option("Above ₹50L");

        c.restart();
        assert!(c.transcript().is_empty());
        assert!(c.record().is_empty());
        assert!(c.history().is_empty());
        assert!(c.last_recommendation().is_none());
        assert_eq!(c.step(), ConversationStep::Welcome);

        c.restart();
        assert!(c.transcript().is_empty());
        assert_eq!(c.step(), ConversationStep::Welcome);
    }
}
