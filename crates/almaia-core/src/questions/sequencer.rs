//! Linear question sequencer.
//!
//! A [`WizardState`] is an immutable snapshot: the question list of the
//! session, the index of the step on screen and the answers collected so far.
//! [`WizardState::advance`] returns a new snapshot and never touches the old
//! one, so each screen can hold its own state and hand the next one a
//! [`NavigationPayload`].
//!
//! The sequence is forward-only. The next question is always the following
//! entry of the list; answers never change the path.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use super::options::{map_to_options_with, IconTable, OptionView};
use super::{AnswerValue, Question, TemplateTag};
use crate::error::WizardError;

/// Snapshot of one wizard session.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    session_id: String,
    questions: Arc<[Question]>,
    current_index: usize,
    answers: IndexMap<i64, AnswerValue>,
}

/// Position information for the progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub current_index: usize,
    pub total: usize,
    /// Completed share in `0.0..=1.0`; `1.0` for an empty list.
    pub fraction: f64,
}

/// Everything a screen needs when it is entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardStep {
    pub question: Question,
    pub template: TemplateTag,
    pub options: Vec<OptionView>,
    pub progress: Progress,
}

/// Parameters handed from one wizard screen to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationPayload {
    pub questions: Vec<Question>,
    pub indice: usize,
    #[serde(default)]
    pub answers: IndexMap<i64, AnswerValue>,
}

fn check_unique_ids(questions: &[Question]) -> Result<(), WizardError> {
    let mut seen = HashSet::with_capacity(questions.len());
    for q in questions {
        if !seen.insert(q.question_id) {
            return Err(WizardError::DuplicateQuestionId(q.question_id));
        }
    }
    Ok(())
}

impl WizardState {
    /// Start a session at the first question.
    ///
    /// An empty list yields a state that is already complete.
    pub fn new(questions: Vec<Question>) -> Result<Self, WizardError> {
        check_unique_ids(&questions)?;
        let state = Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            questions: questions.into(),
            current_index: 0,
            answers: IndexMap::new(),
        };
        debug!(session = %state.session_id, total = state.questions.len(), "wizard started");
        Ok(state)
    }

    /// Rebuild a state from a navigation payload.
    pub fn from_payload(payload: NavigationPayload) -> Result<Self, WizardError> {
        let NavigationPayload {
            questions,
            indice,
            answers,
        } = payload;
        check_unique_ids(&questions)?;

        if indice > questions.len() {
            return Err(WizardError::IndexOutOfRange {
                index: indice,
                len: questions.len(),
            });
        }
        if answers.len() != indice {
            return Err(WizardError::InconsistentPayload(format!(
                "{} answers recorded for index {}",
                answers.len(),
                indice
            )));
        }
        let answered_in_order = questions[..indice]
            .iter()
            .zip(answers.keys())
            .all(|(q, id)| q.question_id == *id);
        if !answered_in_order {
            return Err(WizardError::InconsistentPayload(
                "answers do not match the questions before the index".to_string(),
            ));
        }

        Ok(Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            questions: questions.into(),
            current_index: indice,
            answers,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Answers so far, keyed by question id, in answer order.
    pub fn answers(&self) -> &IndexMap<i64, AnswerValue> {
        &self.answers
    }

    pub fn into_answers(self) -> IndexMap<i64, AnswerValue> {
        self.answers
    }

    /// `true` once every question has been answered.
    pub fn is_complete(&self) -> bool {
        self.current_index >= self.questions.len()
    }

    /// The question on screen.
    ///
    /// # Errors
    ///
    /// [`WizardError::IndexOutOfRange`] when the wizard is complete; callers
    /// check [`is_complete`](Self::is_complete) first.
    pub fn current_question(&self) -> Result<&Question, WizardError> {
        self.questions
            .get(self.current_index)
            .ok_or(WizardError::IndexOutOfRange {
                index: self.current_index,
                len: self.questions.len(),
            })
    }

    /// Record the answer for the current question and move to the next one.
    pub fn advance(&self, answer: AnswerValue) -> Result<Self, WizardError> {
        let question = self.current_question()?;
        let mut answers = self.answers.clone();
        answers.insert(question.question_id, answer);

        debug!(
            session = %self.session_id,
            question_id = question.question_id,
            index = self.current_index,
            "wizard step answered"
        );

        Ok(Self {
            session_id: self.session_id.clone(),
            questions: Arc::clone(&self.questions),
            current_index: self.current_index + 1,
            answers,
        })
    }

    /// [`advance`](Self::advance) with a single chosen option id.
    pub fn choose(&self, option_id: i64) -> Result<Self, WizardError> {
        self.advance(AnswerValue::Option(option_id))
    }

    pub fn progress(&self) -> Progress {
        let total = self.questions.len();
        let fraction = if total == 0 {
            1.0
        } else {
            self.current_index.min(total) as f64 / total as f64
        };
        Progress {
            current_index: self.current_index,
            total,
            fraction,
        }
    }

    /// Resolve template and options for the question on screen.
    pub fn current_step(
        &self,
        fallback: TemplateTag,
        table: IconTable,
    ) -> Result<WizardStep, WizardError> {
        let question = self.current_question()?;
        Ok(WizardStep {
            template: resolve_template_or(question, fallback),
            options: map_to_options_with(question, table),
            question: question.clone(),
            progress: self.progress(),
        })
    }

    /// Parameters for the next screen.
    pub fn payload(&self) -> NavigationPayload {
        NavigationPayload {
            questions: self.questions.to_vec(),
            indice: self.current_index,
            answers: self.answers.clone(),
        }
    }
}

/// Look up the screen template for a question.
pub fn resolve_template(question: &Question) -> Result<TemplateTag, WizardError> {
    question.template_code.parse()
}

/// Look up the screen template, substituting `fallback` for unknown codes.
pub fn resolve_template_or(question: &Question, fallback: TemplateTag) -> TemplateTag {
    resolve_template(question).unwrap_or_else(|err| {
        warn!(question_id = question.question_id, %err, %fallback, "using fallback template");
        fallback
    })
}
