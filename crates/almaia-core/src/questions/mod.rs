//! Server-driven question model for the mood journaling wizard.
//!
//! This module provides:
//! - [`Question`] / [`AnswerOption`]: the immutable question list fetched once per session
//! - [`TemplateTag`]: the closed set of screen templates a question can select
//! - [`AnswerValue`]: what the user gave for one step
//! - The sequencer ([`sequencer`]) and option mapper ([`options`])

pub mod options;
pub mod sequencer;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WizardError;

pub use options::{lookup_icon, map_to_options, map_to_options_with, IconClass, IconTable, OptionView};
pub use sequencer::{
    resolve_template, resolve_template_or, NavigationPayload, Progress, WizardState, WizardStep,
};

/// One step in the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique identifier.
    pub question_id: i64,
    /// Raw template code as sent by the backend (e.g. `mood-grid`).
    pub template_code: String,
    /// Question text.
    pub prompt_text: String,
    /// Reporting classification, unused by sequencing.
    #[serde(default)]
    pub group_tag: Option<String>,
    /// Selectable answers, in server order.
    #[serde(default)]
    pub possible_answers: Vec<AnswerOption>,
}

/// One selectable choice for a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    /// Identifier scoped to the question.
    pub option_id: i64,
    /// Display text.
    pub label: String,
}

/// Screen template selected by a question's template code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateTag {
    /// Five-face mood scale.
    MoodGrid,
    /// Grid of named emotions.
    EmotionGrid,
    /// Multi-select grid of activities.
    ActivityGrid,
    /// Free-text diary entry.
    FreeText,
    /// Plain list of choices, used when nothing else matches.
    #[default]
    GenericChoice,
}

impl TemplateTag {
    pub const ALL: [TemplateTag; 5] = [
        TemplateTag::MoodGrid,
        TemplateTag::EmotionGrid,
        TemplateTag::ActivityGrid,
        TemplateTag::FreeText,
        TemplateTag::GenericChoice,
    ];

    /// Canonical wire code.
    pub fn code(&self) -> &'static str {
        match self {
            TemplateTag::MoodGrid => "mood-grid",
            TemplateTag::EmotionGrid => "emotion-grid",
            TemplateTag::ActivityGrid => "activity-grid",
            TemplateTag::FreeText => "free-text",
            TemplateTag::GenericChoice => "generic-choice",
        }
    }

    /// Whether the step collects several option ids.
    pub fn is_multi_select(&self) -> bool {
        matches!(self, TemplateTag::ActivityGrid)
    }

    /// Whether the step collects text rather than option ids.
    pub fn is_text_entry(&self) -> bool {
        matches!(self, TemplateTag::FreeText)
    }
}

impl fmt::Display for TemplateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TemplateTag {
    type Err = WizardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        TemplateTag::ALL
            .into_iter()
            .find(|tag| tag.code() == normalized)
            .ok_or_else(|| WizardError::UnknownTemplate(s.to_string()))
    }
}

/// The payload recorded for one completed step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    /// Single choice (mood, emotion, generic grids).
    Option(i64),
    /// Multi-select choice (activity grid), in selection order.
    Options(Vec<i64>),
    /// Free-text entry.
    Text(String),
}

impl AnswerValue {
    /// Option ids carried by this answer; empty for text.
    pub fn option_ids(&self) -> Vec<i64> {
        match self {
            AnswerValue::Option(id) => vec![*id],
            AnswerValue::Options(ids) => ids.clone(),
            AnswerValue::Text(_) => Vec::new(),
        }
    }
}

/// Select `id` if absent, deselect it if present.
///
/// Mirrors the activity grid: selection order is kept.
pub fn toggle_option(selected: &mut Vec<i64>, id: i64) {
    if let Some(pos) = selected.iter().position(|s| *s == id) {
        selected.remove(pos);
    } else {
        selected.push(id);
    }
}
