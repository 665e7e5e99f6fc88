//! Answer-to-option mapping.
//!
//! Turns a question's possible answers into the generic option list rendered
//! by every choice screen. The icon tier is picked from a fixed id lookup
//! table; two such tables exist in the product and they disagree on ids 2, 4
//! and 5 (see [`IconTable::disagreements`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Question;
use crate::error::ConfigError;

/// Five sentiment tiers used to pick a face glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconClass {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

impl IconClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconClass::VeryNegative => "very-negative",
            IconClass::Negative => "negative",
            IconClass::Neutral => "neutral",
            IconClass::Positive => "positive",
            IconClass::VeryPositive => "very-positive",
        }
    }
}

impl fmt::Display for IconClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which id-to-icon lookup table to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconTable {
    /// Table used when mapping fetched answers. Ids 1 and 5 share a tier.
    #[default]
    Answers,
    /// Table of the static five-face mood selector.
    MoodScale,
}

/// Ids covered explicitly by both tables.
const KNOWN_IDS: [i64; 5] = [1, 2, 3, 4, 5];

impl IconTable {
    /// Look up the tier for an option id. Total: unknown ids are very-positive.
    pub fn lookup(&self, option_id: i64) -> IconClass {
        match self {
            IconTable::Answers => match option_id {
                1 => IconClass::VeryNegative,
                2 => IconClass::Positive,
                3 => IconClass::Neutral,
                4 => IconClass::Negative,
                5 => IconClass::VeryNegative,
                _ => IconClass::VeryPositive,
            },
            IconTable::MoodScale => match option_id {
                1 => IconClass::VeryNegative,
                2 => IconClass::Negative,
                3 => IconClass::Neutral,
                4 => IconClass::Positive,
                5 => IconClass::VeryPositive,
                _ => IconClass::VeryPositive,
            },
        }
    }

    /// Ids on which the two tables pick different tiers, as
    /// `(id, answers_tier, mood_scale_tier)`.
    pub fn disagreements() -> Vec<(i64, IconClass, IconClass)> {
        KNOWN_IDS
            .iter()
            .filter_map(|&id| {
                let a = IconTable::Answers.lookup(id);
                let m = IconTable::MoodScale.lookup(id);
                (a != m).then_some((id, a, m))
            })
            .collect()
    }
}

impl FromStr for IconTable {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "answers" => Ok(IconTable::Answers),
            "mood-scale" => Ok(IconTable::MoodScale),
            other => Err(ConfigError::InvalidValue {
                key: "wizard.icon_table".to_string(),
                message: format!("expected 'answers' or 'mood-scale', got '{other}'"),
            }),
        }
    }
}

/// A display-ready option for a choice screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionView {
    pub id: i64,
    pub label: String,
    pub icon_class: IconClass,
}

/// Icon tier for an option id using the answers table.
pub fn lookup_icon(option_id: i64) -> IconClass {
    IconTable::Answers.lookup(option_id)
}

/// Map a question's possible answers to options, keeping server order.
pub fn map_to_options(question: &Question) -> Vec<OptionView> {
    map_to_options_with(question, IconTable::Answers)
}

/// Same as [`map_to_options`] with an explicit icon table.
pub fn map_to_options_with(question: &Question, table: IconTable) -> Vec<OptionView> {
    question
        .possible_answers
        .iter()
        .map(|answer| OptionView {
            id: answer.option_id,
            label: answer.label.clone(),
            icon_class: table.lookup(answer.option_id),
        })
        .collect()
}
