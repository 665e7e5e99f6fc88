//! # AlmaIA Core Library
//!
//! Core logic behind the AlmaIA student well-being client: the question
//! wizard, the answer-option mapper and the grouping of past answers and
//! homework tasks. The `almaia-cli` binary exposes every operation here over
//! files and the backend API.
//!
//! ## Architecture
//!
//! - **Questions**: Linear sequencer over a fixed question list, template
//!   resolution and option-to-icon mapping
//! - **Grouping**: Answer rows grouped per question, tasks grouped per due
//!   month
//! - **Wire**: Normalization of loose backend JSON into strict records
//! - **Storage**: TOML-based configuration
//! - **API**: Async HTTP client for the backend collaborator
//!
//! ## Key Components
//!
//! - [`WizardState`]: Immutable wizard state; every answer yields a new one
//! - [`map_to_options`]: Option list with icon classes for a question
//! - [`group_answers_by_question`] / [`group_tasks_by_month`]: Display grouping
//! - [`Config`]: Application configuration management
//! - [`ApiClient`]: Backend calls

pub mod alert;
pub mod api;
pub mod error;
pub mod grouping;
pub mod locale;
pub mod questions;
pub mod session;
pub mod storage;
pub mod wire;

pub use alert::AlertRequest;
pub use api::ApiClient;
pub use error::{
    ApiError, ConfigError, CoreError, MalformedRecord, Result, TokenError, ValidationError,
    WizardError,
};
pub use grouping::{
    group_answers_by_question, group_tasks_by_month, group_tasks_by_month_in, AnsweredRecord,
    GroupedAnswer, GroupedQuestion, MonthBucket, TaskRecord,
};
pub use locale::Locale;
pub use questions::{
    map_to_options, map_to_options_with, resolve_template, resolve_template_or, AnswerOption,
    AnswerValue, IconClass, IconTable, NavigationPayload, OptionView, Progress, Question,
    TemplateTag, WizardState, WizardStep,
};
pub use session::{is_token_valid, token_expiry, StudentContext};
pub use storage::Config;
pub use wire::Normalized;
