//! Non-interactive aggregation of persisted records for review screens.
//!
//! - [`answers`]: flat answer rows grouped per question
//! - [`tasks`]: homework tasks grouped per due month
//!
//! Both passes are single forward scans that keep first-seen key order.

pub mod answers;
pub mod tasks;

pub use answers::{group_answers_by_question, AnsweredRecord, GroupedAnswer, GroupedQuestion};
pub use tasks::{group_tasks_by_month, group_tasks_by_month_in, parse_due, MonthBucket, TaskRecord};
