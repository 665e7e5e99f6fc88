use std::path::PathBuf;

use almaia_core::wire::{normalize_answers, normalize_tasks};
use almaia_core::{group_answers_by_question, group_tasks_by_month_in, Config, Locale, MonthBucket};
use clap::Subcommand;
use serde_json::{json, Value};

#[derive(Subcommand)]
pub enum GroupAction {
    /// Group answered-question rows per question
    Answers {
        /// Answer rows JSON (`-` for stdin)
        #[arg(long)]
        file: PathBuf,
    },
    /// Group tasks per due month
    Tasks {
        /// Task list JSON (`-` for stdin)
        #[arg(long)]
        file: PathBuf,
        /// Month-name locale (defaults to locale.default_locale)
        #[arg(long)]
        locale: Option<Locale>,
    },
}

/// Buckets as JSON, with a rendered due date on every task.
pub fn buckets_json(buckets: &[MonthBucket], locale: Locale) -> Result<Value, serde_json::Error> {
    let mut out = Vec::with_capacity(buckets.len());
    for bucket in buckets {
        let mut value = serde_json::to_value(bucket)?;
        let items: Vec<Value> = bucket
            .items
            .iter()
            .map(|task| -> Result<Value, serde_json::Error> {
                let mut item = serde_json::to_value(task)?;
                item["dueDisplay"] = json!(task.due_display(locale));
                Ok(item)
            })
            .collect::<Result<_, _>>()?;
        value["items"] = Value::Array(items);
        value["nextItemId"] = json!(bucket.next_item_id());
        out.push(value);
    }
    Ok(Value::Array(out))
}

pub fn run(action: GroupAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        GroupAction::Answers { file } => {
            let rows = normalize_answers(&super::read_json(&file)?)?;
            super::print_json(&group_answers_by_question(&rows.records))?;
        }
        GroupAction::Tasks { file, locale } => {
            let locale = match locale {
                Some(locale) => locale,
                None => Config::load()?.locale.default_locale,
            };
            let tasks = normalize_tasks(&super::read_json(&file)?)?;
            let buckets = group_tasks_by_month_in(&tasks.records, locale);
            super::print_json(&buckets_json(&buckets, locale)?)?;
        }
    }
    Ok(())
}
