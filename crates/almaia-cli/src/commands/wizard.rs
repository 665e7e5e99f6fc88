use std::io::BufRead;
use std::path::PathBuf;

use almaia_core::wire::normalize_questions;
use almaia_core::{
    map_to_options_with, resolve_template_or, AnswerValue, Config, IconTable, Question,
    WizardError, WizardState, WizardStep,
};
use clap::Subcommand;
use serde_json::json;

#[derive(Subcommand)]
pub enum WizardAction {
    /// Answer every question in order and print the collected answers
    Run {
        /// Question list JSON (`-` for stdin)
        #[arg(long)]
        file: PathBuf,
        /// Answer for the next step: `3`, `1,4` for multi-select, text for free-text.
        /// Read one per line from stdin when omitted.
        #[arg(long = "answer")]
        answers: Vec<String>,
    },
    /// Print the mapped options for one step
    Options {
        /// Question list JSON (`-` for stdin)
        #[arg(long)]
        file: PathBuf,
        /// Zero-based step index
        #[arg(long)]
        index: usize,
    },
    /// Show where the two icon tables disagree
    Icons,
}

fn load_questions(file: &std::path::Path) -> Result<Vec<Question>, Box<dyn std::error::Error>> {
    // Repaired and dropped records are logged by the normalizer
    Ok(normalize_questions(&super::read_json(file)?)?.records)
}

fn parse_answer(raw: &str, step: &WizardStep) -> Result<AnswerValue, Box<dyn std::error::Error>> {
    let raw = raw.trim();
    let question_id = step.question.question_id;

    if step.template.is_text_entry() {
        return Ok(AnswerValue::Text(raw.to_string()));
    }

    let parse_id = |part: &str| -> Result<i64, Box<dyn std::error::Error>> {
        let id: i64 = part
            .trim()
            .parse()
            .map_err(|_| format!("question {question_id}: '{part}' is not an option id"))?;
        if !step.options.is_empty() && !step.options.iter().any(|o| o.id == id) {
            return Err(format!("question {question_id}: option {id} is not offered").into());
        }
        Ok(id)
    };

    if step.template.is_multi_select() {
        // Repeated ids select once; order of first mention is kept
        let mut selected = Vec::new();
        for part in raw.split(',').filter(|p| !p.trim().is_empty()) {
            let id = parse_id(part)?;
            if !selected.contains(&id) {
                selected.push(id);
            }
        }
        Ok(AnswerValue::Options(selected))
    } else {
        Ok(AnswerValue::Option(parse_id(raw)?))
    }
}

fn run_wizard(
    questions: Vec<Question>,
    mut answers: impl Iterator<Item = String>,
    config: &Config,
) -> Result<WizardState, Box<dyn std::error::Error>> {
    let mut state = WizardState::new(questions)?;

    while !state.is_complete() {
        let step = state.current_step(config.wizard.fallback_template, config.wizard.icon_table)?;
        let Some(raw) = answers.next() else {
            return Err(format!(
                "wizard incomplete: {} of {} questions answered",
                step.progress.current_index, step.progress.total
            )
            .into());
        };
        state = state.advance(parse_answer(&raw, &step)?)?;
    }

    Ok(state)
}

pub fn run(action: WizardAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        WizardAction::Run { file, answers } => {
            let config = Config::load()?;
            let questions = load_questions(&file)?;

            let state = if answers.is_empty() {
                let lines = std::io::stdin()
                    .lock()
                    .lines()
                    .collect::<Result<Vec<_>, _>>()?;
                run_wizard(questions, lines.into_iter(), &config)?
            } else {
                run_wizard(questions, answers.into_iter(), &config)?
            };

            super::print_json(&json!({
                "sessionId": state.session_id(),
                "answers": state.answers(),
            }))?;
        }
        WizardAction::Options { file, index } => {
            let config = Config::load()?;
            let questions = load_questions(&file)?;
            let question = questions.get(index).ok_or(WizardError::IndexOutOfRange {
                index,
                len: questions.len(),
            })?;

            super::print_json(&json!({
                "questionId": question.question_id,
                "template": resolve_template_or(question, config.wizard.fallback_template),
                "options": map_to_options_with(question, config.wizard.icon_table),
            }))?;
        }
        WizardAction::Icons => {
            let rows: Vec<_> = IconTable::disagreements()
                .into_iter()
                .map(|(id, answers, mood_scale)| {
                    json!({
                        "optionId": id,
                        "answers": answers,
                        "moodScale": mood_scale,
                    })
                })
                .collect();
            super::print_json(&rows)?;
        }
    }
    Ok(())
}
