use almaia_core::{
    group_answers_by_question, group_tasks_by_month_in, ApiClient, Config, StudentContext,
};
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct StudentArgs {
    /// Student id sent as `alumno_id`
    #[arg(long)]
    student_id: i64,
    /// Bearer token
    #[arg(long, env = "ALMAIA_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl StudentArgs {
    fn context(&self) -> StudentContext {
        let ctx = StudentContext::new(self.student_id);
        match &self.token {
            Some(token) => ctx.with_token(token.clone()),
            None => ctx,
        }
    }
}

#[derive(Subcommand)]
pub enum FetchAction {
    /// Fetch the wizard question list
    Questions {
        /// Bearer token
        #[arg(long, env = "ALMAIA_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Fetch a student's answers
    Answers {
        #[command(flatten)]
        student: StudentArgs,
        /// Print grouped per question instead of raw rows
        #[arg(long)]
        group: bool,
    },
    /// Fetch a student's tasks
    Tasks {
        #[command(flatten)]
        student: StudentArgs,
        /// Print grouped per due month instead of raw records
        #[arg(long)]
        group: bool,
    },
    /// Check that the backend is reachable
    Health,
}

pub fn run(action: FetchAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = ApiClient::new(&config.api)?;
    let rt = super::runtime()?;

    match action {
        FetchAction::Questions { token } => {
            let ctx = token.map(|t| StudentContext::new(0).with_token(t));
            let questions = rt.block_on(client.fetch_questions(ctx.as_ref()))?;
            super::print_json(&questions.records)?;
        }
        FetchAction::Answers { student, group } => {
            let rows = rt.block_on(client.fetch_answers(&student.context()))?;
            if group {
                super::print_json(&group_answers_by_question(&rows.records))?;
            } else {
                super::print_json(&rows.records)?;
            }
        }
        FetchAction::Tasks { student, group } => {
            let tasks = rt.block_on(client.fetch_tasks(&student.context()))?;
            if group {
                let locale = config.locale.default_locale;
                let buckets = group_tasks_by_month_in(&tasks.records, locale);
                super::print_json(&super::group::buckets_json(&buckets, locale)?)?;
            } else {
                super::print_json(&tasks.records)?;
            }
        }
        FetchAction::Health => {
            rt.block_on(client.health())?;
            println!("ok {}", client.base_url());
        }
    }
    Ok(())
}
