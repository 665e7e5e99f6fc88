use almaia_core::{AlertRequest, ApiClient, Config, StudentContext};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum AlertAction {
    /// Validate and send an SOS alert
    Send {
        /// Student id sent as `alumno_id`
        #[arg(long)]
        student_id: i64,
        /// Alert message
        #[arg(long)]
        message: String,
        /// Bearer token
        #[arg(long, env = "ALMAIA_TOKEN", hide_env_values = true)]
        token: Option<String>,
        /// Validate only, do not send
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run(action: AlertAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        AlertAction::Send {
            student_id,
            message,
            token,
            dry_run,
        } => {
            let config = Config::load()?;
            let alert = AlertRequest::new(student_id, &message, &config.alerts)?;

            if dry_run {
                super::print_json(&alert)?;
                return Ok(());
            }

            let mut ctx = StudentContext::new(student_id);
            if let Some(token) = token {
                ctx = ctx.with_token(token);
            }
            let client = ApiClient::new(&config.api)?;
            let reply = super::runtime()?.block_on(client.send_alert(&ctx, &alert))?;
            super::print_json(&reply)?;
        }
    }
    Ok(())
}
