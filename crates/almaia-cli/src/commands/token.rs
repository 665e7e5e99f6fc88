use almaia_core::{is_token_valid, token_expiry};
use chrono::Utc;
use clap::Subcommand;
use serde_json::json;

#[derive(Subcommand)]
pub enum TokenAction {
    /// Print whether a bearer token is still valid and when it expires
    Check {
        /// JWT to inspect
        token: String,
    },
}

pub fn run(action: TokenAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TokenAction::Check { token } => {
            let expiry = token_expiry(&token)?;
            let now = Utc::now();
            super::print_json(&json!({
                "valid": is_token_valid(Some(&token), now),
                "expiresAt": expiry.to_rfc3339(),
            }))?;
        }
    }
    Ok(())
}
