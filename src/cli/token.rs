use anyhow::Context;
use clap::Subcommand;
use serde_json::json;
use uuid::Uuid;

use crate::auth::token::{self, TokenError};
use crate::auth::Role;
use crate::config;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Issue a signed token using the configured secret")]
    Issue {
        #[arg(help = "Subject email")]
        email: String,
        #[arg(help = "Base role (ADMIN, SUPERVISOR, PICKER, RECEIVER)")]
        role: String,
        #[arg(long, help = "Active (switched) role")]
        active_role: Option<String>,
        #[arg(long, help = "Subject user id (random if omitted)")]
        user_id: Option<Uuid>,
        #[arg(long, help = "Issue with the refresh TTL instead of the access TTL")]
        refresh: bool,
    },

    #[command(about = "Verify a token and print its claims")]
    Inspect {
        #[arg(help = "Token string")]
        token: String,
    },
}

pub fn handle(cmd: TokenCommands) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue {
            email,
            role,
            active_role,
            user_id,
            refresh,
        } => {
            let role: Role = role.parse().map_err(anyhow::Error::msg)?;
            let active_role = active_role
                .map(|s| s.parse::<Role>().map_err(anyhow::Error::msg))
                .transpose()?;

            if let Some(active) = active_role {
                if !role.may_assume(active) {
                    anyhow::bail!("role '{}' is not entitled to assume role '{}'", role, active);
                }
            }

            let user_id = user_id.unwrap_or_else(Uuid::new_v4);
            let token = if refresh {
                token::issue_refresh_token(user_id, &email, role, active_role)
            } else {
                token::issue_access_token(user_id, &email, role, active_role)
            }
            .context("failed to issue token (is JWT_SECRET set?)")?;

            println!("{}", token);
            Ok(())
        }

        TokenCommands::Inspect { token: raw } => {
            match token::verify(&raw, &config::config().security.jwt_secret) {
                Ok(claims) => {
                    println!("{}", serde_json::to_string_pretty(&claims)?);
                    Ok(())
                }
                Err(TokenError::Expired) => {
                    println!("{}", json!({ "status": "expired" }));
                    Ok(())
                }
                Err(e) => Err(anyhow::Error::new(e).context("token did not verify")),
            }
        }
    }
}
