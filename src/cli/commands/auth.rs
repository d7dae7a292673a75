use clap::Subcommand;
use serde_json::json;

use crate::api::{auth, ApiClient};
use crate::cli::{utils, OutputFormat};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and print the granted access token")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Register a new account")]
    Register {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password")]
        password: String,
        #[arg(long, help = "Display name")]
        name: Option<String>,
    },

    #[command(about = "Logout and discard the local access token")]
    Logout,

    #[command(about = "Show the identity behind the current access token")]
    Whoami,
}

pub async fn handle(
    cmd: AuthCommands,
    client: &ApiClient,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { email, password } => {
            let session = auth::login(client, &email, &password).await.into_result()?;
            utils::output_success(
                output_format,
                &format!("logged in as {}", session.user.email),
                Some(json!({
                    "accessToken": session.access_token,
                    "expiresIn": session.expires_in,
                })),
            )
        }
        AuthCommands::Register {
            email,
            password,
            name,
        } => {
            let session = auth::register(client, &email, &password, name.as_deref())
                .await
                .into_result()?;
            utils::output_success(
                output_format,
                &format!("registered {}", session.user.email),
                Some(json!({
                    "accessToken": session.access_token,
                    "expiresIn": session.expires_in,
                })),
            )
        }
        AuthCommands::Logout => {
            // Local token is dropped even if the backend call fails.
            let response = auth::logout(client).await;
            let message = if response.success {
                "logged out"
            } else {
                "logged out locally (backend logout failed)"
            };
            utils::output_success(output_format, message, None)
        }
        AuthCommands::Whoami => {
            let user = auth::me(client).await.into_result()?;
            utils::output_success(
                output_format,
                &format!("authenticated as {}", user.email),
                Some(json!({ "user": user })),
            )
        }
    }
}
