use clap::{Args, Subcommand};

use std::io;

use super::{prompt, prompt_secret};
use wardrobe::auth::{AuthClient, AuthError};
use wardrobe::config::{clear_session, save_session, Config};

#[derive(Args)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand)]
pub enum AuthSubcommand {
    /// Create an account and sign in
    Signup {
        /// Email address (prompted if omitted)
        #[arg(long)]
        email: Option<String>,

        /// First name (prompted if omitted)
        #[arg(long)]
        first_name: Option<String>,

        /// Last name (prompted if omitted)
        #[arg(long)]
        last_name: Option<String>,
    },

    /// Sign in with email and password
    Signin {
        /// Email address (prompted if omitted)
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign out and forget the session
    Signout,

    /// Show who is signed in
    Status,
}

/// Reads a new password twice through `read_secret` and checks that both
/// entries match.
fn read_new_password<F>(mut read_secret: F) -> Result<String, Box<dyn std::error::Error>>
where
    F: FnMut(&str) -> io::Result<String>,
{
    let password = read_secret("Password")?;
    let confirm_password = read_secret("Confirm password")?;

    if password != confirm_password {
        return Err("Passwords do not match".into());
    }
    Ok(password)
}

fn value_or_prompt(value: &Option<String>, label: &str) -> io::Result<String> {
    match value {
        Some(v) => Ok(v.trim().to_string()),
        None => prompt(label),
    }
}

impl AuthCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let client = AuthClient::new(&config.server_url.value);

        match &self.command {
            AuthSubcommand::Signup {
                email,
                first_name,
                last_name,
            } => {
                let first_name = value_or_prompt(first_name, "First name")?;
                let last_name = value_or_prompt(last_name, "Last name")?;
                let email = value_or_prompt(email, "Email")?;
                let password = read_new_password(prompt_secret)?;

                let session = match client
                    .sign_up(&first_name, &last_name, &email, &password)
                    .await
                {
                    Ok(session) => session,
                    Err(e) => {
                        tracing::error!(error = %e, "Error creating user");
                        return Err(format!("Sign up failed: {}", e).into());
                    }
                };

                save_session(&session, &config.writable_path())?;
                println!("Account created. Signed in as {}", session.email);
                Ok(())
            }

            AuthSubcommand::Signin { email } => {
                let email = value_or_prompt(email, "Email")?;
                let password = prompt_secret("Password")?;

                let session = match client.sign_in(&email, &password).await {
                    Ok(session) => session,
                    Err(e) => {
                        tracing::warn!(error = %e, "Sign in failed");
                        return Err(AuthError::InvalidCredentials.into());
                    }
                };

                save_session(&session, &config.writable_path())?;
                println!("Signed in as {}", session.email);
                Ok(())
            }

            AuthSubcommand::Signout => {
                if let Some(session) = &config.session {
                    if let Err(e) = client.sign_out(&session.token).await {
                        tracing::error!(error = %e, "Error signing out");
                        return Err(e.into());
                    }
                }
                clear_session(&config.writable_path())?;
                println!("Signed out.");
                Ok(())
            }

            AuthSubcommand::Status => {
                match &config.session {
                    Some(session) if !session.email.is_empty() => {
                        println!("Signed in as {} ({})", session.email, session.uid)
                    }
                    Some(_) => println!("Session token set from environment"),
                    None => println!("Not signed in"),
                }
                Ok(())
            }
        }
    }
}
