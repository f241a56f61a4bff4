use clap::Args;

use wardrobe::auth::AuthClient;
use wardrobe::config::Config;

#[derive(Args)]
pub struct ProfileCommand {}

impl ProfileCommand {
    pub async fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        let Some(session) = &config.session else {
            println!("User information not available.");
            return Ok(());
        };

        let client = AuthClient::new(&config.server_url.value);
        match client.current_user(&session.token).await {
            Ok(user) => println!("{}", user),
            Err(e) => {
                tracing::warn!(error = %e, "Error loading user information");
                println!("User information not available.");
            }
        }
        Ok(())
    }
}
