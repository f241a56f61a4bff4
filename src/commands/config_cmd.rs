use clap::{Args, Subcommand};

use super::OutputFormat;
use wardrobe::config::Config;

#[derive(Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("server_url: {}", config.server_url.value);
                        println!("  source: {}", config.server_url.source);
                        println!();

                        println!("photos:");
                        println!("  base_url: {}", config.photos.base_url);
                        println!("  query: {}", config.photos.query);
                        println!("  per_page: {}", config.photos.per_page);
                        let key = if config.photos.access_key.is_some() {
                            "set"
                        } else {
                            "not set"
                        };
                        println!("  access_key: {}", key);
                        println!();

                        println!("places:");
                        println!("  base_url: {}", config.places.base_url);
                        println!("  limit: {}", config.places.limit);
                        println!();

                        match &config.session {
                            Some(session) if !session.email.is_empty() => {
                                println!("session: signed in as {}", session.email)
                            }
                            Some(_) => println!("session: token set"),
                            None => println!("session: signed out"),
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
