use clap::ValueEnum;
use std::io::{self, Write};

use wardrobe::auth::Session;
use wardrobe::config::Config;

mod auth;
mod config_cmd;
mod photos;
mod profile;
mod stores;
mod wardrobe_cmd;
mod wishlist;

pub use auth::AuthCommand;
pub use config_cmd::ConfigCommand;
pub use photos::PhotosCommand;
pub use profile::ProfileCommand;
pub use stores::StoresCommand;
pub use wardrobe_cmd::WardrobeCommand;
pub use wishlist::WishlistCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Prints `label` and reads one trimmed line from stdin. Echoes input, so
/// never use it for passwords.
pub fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Reads a secret without echoing it to the terminal.
pub fn prompt_secret(label: &str) -> io::Result<String> {
    rpassword::prompt_password(format!("{}: ", label))
}

/// Asks a yes/no question, defaulting to no.
pub fn confirm(question: &str) -> io::Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

pub fn require_session(config: &Config) -> Result<&Session, Box<dyn std::error::Error>> {
    config
        .session
        .as_ref()
        .ok_or_else(|| "Not signed in. Run 'wardrobe auth signin' first.".into())
}
