use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{
    AuthCommand, ConfigCommand, PhotosCommand, ProfileCommand, StoresCommand, WardrobeCommand,
    WishlistCommand,
};
use wardrobe::config::Config;

#[derive(Parser)]
#[command(name = "wardrobe")]
#[command(version)]
#[command(about = "Keep a clothing wishlist and find inspiration", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign up, sign in and sign out
    Auth(AuthCommand),

    /// Manage the clothing wishlist
    Wishlist(WishlistCommand),

    /// Browse clothing photos
    Photos(PhotosCommand),

    /// Search for clothing stores
    Stores(StoresCommand),

    /// Show the wardrobe
    Wardrobe(WardrobeCommand),

    /// Show account information
    Profile(ProfileCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wardrobe=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Auth(cmd)) => cmd.run(&config).await?,
        Some(Commands::Wishlist(cmd)) => cmd.run(&config).await?,
        Some(Commands::Photos(cmd)) => cmd.run(&config).await?,
        Some(Commands::Stores(cmd)) => cmd.run(&config).await?,
        Some(Commands::Wardrobe(cmd)) => cmd.run()?,
        Some(Commands::Profile(cmd)) => cmd.run(&config).await?,
        Some(Commands::Config(cmd)) => cmd.run(&config)?,
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
