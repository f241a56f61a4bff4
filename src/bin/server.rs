//! Wardrobe Server
//!
//! Hosts the authentication endpoints and the document collections the
//! `wardrobe` client syncs its wishlist against.
//!
//! # Configuration
//!
//! Environment variables:
//! - `WARDROBE_PORT`: Port to listen on (default: 8080)
//! - `WARDROBE_DATA_DIR`: Directory holding `wardrobe.db` (default: ~/.local/share/wardrobe-server)
//! - `RUST_LOG`: Log filter (default: `wardrobe_server=info,wardrobe=info,tower_http=info`)

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wardrobe::server::{init_db, router, AppState};

/// Server configuration
#[derive(Debug, Clone)]
struct Config {
    /// Port to listen on
    port: u16,
    /// Directory for the SQLite database
    data_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let port = std::env::var("WARDROBE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let data_dir = std::env::var("WARDROBE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("wardrobe-server")
            });

        Self { port, data_dir }
    }

    fn database_path(&self) -> PathBuf {
        self.data_dir.join("wardrobe.db")
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "wardrobe_server=info,wardrobe=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run(Config::from_env()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let db_path = config.database_path();
    tracing::info!("Database: {}", db_path.display());

    let pool = init_db(&db_path).await?;
    let app = router(AppState::new(pool));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
