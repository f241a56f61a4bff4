//! Server-side modules for `wardrobe-server`.

mod db;
mod documents;
mod routes;
mod users;

pub use db::init_db;
pub use documents::SqliteItemStore;
pub use routes::{router, ApiError, AppState};
pub use users::{UserError, UserRepository};
