//! Wishlist synchronization.
//!
//! The wishlist lives in the `wishlist` collection of a remote document
//! store. [`WishlistSynchronizer`] mediates every read and write of that
//! collection and keeps the in-memory snapshot the CLI renders from.
//!
//! ```no_run
//! use std::sync::Arc;
//! use wardrobe::models::ClothingItem;
//! use wardrobe::wishlist::{RemoteItemStore, WishlistSynchronizer};
//!
//! # async fn demo() {
//! let store = RemoteItemStore::new("http://localhost:8080", "token");
//! let mut wishlist = WishlistSynchronizer::new(Arc::new(store));
//! wishlist.add(&ClothingItem::new("Coat", "Staud")).await;
//! wishlist.fetch_all().await;
//! println!("{} item(s)", wishlist.items().len());
//! # }
//! ```

mod remote;
mod store;
mod synchronizer;
mod validator;

pub use remote::RemoteItemStore;
pub use store::{Document, DocumentRef, ItemStore, Record, StoreError};
pub use synchronizer::{WishlistSynchronizer, WISHLIST_COLLECTION};
pub use validator::validate_record;
