//! Virtual wardrobe: a wishlist of clothing items kept in a remote document
//! store, plus photo and store search clients and the server that hosts
//! authentication and documents.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod photos;
pub mod places;
pub mod server;
pub mod wishlist;
