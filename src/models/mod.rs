mod clothing_item;
mod place;
mod user;
mod wardrobe;

pub use clothing_item::{fields, ClothingItem};
pub use place::{Coordinate, MapRegion, Place};
pub use user::User;
pub use wardrobe::{default_wardrobe, WardrobeSection};
