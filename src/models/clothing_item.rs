use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::wishlist::Record;

/// Field names used for wishlist documents in the remote store.
pub mod fields {
    pub const ITEM_NAME: &str = "itemName";
    pub const BRAND: &str = "brand";
    pub const CATEGORY: &str = "category";
    pub const COLOR: &str = "color";
    pub const SIZE: &str = "size";
    pub const PRICE: &str = "price";
    pub const LOCATION: &str = "location";
    pub const IMAGE_URL: &str = "imageURL";
}

/// One wishlist entry.
///
/// Items have no stable identifier; the wishlist addresses them by
/// `item_name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ClothingItem {
    #[serde(rename = "itemName")]
    pub item_name: String,
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub location: String,
    #[serde(rename = "imageURL", default)]
    pub image_url: String,
}

impl ClothingItem {
    pub fn new(item_name: impl Into<String>, brand: impl Into<String>) -> Self {
        Self {
            item_name: item_name.into(),
            brand: brand.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Parses a user-entered price. Anything that is not a finite,
    /// non-negative number becomes 0.
    pub fn parse_price(input: &str) -> f64 {
        match input.trim().parse::<f64>() {
            Ok(price) if price.is_finite() && price >= 0.0 => price,
            _ => 0.0,
        }
    }

    /// Flattens the item into the eight-field record stored remotely.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert(fields::ITEM_NAME.into(), Value::from(self.item_name.clone()));
        record.insert(fields::BRAND.into(), Value::from(self.brand.clone()));
        record.insert(fields::CATEGORY.into(), Value::from(self.category.clone()));
        record.insert(fields::COLOR.into(), Value::from(self.color.clone()));
        record.insert(fields::SIZE.into(), Value::from(self.size.clone()));
        record.insert(fields::PRICE.into(), Value::from(self.price));
        record.insert(fields::LOCATION.into(), Value::from(self.location.clone()));
        record.insert(fields::IMAGE_URL.into(), Value::from(self.image_url.clone()));
        record
    }
}

impl fmt::Display for ClothingItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.item_name)?;
        writeln!(f, "{}", "=".repeat(self.item_name.chars().count()))?;
        writeln!(f, "Brand: {}", self.brand)?;
        writeln!(f, "Category: {}", self.category)?;
        writeln!(f, "Color: {}", self.color)?;
        writeln!(f, "Size: {}", self.size)?;
        writeln!(f, "Price: {}", self.price)?;
        writeln!(f, "Location: {}", self.location)?;
        if !self.image_url.is_empty() {
            writeln!(f, "Image: {}", self.image_url)?;
        }
        Ok(())
    }
}
