use serde_json::Value;

use super::Record;
use crate::models::{fields, ClothingItem};

fn string_field(record: &Record, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_default()
}

/// Converts a raw store record into a wishlist item.
///
/// Missing or mistyped string fields become empty and a missing or
/// non-numeric price becomes 0. Returns `None` when `itemName` or `brand`
/// is blank; such records are dropped without logging.
pub fn validate_record(record: &Record) -> Option<ClothingItem> {
    let item_name = string_field(record, fields::ITEM_NAME);
    let brand = string_field(record, fields::BRAND);

    if item_name.trim().is_empty() || brand.trim().is_empty() {
        return None;
    }

    Some(ClothingItem {
        item_name,
        brand,
        category: string_field(record, fields::CATEGORY),
        color: string_field(record, fields::COLOR),
        size: string_field(record, fields::SIZE),
        price: record
            .get(fields::PRICE)
            .and_then(Value::as_f64)
            .unwrap_or(0.0),
        location: string_field(record, fields::LOCATION),
        image_url: string_field(record, fields::IMAGE_URL),
    })
}
