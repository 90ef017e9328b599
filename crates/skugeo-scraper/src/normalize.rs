//! Normalization from raw search rows to [`skugeo_core::Product`].

use serde_json::Value;
use skugeo_core::Product;

use crate::types::RawProduct;

/// Normalizes one decoded search row into a [`Product`].
///
/// Absent fields become empty strings, `0`, or empty lists; price fields are
/// copied without numeric parsing. The identity is `spuId`, then
/// `productId`, else empty. An empty identity is returned as-is and left
/// for the caller to reject. No tags are attached here.
///
/// Pure: the same row and keyword always produce an equal `Product`.
#[must_use]
pub fn normalize_product(raw: &RawProduct, source_keyword: &str) -> Product {
    Product {
        identity: raw.identity().to_owned(),
        name: text_or_empty(raw.product_name.as_ref()),
        price: raw.price.clone().unwrap_or_default(),
        discount_price: raw.discount_price.clone().unwrap_or_default(),
        image_url: text_or_empty(raw.main_image.as_ref()),
        description: text_or_empty(raw.description.as_ref()),
        material: text_or_empty(raw.material.as_ref()),
        color: text_or_empty(raw.color.as_ref()),
        categories: raw.categories.clone().unwrap_or_default(),
        tags: raw.tags.clone().unwrap_or_default(),
        is_new: new_arrival_flag(raw.is_new.as_ref()),
        release_date: text_or_empty(raw.release_date.as_ref()),
        main_category: text_or_empty(raw.main_category.as_ref()),
        source_keyword: source_keyword.to_owned(),
        ai_tags: None,
    }
}

fn text_or_empty(value: Option<&String>) -> String {
    value.cloned().unwrap_or_default()
}

/// Collapses the backend's new-arrival marker to `0`/`1`.
///
/// Accepts `1`/`0`, `true`/`false`, and `"1"`/`"true"`; anything else is `0`.
fn new_arrival_flag(value: Option<&Value>) -> u8 {
    let is_new = match value {
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
        _ => false,
    };
    u8::from(is_new)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
