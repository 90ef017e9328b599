use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A price field exactly as the search backend sent it.
///
/// The backend is inconsistent: some rows carry `"299.00"`, others `299`.
/// Neither form is parsed; the value is copied so that downstream prompts
/// see the upstream formatting unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(serde_json::Number),
    Text(String),
}

impl PriceValue {
    /// Returns `true` for the empty-string placeholder used when the upstream
    /// row had no value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, PriceValue::Text(s) if s.is_empty())
    }
}

impl Default for PriceValue {
    fn default() -> Self {
        PriceValue::Text(String::new())
    }
}

impl fmt::Display for PriceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceValue::Number(n) => write!(f, "{n}"),
            PriceValue::Text(s) => f.write_str(s),
        }
    }
}

/// AI-derived classification tags attached to a product by the tag service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiTags {
    pub main_category: String,
    pub main_category_ai: String,
    pub white_list: String,
    pub white_list_ai: String,
}

/// A catalog product, normalized from one search row.
///
/// Serialized field names follow the JSON layout the article generators read
/// (`spu`, `image`, `search_keyword`, ...), not the Rust field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    /// Upstream SPU (or product id fallback). Dedup key within a batch.
    #[serde(rename = "spu")]
    pub identity: String,
    pub name: String,
    pub price: PriceValue,
    #[serde(rename = "discountPrice")]
    pub discount_price: PriceValue,
    #[serde(rename = "image")]
    pub image_url: String,
    pub description: String,
    pub material: String,
    pub color: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    /// `1` when the backend flags the product as a new arrival, else `0`.
    #[serde(rename = "isNew")]
    pub is_new: u8,
    /// Opaque date text, e.g. `"2026-02-14"`.
    #[serde(rename = "releaseDate")]
    pub release_date: String,
    #[serde(rename = "mainCategory")]
    pub main_category: String,
    /// Keyword whose search first produced this product. Diagnostic only.
    #[serde(rename = "search_keyword")]
    pub source_keyword: String,
    #[serde(rename = "ai_tags", default, skip_serializing_if = "Option::is_none")]
    pub ai_tags: Option<AiTags>,
}

impl Product {
    #[must_use]
    pub fn is_new_arrival(&self) -> bool {
        self.is_new == 1
    }
}

/// One complete acquisition run output.
///
/// Built only through [`Batch::new`], which keeps `count` equal to
/// `products.len()`. Deserialization recomputes `count` from the product list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredBatch")]
pub struct Batch {
    #[serde(rename = "fetchedAt")]
    captured_at: DateTime<Utc>,
    #[serde(rename = "total_count")]
    count: usize,
    products: Vec<Product>,
}

impl Batch {
    #[must_use]
    pub fn new(captured_at: DateTime<Utc>, products: Vec<Product>) -> Self {
        Self {
            captured_at,
            count: products.len(),
            products,
        }
    }

    #[must_use]
    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

#[derive(Deserialize)]
struct StoredBatch {
    #[serde(rename = "fetchedAt")]
    captured_at: DateTime<Utc>,
    products: Vec<Product>,
}

impl From<StoredBatch> for Batch {
    fn from(stored: StoredBatch) -> Self {
        Batch::new(stored.captured_at, stored.products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_product(identity: &str) -> Product {
        Product {
            identity: identity.to_string(),
            name: "罗纹针织开衫".to_string(),
            price: PriceValue::Text("299.00".to_string()),
            discount_price: PriceValue::default(),
            image_url: "https://static.example.com/a1.jpg".to_string(),
            categories: vec!["针织衫".to_string()],
            tags: vec!["春季".to_string(), "新款".to_string()],
            is_new: 1,
            source_keyword: "针织".to_string(),
            ..Product::default()
        }
    }

    #[test]
    fn batch_count_matches_products_len() {
        let batch = Batch::new(Utc::now(), vec![make_product("A1"), make_product("B2")]);
        assert_eq!(batch.count(), 2);
        assert_eq!(batch.count(), batch.products().len());
    }

    #[test]
    fn empty_batch_has_zero_count() {
        let batch = Batch::new(Utc::now(), Vec::new());
        assert_eq!(batch.count(), 0);
        assert!(batch.products().is_empty());
    }

    #[test]
    fn product_serializes_with_downstream_keys() {
        let json = serde_json::to_value(make_product("A1")).expect("serialization failed");
        assert_eq!(json["spu"], "A1");
        assert_eq!(json["image"], "https://static.example.com/a1.jpg");
        assert_eq!(json["search_keyword"], "针织");
        assert_eq!(json["isNew"], 1);
        assert_eq!(json["discountPrice"], "");
        assert!(
            json.get("ai_tags").is_none(),
            "absent ai_tags must be omitted, got: {json}"
        );
    }

    #[test]
    fn ai_tags_serialize_camel_case() {
        let mut product = make_product("A1");
        product.ai_tags = Some(AiTags {
            main_category: "外套".to_string(),
            main_category_ai: "针织外套".to_string(),
            white_list: "通勤".to_string(),
            white_list_ai: String::new(),
        });
        let json = serde_json::to_value(&product).expect("serialization failed");
        assert_eq!(json["ai_tags"]["mainCategoryAi"], "针织外套");
        assert_eq!(json["ai_tags"]["whiteList"], "通勤");
    }

    #[test]
    fn batch_serializes_with_fetched_at_and_total_count() {
        let batch = Batch::new(Utc::now(), vec![make_product("A1")]);
        let json = serde_json::to_value(&batch).expect("serialization failed");
        assert_eq!(json["total_count"], 1);
        assert!(json["fetchedAt"].is_string());
        assert_eq!(json["products"][0]["spu"], "A1");
    }

    #[test]
    fn deserialized_batch_recomputes_count() {
        let json = serde_json::json!({
            "fetchedAt": "2026-03-01T08:00:00Z",
            "total_count": 7,
            "products": [{
                "spu": "A1", "name": "", "price": "", "discountPrice": "", "image": "",
                "description": "", "material": "", "color": "", "categories": [],
                "tags": [], "isNew": 0, "releaseDate": "", "mainCategory": "",
                "search_keyword": "外套"
            }]
        });
        let batch: Batch = serde_json::from_value(json).expect("deserialization failed");
        assert_eq!(batch.count(), 1);
    }

    #[test]
    fn price_value_keeps_numeric_and_text_forms() {
        let numeric: PriceValue = serde_json::from_str("299").expect("numeric price");
        let text: PriceValue = serde_json::from_str("\"299.00\"").expect("text price");
        assert_eq!(numeric.to_string(), "299");
        assert_eq!(text.to_string(), "299.00");
        assert!(PriceValue::default().is_empty());
        assert!(!text.is_empty());
    }
}
