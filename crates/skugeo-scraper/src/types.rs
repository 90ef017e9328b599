//! Wire types for the catalog search and tag endpoints.
//!
//! ## Observed shape of the search backend
//!
//! ### Envelope
//! Success is signalled in the body, not only by the HTTP status:
//! `{"code": 200, "msg": "...", "data": {"rows": [...], "total": 42}}`.
//! A 200 response with any other `code` carries no usable rows.
//!
//! ### Rows
//! Row shape drifts between index versions. Identity lives in `spuId` on
//! current rows and in `productId` on older ones, and either may be numeric.
//! `price` arrives as `"299.00"` or `299`. `tags`/`categories` are usually
//! arrays but have been seen as comma-separated strings. Every field is
//! therefore optional here, and scalar fields accept any JSON scalar; a
//! field of an unusable shape reads as absent rather than sinking the row.
//! Only a row that is not an object fails to decode.
//!
//! Envelope fields are read the same way: a `code` that is not a JSON
//! integer (e.g. `"200"`) is treated as "not success", never as a decode
//! error.
//!
//! ### Tag endpoint
//! Uses a different envelope convention: `{"code": 0, "data": {...}}`.
//! `data` may be `null` for products the tagger has not processed yet.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use skugeo_core::{AiTags, GenderCategory, PriceValue};

/// Envelope `code` the search backend uses for success.
pub const SEARCH_SUCCESS_CODE: i64 = 200;

/// Envelope `code` the tag backend uses for success.
pub const TAG_SUCCESS_CODE: i64 = 0;

/// Request body for the search endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest<'a> {
    pub keyword: &'a str,
    pub page_size: u32,
    /// Always `1`: one page per keyword.
    pub page_num: u32,
    /// Upstream routing flag; the backend only serves this query type.
    #[serde(rename = "handletype")]
    pub handle_type: &'static str,
    pub filters: Vec<SearchFilter>,
}

impl<'a> SearchRequest<'a> {
    #[must_use]
    pub fn new(keyword: &'a str, gender: GenderCategory, page_size: u32) -> Self {
        Self {
            keyword,
            page_size,
            page_num: 1,
            handle_type: "200",
            filters: vec![SearchFilter {
                dimension_name: "gender",
                tag_names: vec![gender.upstream_code()],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    pub dimension_name: &'static str,
    pub tag_names: Vec<&'static str>,
}

/// Decoded search response.
#[derive(Debug, Default, Deserialize)]
pub struct SearchPage {
    #[serde(default, deserialize_with = "integer_code")]
    pub code: Option<i64>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub msg: Option<String>,
    #[serde(default, deserialize_with = "search_data")]
    pub data: Option<SearchData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchData {
    /// Raw rows, decoded individually so one bad row cannot sink the page.
    #[serde(default)]
    pub rows: Vec<Value>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl SearchPage {
    /// `true` when the envelope carries the success marker and a `data` object.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.code == Some(SEARCH_SUCCESS_CODE) && self.data.is_some()
    }

    /// Rows of a successful page; empty for any other envelope.
    #[must_use]
    pub fn rows(&self) -> &[Value] {
        match &self.data {
            Some(data) if self.code == Some(SEARCH_SUCCESS_CODE) => &data.rows,
            _ => &[],
        }
    }

    /// Owned variant of [`SearchPage::rows`].
    #[must_use]
    pub fn into_rows(self) -> Vec<Value> {
        match self.data {
            Some(data) if self.code == Some(SEARCH_SUCCESS_CODE) => data.rows,
            _ => Vec::new(),
        }
    }
}

/// One search row, with every field optional.
///
/// This is the only place that knows about upstream key names; the
/// normalizer reads from here and never from raw JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    #[serde(default, deserialize_with = "scalar_text")]
    pub spu_id: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub product_id: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "scalar_price")]
    pub price: Option<PriceValue>,
    #[serde(default, deserialize_with = "scalar_price")]
    pub discount_price: Option<PriceValue>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub main_image: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub material: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "text_list")]
    pub categories: Option<Vec<String>>,
    #[serde(default, deserialize_with = "text_list")]
    pub tags: Option<Vec<String>>,
    /// `0`/`1`, `true`/`false` or `"1"` depending on the index version.
    #[serde(default)]
    pub is_new: Option<Value>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    pub main_category: Option<String>,
}

impl RawProduct {
    /// Decodes one row.
    ///
    /// # Errors
    ///
    /// Returns the serde error when the row is not a JSON object.
    pub fn from_row(row: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(row)
    }

    /// Product identity: `spuId`, then `productId`, else the empty string.
    ///
    /// Blank values count as absent.
    #[must_use]
    pub fn identity(&self) -> &str {
        [&self.spu_id, &self.product_id]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|id| !id.trim().is_empty())
            .unwrap_or("")
    }
}

/// Decoded tag endpoint response.
#[derive(Debug, Default, Deserialize)]
pub struct TagResponse {
    #[serde(default, deserialize_with = "integer_code")]
    pub code: Option<i64>,
    #[serde(default)]
    pub data: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagData {
    #[serde(default, deserialize_with = "scalar_text")]
    main_category: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    main_category_ai: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    white_list: Option<String>,
    #[serde(default, deserialize_with = "scalar_text")]
    white_list_ai: Option<String>,
}

impl TagResponse {
    /// Extracts the four tag fields when the envelope signals success and
    /// carries a `data` object; `None` for every other shape.
    #[must_use]
    pub fn into_tags(self) -> Option<AiTags> {
        if self.code != Some(TAG_SUCCESS_CODE) {
            return None;
        }
        let data = self.data.filter(Value::is_object)?;
        let data: TagData = serde_json::from_value(data).ok()?;
        Some(AiTags {
            main_category: data.main_category.unwrap_or_default(),
            main_category_ai: data.main_category_ai.unwrap_or_default(),
            white_list: data.white_list.unwrap_or_default(),
            white_list_ai: data.white_list_ai.unwrap_or_default(),
        })
    }
}

fn scalar_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Envelope status code; anything other than a JSON integer is `None`.
fn integer_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_i64))
}

/// `data` of a search envelope; a shape without a usable `rows` list is `None`.
fn search_data<'de, D>(deserializer: D) -> Result<Option<SearchData>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Price as sent: numbers and strings pass through untouched, booleans as
/// text. `null`, arrays and objects become `None`.
fn scalar_price<'de, D>(deserializer: D) -> Result<Option<PriceValue>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => Some(PriceValue::Number(n)),
        Some(Value::String(s)) => Some(PriceValue::Text(s)),
        Some(Value::Bool(b)) => Some(PriceValue::Text(b.to_string())),
        _ => None,
    })
}

/// Accepts any JSON scalar as text; `null`, arrays and objects become `None`.
fn scalar_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_text))
}

/// Accepts an array of scalars or a comma-separated string.
fn text_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => Some(items.iter().filter_map(scalar_to_text).collect()),
        Some(Value::String(joined)) => Some(
            joined
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect(),
        ),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn search_request_serializes_upstream_shape() {
        let body = serde_json::to_value(SearchRequest::new("外套", GenderCategory::Kid, 3))
            .expect("serialization failed");
        assert_eq!(
            body,
            json!({
                "keyword": "外套",
                "pageSize": 3,
                "pageNum": 1,
                "handletype": "200",
                "filters": [{"dimensionName": "gender", "tagNames": ["KID"]}]
            })
        );
    }

    #[test]
    fn rows_returned_only_for_success_envelope() {
        let ok: SearchPage =
            serde_json::from_value(json!({"code": 200, "data": {"rows": [{"spuId": "A1"}]}}))
                .unwrap();
        assert!(ok.is_success());
        assert_eq!(ok.rows().len(), 1);

        let wrong_code: SearchPage =
            serde_json::from_value(json!({"code": 500, "data": {"rows": [{"spuId": "A1"}]}}))
                .unwrap();
        assert!(!wrong_code.is_success());
        assert!(wrong_code.rows().is_empty());
        assert!(wrong_code.into_rows().is_empty());

        let no_data: SearchPage = serde_json::from_value(json!({"code": 200})).unwrap();
        assert!(no_data.rows().is_empty());
    }

    #[test]
    fn raw_product_identity_prefers_spu_id() {
        let raw = RawProduct::from_row(json!({"spuId": "A1", "productId": "P9"})).unwrap();
        assert_eq!(raw.identity(), "A1");
    }

    #[test]
    fn raw_product_identity_falls_back_to_product_id() {
        let raw = RawProduct::from_row(json!({"spuId": "", "productId": 12345})).unwrap();
        assert_eq!(raw.identity(), "12345");
    }

    #[test]
    fn raw_product_identity_empty_when_both_absent() {
        let raw = RawProduct::from_row(json!({"productName": "无编号商品"})).unwrap();
        assert_eq!(raw.identity(), "");
    }

    #[test]
    fn raw_product_accepts_comma_separated_tags() {
        let raw = RawProduct::from_row(json!({"tags": "春季, 新款,,通勤"})).unwrap();
        assert_eq!(
            raw.tags,
            Some(vec!["春季".to_owned(), "新款".to_owned(), "通勤".to_owned()])
        );
    }

    #[test]
    fn raw_product_nulls_become_none() {
        let raw =
            RawProduct::from_row(json!({"spuId": "A1", "material": null, "price": null})).unwrap();
        assert!(raw.material.is_none());
        assert!(raw.price.is_none());
    }

    #[test]
    fn raw_product_rejects_non_object_row() {
        assert!(RawProduct::from_row(json!("A1")).is_err());
    }

    #[test]
    fn tag_response_success_extracts_fields_with_defaults() {
        let resp: TagResponse = serde_json::from_value(json!({
            "code": 0,
            "data": {"mainCategory": "外套", "whiteList": "通勤,百搭", "whiteListAi": null}
        }))
        .unwrap();
        let tags = resp.into_tags().expect("expected tags");
        assert_eq!(tags.main_category, "外套");
        assert_eq!(tags.main_category_ai, "");
        assert_eq!(tags.white_list, "通勤,百搭");
        assert_eq!(tags.white_list_ai, "");
    }

    #[test]
    fn tag_response_without_data_has_no_tags() {
        let resp: TagResponse = serde_json::from_value(json!({"code": 0, "data": null})).unwrap();
        assert!(resp.into_tags().is_none());
    }

    #[test]
    fn tag_response_unexpected_code_has_no_tags() {
        let resp: TagResponse =
            serde_json::from_value(json!({"code": 500, "data": {"mainCategory": "外套"}}))
                .unwrap();
        assert!(resp.into_tags().is_none());
    }

    #[test]
    fn raw_product_keeps_row_with_unusable_price() {
        let raw = RawProduct::from_row(json!({
            "spuId": "A1",
            "price": {"amount": 399},
            "discountPrice": [1, 2]
        }))
        .expect("an odd price must not sink the row");
        assert_eq!(raw.identity(), "A1");
        assert!(raw.price.is_none());
        assert!(raw.discount_price.is_none());
    }

    #[test]
    fn raw_product_price_passes_scalars_through() {
        let raw = RawProduct::from_row(json!({"spuId": "A1", "price": 299, "discountPrice": true}))
            .unwrap();
        assert_eq!(raw.price.map(|p| p.to_string()), Some("299".to_owned()));
        assert_eq!(raw.discount_price, Some(PriceValue::Text("true".to_owned())));
    }

    #[test]
    fn search_page_with_string_code_has_no_rows() {
        let page: SearchPage =
            serde_json::from_value(json!({"code": "200", "data": {"rows": [{"spuId": "A1"}]}}))
                .expect("string code must still decode");
        assert_eq!(page.code, None);
        assert!(!page.is_success());
        assert!(page.rows().is_empty());
    }

    #[test]
    fn search_page_tolerates_odd_msg_and_data() {
        let page: SearchPage =
            serde_json::from_value(json!({"code": 200, "msg": 0, "data": "busy"}))
                .expect("odd envelope must still decode");
        assert_eq!(page.msg.as_deref(), Some("0"));
        assert!(page.data.is_none());
        assert!(page.rows().is_empty());
    }

    #[test]
    fn tag_response_with_string_code_has_no_tags() {
        let resp: TagResponse =
            serde_json::from_value(json!({"code": "0", "data": {"mainCategory": "外套"}}))
                .expect("string code must still decode");
        assert!(resp.into_tags().is_none());
    }
}
