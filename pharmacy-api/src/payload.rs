//! Sanitization of admin create/update bodies for catalog items.
//!
//! Bodies are read field by field from loosely typed JSON: a field of the
//! wrong type is treated as absent rather than failing the whole request.

use pharmacy::{
    ApiError, ProductKind,
    filtering::{sanitize_category, to_finite_number},
};
use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

pub const MAX_NAME_LENGTH: usize = 200;
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;
pub const MAX_IMAGE_URL_LENGTH: usize = 1024;
pub const MAX_TAGS: usize = 20;
pub const MAX_TAG_LENGTH: usize = 50;
pub const MAX_RATING: f64 = 5.0;

/// Create or update body for a catalog item. Every field is optional on the wire.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPayload {
    #[schema(value_type = Option<String>, example = "Vitamin C 1000mg")]
    pub name: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub generic_name: Option<Value>,
    #[schema(value_type = Option<String>, example = "Vitamins")]
    pub category: Option<Value>,
    #[schema(value_type = Option<f64>, example = 12.5)]
    pub price: Option<Value>,
    #[schema(value_type = Option<i32>, example = 40)]
    pub stock: Option<Value>,
    #[schema(value_type = Option<bool>)]
    pub in_stock: Option<Value>,
    #[schema(value_type = Option<f64>, example = 4.5)]
    pub rating: Option<Value>,
    #[schema(value_type = Option<String>, example = "https://cdn.example.com/vitamin-c.png")]
    pub image_url: Option<Value>,
    #[schema(value_type = Option<Vec<String>>)]
    pub tags: Option<Value>,
    /// Products only: `medicine` or `health`
    #[serde(rename = "type")]
    #[schema(value_type = Option<String>, example = "medicine")]
    pub kind: Option<Value>,
    /// Products only
    #[schema(value_type = Option<bool>)]
    pub prescription: Option<Value>,
}

/// A validated, complete catalog item ready to insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogItem {
    pub name: String,
    pub description: String,
    pub generic_name: Option<String>,
    pub price: f64,
    pub category: String,
    pub image_url: Option<String>,
    pub in_stock: bool,
    pub stock: i32,
    pub tags: Vec<String>,
    pub rating: Option<f64>,
    pub kind: ProductKind,
    pub prescription: bool,
}

/// The usable fields of an update body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub generic_name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub in_stock: Option<bool>,
    pub stock: Option<i32>,
    pub tags: Option<Vec<String>>,
    pub rating: Option<f64>,
}

impl CatalogUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn text(value: Option<&Value>, max: usize) -> Option<String> {
    let trimmed = value?.as_str()?.trim();
    Some(trimmed.chars().take(max).collect())
}

fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()),
        Value::String(s) => to_finite_number(s),
        _ => None,
    }
}

fn flag(value: Option<&Value>) -> Option<bool> {
    value?.as_bool()
}

fn non_negative(n: f64) -> f64 {
    n.max(0.0)
}

#[allow(clippy::cast_possible_truncation)]
fn stock_count(n: f64) -> i32 {
    n.floor().clamp(0.0, f64::from(i32::MAX)) as i32
}

fn rating(n: f64) -> f64 {
    n.clamp(0.0, MAX_RATING)
}

fn image_url(value: Option<&Value>) -> Option<String> {
    let url = value?.as_str()?.trim();
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    let is_http = lower.starts_with("http://") || lower.starts_with("https://");
    (is_http && url.chars().count() <= MAX_IMAGE_URL_LENGTH).then(|| url.to_string())
}

fn tags(value: Option<&Value>) -> Option<Vec<String>> {
    let tags: Vec<String> = value?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .map(|tag| tag.chars().take(MAX_TAG_LENGTH).collect())
        .collect();
    (!tags.is_empty()).then_some(tags)
}

fn category(value: Option<&Value>) -> Option<String> {
    sanitize_category(value?.as_str())
}

impl CatalogPayload {
    /// Validate a create body.
    ///
    /// # Errors
    ///
    /// Returns 400 "Missing or invalid required fields" when the name,
    /// description, price or category is missing or unusable.
    pub fn into_new_item(self) -> Result<NewCatalogItem, ApiError> {
        let name = text(self.name.as_ref(), MAX_NAME_LENGTH).filter(|s| !s.is_empty());
        let description =
            text(self.description.as_ref(), MAX_DESCRIPTION_LENGTH).filter(|s| !s.is_empty());
        let price = number(self.price.as_ref()).map(non_negative);
        let category = category(self.category.as_ref());

        let (Some(name), Some(description), Some(price), Some(category)) =
            (name, description, price, category)
        else {
            return Err(ApiError::bad_request("Missing or invalid required fields"));
        };

        let stock = number(self.stock.as_ref()).map_or(0, stock_count);
        Ok(NewCatalogItem {
            name,
            description,
            generic_name: text(self.generic_name.as_ref(), MAX_NAME_LENGTH),
            price,
            category,
            image_url: image_url(self.image_url.as_ref()),
            in_stock: flag(self.in_stock.as_ref()).unwrap_or(stock > 0),
            stock,
            tags: tags(self.tags.as_ref()).unwrap_or_default(),
            rating: number(self.rating.as_ref()).map(rating),
            kind: self
                .kind
                .as_ref()
                .and_then(Value::as_str)
                .and_then(ProductKind::from_wire)
                .unwrap_or(ProductKind::Medicine),
            prescription: flag(self.prescription.as_ref()).unwrap_or(false),
        })
    }

    /// Validate an update body.
    ///
    /// # Errors
    ///
    /// Returns 400 "No valid fields to update" when nothing usable remains.
    pub fn into_update(self) -> Result<CatalogUpdate, ApiError> {
        let update = CatalogUpdate {
            name: text(self.name.as_ref(), MAX_NAME_LENGTH),
            description: text(self.description.as_ref(), MAX_DESCRIPTION_LENGTH),
            generic_name: text(self.generic_name.as_ref(), MAX_NAME_LENGTH),
            price: number(self.price.as_ref()).map(non_negative),
            category: category(self.category.as_ref()),
            image_url: image_url(self.image_url.as_ref()),
            in_stock: flag(self.in_stock.as_ref()),
            stock: number(self.stock.as_ref()).map(stock_count),
            tags: tags(self.tags.as_ref()),
            rating: number(self.rating.as_ref()).map(rating),
        };
        if update.is_empty() {
            return Err(ApiError::bad_request("No valid fields to update"));
        }
        Ok(update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use serde_json::json;

    fn payload(body: Value) -> CatalogPayload {
        serde_json::from_value(body).unwrap()
    }

    fn valid_body() -> Value {
        json!({
            "name": "  Vitamin C  ",
            "description": "Immune support",
            "price": "12.5",
            "category": "Vitamins"
        })
    }

    #[test]
    fn test_minimal_create() {
        let item = payload(valid_body()).into_new_item().unwrap();
        assert_eq!(item.name, "Vitamin C");
        assert!((item.price - 12.5).abs() < f64::EPSILON);
        assert_eq!(item.category, "Vitamins");
        assert_eq!(item.stock, 0);
        assert!(!item.in_stock, "in_stock follows stock when not given");
        assert!(item.tags.is_empty());
        assert_eq!(item.rating, None);
        assert_eq!(item.kind, ProductKind::Medicine);
        assert!(!item.prescription);
    }

    #[test]
    fn test_create_clamps_and_truncates() {
        let mut body = valid_body();
        body["name"] = json!("N".repeat(500));
        body["price"] = json!(-3);
        body["stock"] = json!(7.9);
        body["rating"] = json!(11);
        body["imageUrl"] = json!(" HTTPS://cdn.example.com/a.png ");
        body["tags"] = json!(["  a ", "", 5, "t".repeat(80), "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s", "t"]);
        body["type"] = json!("health");
        body["prescription"] = json!(true);

        let item = payload(body).into_new_item().unwrap();
        assert_eq!(item.name.chars().count(), MAX_NAME_LENGTH);
        assert!(item.price.abs() < f64::EPSILON);
        assert_eq!(item.stock, 7);
        assert!(item.in_stock);
        assert_eq!(item.rating, Some(5.0));
        assert_eq!(item.image_url.as_deref(), Some("HTTPS://cdn.example.com/a.png"));
        assert_eq!(item.tags.len(), MAX_TAGS);
        assert_eq!(item.tags[0], "a");
        assert_eq!(item.tags[1].chars().count(), MAX_TAG_LENGTH);
        assert_eq!(item.kind, ProductKind::Health);
        assert!(item.prescription);
    }

    #[test]
    fn test_create_rejects_missing_required_fields() {
        for field in ["name", "description", "price", "category"] {
            let mut body = valid_body();
            body.as_object_mut().unwrap().remove(field);
            let err = payload(body).into_new_item().unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "missing {field}");
            assert_eq!(err.user_message(), "Missing or invalid required fields");
        }
    }

    #[test]
    fn test_create_rejects_invalid_required_fields() {
        let cases = [
            ("name", json!("   ")),
            ("name", json!(42)),
            ("price", json!("free")),
            ("price", json!(null)),
            ("category", json!("all")),
            ("category", json!("<b>Vitamins</b>")),
        ];
        for (field, value) in cases {
            let mut body = valid_body();
            body[field] = value.clone();
            assert!(payload(body).into_new_item().is_err(), "{field} = {value}");
        }
    }

    #[test]
    fn test_image_url_must_be_http() {
        let mut body = valid_body();
        body["imageUrl"] = json!("javascript:alert(1)");
        assert_eq!(payload(body).into_new_item().unwrap().image_url, None);

        let mut body = valid_body();
        body["imageUrl"] = json!(format!("https://x.io/{}", "a".repeat(1100)));
        assert_eq!(payload(body).into_new_item().unwrap().image_url, None);
    }

    #[test]
    fn test_explicit_in_stock_wins() {
        let mut body = valid_body();
        body["stock"] = json!(10);
        body["inStock"] = json!(false);
        assert!(!payload(body).into_new_item().unwrap().in_stock);
    }

    #[test]
    fn test_update_keeps_only_usable_fields() {
        let update = payload(json!({
            "price": 9,
            "category": "<script>",
            "inStock": "yes",
            "tags": []
        }))
        .into_update()
        .unwrap();
        assert_eq!(update, CatalogUpdate { price: Some(9.0), ..CatalogUpdate::default() });
    }

    #[test]
    fn test_update_with_nothing_usable_fails() {
        for body in [json!({}), json!({ "category": "all", "price": "n/a", "imageUrl": "ftp://x" })] {
            let err = payload(body).into_update().unwrap_err();
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
            assert_eq!(err.user_message(), "No valid fields to update");
        }
    }
}
