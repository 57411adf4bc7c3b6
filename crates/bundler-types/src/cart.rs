//! Cart transform wire types.
//!
//! Input is the cart snapshot the checkout pipeline hands to the transform;
//! output is the list of operations it expects back. Field names and the
//! `"type": "expand"` discriminator are fixed by the platform contract.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Top-level cart transform input: `{"cart": {"lines": [...]}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartTransformInput {
    pub cart: Cart,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub merchandise: Merchandise,
}

/// Polymorphic line merchandise, discriminated by `__typename`.
///
/// Only product variants can carry a component reference; every other
/// merchandise kind, including objects with no `__typename` at all, is kept
/// opaque.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "__typename")]
pub enum Merchandise {
    ProductVariant(ProductVariant),
    Other,
}

const PRODUCT_VARIANT_TYPENAME: &str = "ProductVariant";

impl<'de> Deserialize<'de> for Merchandise {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        let typename = value.get("__typename").and_then(serde_json::Value::as_str);
        if typename != Some(PRODUCT_VARIANT_TYPENAME) {
            return Ok(Merchandise::Other);
        }
        ProductVariant::deserialize(value)
            .map(Merchandise::ProductVariant)
            .map_err(D::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    #[serde(default)]
    pub id: Option<String>,
    /// JSON-encoded list of component merchandise ids. Present only on
    /// variants that represent a bundle.
    #[serde(default)]
    pub component_reference: Option<AttributeValue>,
}

/// A string-valued attribute as exposed to the transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub value: String,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Top-level cart transform output: `{"operations": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionResult {
    pub operations: Vec<CartOperation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CartOperation {
    Expand(ExpandOperation),
}

/// Replace one cart line with its component lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandOperation {
    pub cart_line_id: String,
    pub expanded_cart_items: Vec<ExpandedItem>,
}

/// One component line of an expansion.
///
/// `price` and `attributes` are always emitted (as `null` when unset) since
/// the platform re-derives them from the referenced merchandise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpandedItem {
    pub merchandise_id: String,
    pub quantity: u32,
    pub price: Option<serde_json::Value>,
    pub attributes: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_variant_merchandise_deserializes_as_other() {
        let json = r#"{"id": "gid://shopify/CartLine/1", "merchandise": {"__typename": "CustomProduct", "title": "Gift wrap"}}"#;
        let line: CartLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.merchandise, Merchandise::Other);
    }

    #[test]
    fn test_merchandise_without_typename_deserializes_as_other() {
        let json = r#"{"id": "L1", "merchandise": {"id": "gid://shopify/ProductVariant/9"}}"#;
        let line: CartLine = serde_json::from_str(json).unwrap();
        assert_eq!(line.merchandise, Merchandise::Other);

        let line: CartLine = serde_json::from_str(r#"{"id": "L2", "merchandise": {}}"#).unwrap();
        assert_eq!(line.merchandise, Merchandise::Other);
    }

    #[test]
    fn test_variant_with_reference_deserializes() {
        let json = r#"{
            "id": "gid://shopify/CartLine/1",
            "merchandise": {
                "__typename": "ProductVariant",
                "id": "gid://shopify/ProductVariant/9",
                "component_reference": {"value": "[\"gid://shopify/ProductVariant/1\"]"}
            }
        }"#;
        let line: CartLine = serde_json::from_str(json).unwrap();
        match line.merchandise {
            Merchandise::ProductVariant(variant) => {
                assert_eq!(variant.id.as_deref(), Some("gid://shopify/ProductVariant/9"));
                assert!(variant.component_reference.is_some());
            }
            Merchandise::Other => panic!("expected a product variant"),
        }
    }

    #[test]
    fn test_expand_operation_serializes_with_type_tag_and_nulls() {
        let result = FunctionResult {
            operations: vec![CartOperation::Expand(ExpandOperation {
                cart_line_id: "gid://shopify/CartLine/1".to_string(),
                expanded_cart_items: vec![ExpandedItem {
                    merchandise_id: "gid://shopify/ProductVariant/1".to_string(),
                    quantity: 1,
                    price: None,
                    attributes: None,
                }],
            })],
        };

        let json = serde_json::to_value(&result).unwrap();
        let op = &json["operations"][0];
        assert_eq!(op["type"], "expand");
        assert_eq!(op["cart_line_id"], "gid://shopify/CartLine/1");
        let item = &op["expanded_cart_items"][0];
        assert!(item.get("price").unwrap().is_null());
        assert!(item.get("attributes").unwrap().is_null());
        assert_eq!(item["quantity"], 1);
    }
}
