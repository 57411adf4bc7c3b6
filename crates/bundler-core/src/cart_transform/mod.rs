//! Cart expansion -- replaces bundle lines with their component lines.
//!
//! Runs once per cart evaluation. A bundle variant stores its components as
//! a JSON array of merchandise ids in its `component_reference` attribute;
//! every line whose merchandise carries a non-empty reference becomes one
//! `expand` operation. Everything else passes through untouched.
//!
//! Stateless: `expand` and `run` can be called from any number of tasks.

use bundler_types::cart::{
    CartLine, CartOperation, CartTransformInput, ExpandOperation, ExpandedItem, FunctionResult,
    Merchandise,
};
use bundler_types::error::ExpansionError;

/// Quantity of each component per bundle line.
const COMPONENT_QUANTITY: u32 = 1;

/// Build the expansion operations for a cart.
///
/// Lines are processed in input order and independently of each other. A
/// reference that is not a JSON array of strings aborts the whole
/// invocation; no partial result is returned.
pub fn expand(input: &CartTransformInput) -> Result<FunctionResult, ExpansionError> {
    let mut operations = Vec::new();
    for line in &input.cart.lines {
        if let Some(operation) = expand_line(line)? {
            operations.push(CartOperation::Expand(operation));
        }
    }

    tracing::debug!(
        lines = input.cart.lines.len(),
        expanded = operations.len(),
        "cart transform evaluated"
    );
    Ok(FunctionResult { operations })
}

/// Decode the platform input, expand, and encode the result.
pub fn run(input_json: &str) -> Result<String, ExpansionError> {
    let input: CartTransformInput = serde_json::from_str(input_json)
        .map_err(|e| ExpansionError::InvalidInput(e.to_string()))?;
    let result = expand(&input)?;
    serde_json::to_string(&result).map_err(|e| ExpansionError::Encode(e.to_string()))
}

fn expand_line(line: &CartLine) -> Result<Option<ExpandOperation>, ExpansionError> {
    let Merchandise::ProductVariant(variant) = &line.merchandise else {
        return Ok(None);
    };
    let Some(reference) = &variant.component_reference else {
        return Ok(None);
    };

    let component_ids = parse_component_reference(&line.id, &reference.value)?;
    if component_ids.is_empty() {
        return Ok(None);
    }

    Ok(Some(ExpandOperation {
        cart_line_id: line.id.clone(),
        expanded_cart_items: component_ids
            .into_iter()
            .map(|merchandise_id| ExpandedItem {
                merchandise_id,
                quantity: COMPONENT_QUANTITY,
                price: None,
                attributes: None,
            })
            .collect(),
    }))
}

fn parse_component_reference(
    cart_line_id: &str,
    raw: &str,
) -> Result<Vec<String>, ExpansionError> {
    serde_json::from_str(raw).map_err(|e| ExpansionError::MalformedComponentReference {
        cart_line_id: cart_line_id.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundler_types::cart::{AttributeValue, Cart, ProductVariant};

    fn variant_line(id: &str, reference: Option<&str>) -> CartLine {
        CartLine {
            id: id.to_string(),
            merchandise: Merchandise::ProductVariant(ProductVariant {
                id: Some(format!("{id}-variant")),
                component_reference: reference.map(|value| AttributeValue {
                    value: value.to_string(),
                }),
            }),
        }
    }

    fn cart(lines: Vec<CartLine>) -> CartTransformInput {
        CartTransformInput {
            cart: Cart { lines },
        }
    }

    fn expanded_ids(operation: &CartOperation) -> Vec<&str> {
        let CartOperation::Expand(op) = operation;
        op.expanded_cart_items
            .iter()
            .map(|item| item.merchandise_id.as_str())
            .collect()
    }

    #[test]
    fn test_empty_cart_yields_no_operations() {
        let result = expand(&cart(vec![])).unwrap();
        assert!(result.operations.is_empty());
    }

    #[test]
    fn test_line_without_reference_is_skipped() {
        let result = expand(&cart(vec![variant_line("L1", None)])).unwrap();
        assert!(result.operations.is_empty());
    }

    #[test]
    fn test_two_references_expand_in_order() {
        let result = expand(&cart(vec![variant_line(
            "L1",
            Some(r#"["gid://shopify/ProductVariant/1","gid://shopify/ProductVariant/2"]"#),
        )]))
        .unwrap();

        assert_eq!(result.operations.len(), 1);
        let CartOperation::Expand(op) = &result.operations[0];
        assert_eq!(op.cart_line_id, "L1");
        assert_eq!(
            expanded_ids(&result.operations[0]),
            vec!["gid://shopify/ProductVariant/1", "gid://shopify/ProductVariant/2"]
        );
        for item in &op.expanded_cart_items {
            assert_eq!(item.quantity, 1);
            assert!(item.price.is_none());
            assert!(item.attributes.is_none());
        }
    }

    #[test]
    fn test_empty_reference_list_is_skipped() {
        let result = expand(&cart(vec![variant_line("L1", Some("[]"))])).unwrap();
        assert!(result.operations.is_empty());
    }

    #[test]
    fn test_non_variant_merchandise_is_skipped() {
        let line = CartLine {
            id: "L1".to_string(),
            merchandise: Merchandise::Other,
        };
        let result = expand(&cart(vec![line])).unwrap();
        assert!(result.operations.is_empty());
    }

    #[test]
    fn test_malformed_reference_aborts() {
        let err = expand(&cart(vec![
            variant_line("L1", Some(r#"["a"]"#)),
            variant_line("L2", Some("not json")),
        ]))
        .unwrap_err();

        match err {
            ExpansionError::MalformedComponentReference { cart_line_id, .. } => {
                assert_eq!(cart_line_id, "L2");
            }
            other => panic!("expected MalformedComponentReference, got {other:?}"),
        }
    }

    #[test]
    fn test_reference_must_be_a_list_of_strings() {
        let err = expand(&cart(vec![variant_line("L1", Some(r#"{"id": "a"}"#))])).unwrap_err();
        assert!(matches!(
            err,
            ExpansionError::MalformedComponentReference { .. }
        ));
    }

    #[test]
    fn test_lines_are_independent() {
        let l1 = variant_line("L1", Some(r#"["a","b"]"#));
        let l2 = variant_line("L2", Some(r#"["c"]"#));

        let together = expand(&cart(vec![l1.clone(), variant_line("L3", None), l2.clone()])).unwrap();
        let alone_1 = expand(&cart(vec![l1])).unwrap();
        let alone_2 = expand(&cart(vec![l2])).unwrap();

        assert_eq!(together.operations.len(), 2);
        assert_eq!(together.operations[0], alone_1.operations[0]);
        assert_eq!(together.operations[1], alone_2.operations[0]);
    }

    #[test]
    fn test_run_decodes_and_encodes() {
        let input = r#"{
            "cart": {
                "lines": [
                    {
                        "id": "gid://shopify/CartLine/1",
                        "merchandise": {
                            "__typename": "ProductVariant",
                            "id": "gid://shopify/ProductVariant/100",
                            "component_reference": {"value": "[\"gid://shopify/ProductVariant/1\"]"}
                        }
                    },
                    {
                        "id": "gid://shopify/CartLine/2",
                        "merchandise": {"__typename": "CustomProduct"}
                    }
                ]
            }
        }"#;

        let output = run(input).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "operations": [{
                    "type": "expand",
                    "cart_line_id": "gid://shopify/CartLine/1",
                    "expanded_cart_items": [{
                        "merchandise_id": "gid://shopify/ProductVariant/1",
                        "quantity": 1,
                        "price": null,
                        "attributes": null
                    }]
                }]
            })
        );
    }

    #[test]
    fn test_run_skips_untyped_merchandise_and_expands_the_rest() {
        let input = r#"{"cart":{"lines":[
            {"id":"L1","merchandise":{"id":"gid://shopify/ProductVariant/9"}},
            {"id":"L2","merchandise":{"__typename":"ProductVariant","component_reference":{"value":"[\"v1\"]"}}}
        ]}}"#;

        let output = run(input).unwrap();
        let result: FunctionResult = serde_json::from_str(&output).unwrap();
        assert_eq!(result.operations.len(), 1);
        let CartOperation::Expand(op) = &result.operations[0];
        assert_eq!(op.cart_line_id, "L2");
        assert_eq!(expanded_ids(&result.operations[0]), vec!["v1"]);
    }

    #[test]
    fn test_run_rejects_invalid_input() {
        let err = run("{\"cart\": 5}").unwrap_err();
        assert!(matches!(err, ExpansionError::InvalidInput(_)));
    }
}
