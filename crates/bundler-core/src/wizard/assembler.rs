//! BundleAssembler -- turns a validated `BundleDraft` into a `BundleDefinition`.
//!
//! This is the only place wizard state is converted into the platform wire
//! shape. It assumes the draft already passed validation and does not
//! re-check the option invariant.
//!
//! Follows the stateless utility pattern (no fields, inputs passed as
//! parameters).

use bundler_types::bundle::{
    BundleDefinition, BundleDraft, ComponentOptionSelection, ComponentSpec, ProductSelection,
};

/// Stateless utility that assembles a bundle definition from a draft.
pub struct BundleAssembler;

impl BundleAssembler {
    /// Assemble the platform-ready definition.
    ///
    /// - components follow `draft.products` order 1:1 (no dedupe; a product
    ///   picked twice yields two components)
    /// - only `selected` option values are emitted
    /// - quantity passes through unchanged
    /// - the title is the trimmed bundle name
    pub fn assemble(draft: &BundleDraft) -> BundleDefinition {
        BundleDefinition {
            title: draft.bundle_name.trim().to_string(),
            components: draft.products.iter().map(component_spec).collect(),
        }
    }

    /// Encode a definition for a wire boundary.
    pub fn encode_definition(definition: &BundleDefinition) -> Result<String, serde_json::Error> {
        serde_json::to_string(definition)
    }

    /// Decode a definition produced by [`BundleAssembler::encode_definition`].
    pub fn decode_definition(encoded: &str) -> Result<BundleDefinition, serde_json::Error> {
        serde_json::from_str(encoded)
    }

    /// One-line summary for CLI display, e.g. `Summer Kit (3 components)`.
    pub fn summarize(definition: &BundleDefinition) -> String {
        let count = definition.components.len();
        let noun = if count == 1 { "component" } else { "components" };
        format!("{} ({count} {noun})", definition.title)
    }
}

fn component_spec(product: &ProductSelection) -> ComponentSpec {
    ComponentSpec {
        product_id: product.id.clone(),
        quantity: product.quantity,
        option_selections: product
            .options
            .iter()
            .map(|option| ComponentOptionSelection {
                component_option_id: option.id.clone(),
                name: option.name.clone(),
                values: option.selected_values().map(str::to_string).collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bundler_types::bundle::{OptionSelection, OptionValue};
    use chrono::NaiveDate;

    fn product(id: &str, quantity: u32, values: &[(&str, bool)]) -> ProductSelection {
        ProductSelection {
            id: id.to_string(),
            title: id.to_uppercase(),
            vendor: "Acme".to_string(),
            images: vec![],
            quantity,
            options: vec![OptionSelection {
                id: format!("{id}-size"),
                name: "Size".to_string(),
                values: values
                    .iter()
                    .map(|(value, selected)| OptionValue {
                        value: value.to_string(),
                        selected: *selected,
                    })
                    .collect(),
            }],
        }
    }

    fn draft() -> BundleDraft {
        BundleDraft::starting_on(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap())
            .with_name("  Summer Kit  ")
            .with_products(vec![
                product("hat", 1, &[("S", true), ("M", false), ("L", true)]),
                product("shirt", 3, &[("M", true)]),
            ])
    }

    #[test]
    fn test_assemble_trims_title() {
        assert_eq!(BundleAssembler::assemble(&draft()).title, "Summer Kit");
    }

    #[test]
    fn test_components_follow_selection_order() {
        let definition = BundleAssembler::assemble(&draft());
        let ids: Vec<&str> = definition
            .components
            .iter()
            .map(|c| c.product_id.as_str())
            .collect();
        assert_eq!(ids, vec!["hat", "shirt"]);
        assert_eq!(definition.components[1].quantity, 3);
    }

    #[test]
    fn test_only_selected_values_are_emitted() {
        let definition = BundleAssembler::assemble(&draft());
        let hat = &definition.components[0].option_selections[0];
        assert_eq!(hat.component_option_id, "hat-size");
        assert_eq!(hat.name, "Size");
        assert_eq!(hat.values, vec!["S".to_string(), "L".to_string()]);
    }

    #[test]
    fn test_duplicate_products_are_not_merged() {
        let draft = draft().with_products(vec![
            product("hat", 1, &[("S", true)]),
            product("hat", 1, &[("S", true)]),
        ]);
        assert_eq!(BundleAssembler::assemble(&draft).components.len(), 2);
    }

    #[test]
    fn test_assemble_is_deterministic() {
        assert_eq!(
            BundleAssembler::assemble(&draft()),
            BundleAssembler::assemble(&draft())
        );
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let definition = BundleAssembler::assemble(&draft());
        let encoded = BundleAssembler::encode_definition(&definition).unwrap();
        assert!(encoded.contains("\"optionSelections\""));
        let decoded = BundleAssembler::decode_definition(&encoded).unwrap();
        assert_eq!(decoded, definition);
    }

    #[test]
    fn test_summarize() {
        let definition = BundleAssembler::assemble(&draft());
        assert_eq!(
            BundleAssembler::summarize(&definition),
            "Summer Kit (2 components)"
        );
    }
}
