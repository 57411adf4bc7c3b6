//! Bundle draft and bundle definition types.
//!
//! `BundleDraft` is the accumulator filled in across wizard steps. It is an
//! immutable snapshot: every `with_*` method returns a new draft and leaves
//! the original untouched, so the wizard can keep, compare, or discard
//! snapshots freely.
//!
//! `BundleDefinition` is the platform-ready shape derived from a validated
//! draft. Its serde field names match the platform's
//! `ProductBundleCreateInput`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogProduct, ImageRef};

// ---------------------------------------------------------------------------
// Discount
// ---------------------------------------------------------------------------

/// How the bundle discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    #[default]
    Percentage,
    Fixed,
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscountType::Percentage => write!(f, "percentage"),
            DiscountType::Fixed => write!(f, "fixed"),
        }
    }
}

impl FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "percentage" => Ok(DiscountType::Percentage),
            "fixed" => Ok(DiscountType::Fixed),
            other => Err(format!("invalid discount type: '{other}'")),
        }
    }
}

impl DiscountType {
    /// Unit suffix shown next to the discount value.
    pub fn suffix(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "%",
            DiscountType::Fixed => "$",
        }
    }
}

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

/// One catalog value of an option and whether it is kept in the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionValue {
    pub value: String,
    pub selected: bool,
}

/// A product option with independently toggle-able values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSelection {
    pub id: String,
    pub name: String,
    pub values: Vec<OptionValue>,
}

impl OptionSelection {
    /// Whether at least one value is still selected.
    pub fn has_selection(&self) -> bool {
        self.values.iter().any(|v| v.selected)
    }

    /// The selected values, in catalog order.
    pub fn selected_values(&self) -> impl Iterator<Item = &str> {
        self.values
            .iter()
            .filter(|v| v.selected)
            .map(|v| v.value.as_str())
    }

    fn toggled(&self, value: &str) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            values: self
                .values
                .iter()
                .map(|v| OptionValue {
                    value: v.value.clone(),
                    selected: if v.value == value { !v.selected } else { v.selected },
                })
                .collect(),
        }
    }
}

/// A catalog product picked into the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSelection {
    pub id: String,
    pub title: String,
    pub vendor: String,
    #[serde(default)]
    pub images: Vec<ImageRef>,
    pub quantity: u32,
    pub options: Vec<OptionSelection>,
}

impl ProductSelection {
    /// Seed a selection from a catalog product: quantity 1, every option
    /// value selected.
    pub fn from_catalog(product: &CatalogProduct) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            vendor: product.vendor.clone(),
            images: product.images.clone(),
            quantity: 1,
            options: product
                .options
                .iter()
                .map(|option| OptionSelection {
                    id: option.id.clone(),
                    name: option.name.clone(),
                    values: option
                        .values
                        .iter()
                        .map(|value| OptionValue {
                            value: value.clone(),
                            selected: true,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

/// Coerce free-form quantity input to a positive integer.
///
/// Anything that does not parse as an integer of at least 1 becomes 1.
pub fn parse_quantity(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(quantity) if quantity >= 1 => quantity,
        _ => 1,
    }
}

// ---------------------------------------------------------------------------
// BundleDraft
// ---------------------------------------------------------------------------

/// The partial bundle accumulated across wizard steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDraft {
    pub bundle_name: String,
    #[serde(default)]
    pub create_section_block: bool,
    #[serde(default)]
    pub products: Vec<ProductSelection>,
    #[serde(default)]
    pub discount_type: DiscountType,
    #[serde(default)]
    pub discount_value: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

impl Default for BundleDraft {
    fn default() -> Self {
        Self::starting_on(Utc::now().date_naive())
    }
}

impl BundleDraft {
    /// An empty draft whose discount window starts and ends on `today`.
    pub fn starting_on(today: NaiveDate) -> Self {
        Self {
            bundle_name: String::new(),
            create_section_block: false,
            products: Vec::new(),
            discount_type: DiscountType::default(),
            discount_value: String::new(),
            start_date: today,
            end_date: today,
            description: String::new(),
        }
    }

    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            bundle_name: name.into(),
            ..self.clone()
        }
    }

    pub fn with_create_section_block(&self, enabled: bool) -> Self {
        Self {
            create_section_block: enabled,
            ..self.clone()
        }
    }

    pub fn with_products(&self, products: Vec<ProductSelection>) -> Self {
        Self {
            products,
            ..self.clone()
        }
    }

    /// Set one product's quantity. Zero is coerced to 1.
    pub fn with_quantity(&self, product_id: &str, quantity: u32) -> Self {
        self.map_product(product_id, |product| ProductSelection {
            quantity: quantity.max(1),
            ..product.clone()
        })
    }

    /// Flip the `selected` flag of one option value of one product.
    pub fn with_option_toggled(&self, product_id: &str, option_id: &str, value: &str) -> Self {
        self.map_product(product_id, |product| ProductSelection {
            options: product
                .options
                .iter()
                .map(|option| {
                    if option.id == option_id {
                        option.toggled(value)
                    } else {
                        option.clone()
                    }
                })
                .collect(),
            ..product.clone()
        })
    }

    pub fn without_product(&self, product_id: &str) -> Self {
        Self {
            products: self
                .products
                .iter()
                .filter(|p| p.id != product_id)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }

    pub fn with_discount_type(&self, discount_type: DiscountType) -> Self {
        Self {
            discount_type,
            ..self.clone()
        }
    }

    pub fn with_discount_value(&self, value: impl Into<String>) -> Self {
        Self {
            discount_value: value.into(),
            ..self.clone()
        }
    }

    pub fn with_start_date(&self, date: NaiveDate) -> Self {
        Self {
            start_date: date,
            ..self.clone()
        }
    }

    pub fn with_end_date(&self, date: NaiveDate) -> Self {
        Self {
            end_date: date,
            ..self.clone()
        }
    }

    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self.clone()
        }
    }

    /// Look up a selected product by id.
    pub fn product(&self, product_id: &str) -> Option<&ProductSelection> {
        self.products.iter().find(|p| p.id == product_id)
    }

    fn map_product(
        &self,
        product_id: &str,
        f: impl Fn(&ProductSelection) -> ProductSelection,
    ) -> Self {
        Self {
            products: self
                .products
                .iter()
                .map(|p| if p.id == product_id { f(p) } else { p.clone() })
                .collect(),
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// BundleDefinition (platform wire shape)
// ---------------------------------------------------------------------------

/// Selected values of one component option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentOptionSelection {
    pub component_option_id: String,
    pub name: String,
    pub values: Vec<String>,
}

/// One component product of a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSpec {
    pub product_id: String,
    pub quantity: u32,
    pub option_selections: Vec<ComponentOptionSelection>,
}

/// The immutable, platform-ready definition of a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDefinition {
    pub title: String,
    pub components: Vec<ComponentSpec>,
}

/// Handle returned by the platform for an accepted bundle creation.
///
/// Bundle creation is asynchronous on the platform side; `status` is the
/// operation status at the time of the response (e.g. "CREATED", "ACTIVE").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleOperation {
    #[serde(default)]
    pub id: Option<String>,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogOption;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn shirt() -> CatalogProduct {
        CatalogProduct {
            id: "gid://shopify/Product/1".to_string(),
            title: "Shirt".to_string(),
            vendor: "Acme".to_string(),
            images: vec![],
            options: vec![CatalogOption {
                id: "gid://shopify/ProductOption/10".to_string(),
                name: "Size".to_string(),
                values: vec!["S".to_string(), "M".to_string()],
            }],
        }
    }

    #[test]
    fn test_from_catalog_selects_everything() {
        let selection = ProductSelection::from_catalog(&shirt());
        assert_eq!(selection.quantity, 1);
        assert_eq!(selection.options.len(), 1);
        assert!(selection.options[0].values.iter().all(|v| v.selected));
    }

    #[test]
    fn test_with_methods_leave_original_untouched() {
        let draft = BundleDraft::starting_on(day(1));
        let named = draft.with_name("Summer Kit");

        assert_eq!(draft.bundle_name, "");
        assert_eq!(named.bundle_name, "Summer Kit");
        assert_eq!(named.start_date, day(1));
    }

    #[test]
    fn test_toggle_only_touches_target_value() {
        let draft = BundleDraft::starting_on(day(1))
            .with_products(vec![ProductSelection::from_catalog(&shirt())]);

        let toggled = draft.with_option_toggled(
            "gid://shopify/Product/1",
            "gid://shopify/ProductOption/10",
            "S",
        );
        let values = &toggled.products[0].options[0].values;
        assert!(!values[0].selected);
        assert!(values[1].selected);

        let restored = toggled.with_option_toggled(
            "gid://shopify/Product/1",
            "gid://shopify/ProductOption/10",
            "S",
        );
        assert_eq!(restored, draft);
    }

    #[test]
    fn test_quantity_is_never_zero() {
        let draft = BundleDraft::starting_on(day(1))
            .with_products(vec![ProductSelection::from_catalog(&shirt())]);
        let updated = draft.with_quantity("gid://shopify/Product/1", 0);
        assert_eq!(updated.products[0].quantity, 1);
    }

    #[test]
    fn test_parse_quantity_defaults_to_one() {
        assert_eq!(parse_quantity("3"), 3);
        assert_eq!(parse_quantity(" 2 "), 2);
        assert_eq!(parse_quantity("0"), 1);
        assert_eq!(parse_quantity("-4"), 1);
        assert_eq!(parse_quantity("lots"), 1);
    }

    #[test]
    fn test_without_product_removes_by_id() {
        let draft = BundleDraft::starting_on(day(1))
            .with_products(vec![ProductSelection::from_catalog(&shirt())]);
        assert!(draft.without_product("gid://shopify/Product/1").products.is_empty());
        assert_eq!(draft.without_product("missing").products.len(), 1);
    }

    #[test]
    fn test_definition_uses_platform_field_names() {
        let definition = BundleDefinition {
            title: "Kit".to_string(),
            components: vec![ComponentSpec {
                product_id: "gid://shopify/Product/1".to_string(),
                quantity: 2,
                option_selections: vec![ComponentOptionSelection {
                    component_option_id: "gid://shopify/ProductOption/10".to_string(),
                    name: "Size".to_string(),
                    values: vec!["M".to_string()],
                }],
            }],
        };

        let json = serde_json::to_value(&definition).unwrap();
        assert_eq!(json["components"][0]["productId"], "gid://shopify/Product/1");
        assert_eq!(
            json["components"][0]["optionSelections"][0]["componentOptionId"],
            "gid://shopify/ProductOption/10"
        );
    }

    #[test]
    fn test_discount_type_parse_and_display() {
        assert_eq!("Fixed".parse::<DiscountType>().unwrap(), DiscountType::Fixed);
        assert_eq!(DiscountType::Percentage.to_string(), "percentage");
        assert!("bogus".parse::<DiscountType>().is_err());
    }
}
