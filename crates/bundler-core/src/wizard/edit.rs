//! Draft edits -- the only way a surface changes wizard state.
//!
//! Each edit maps the current `BundleDraft` snapshot to a new one and knows
//! which error fields it touches, so the wizard can clear exactly those.

use chrono::NaiveDate;

use bundler_types::bundle::{parse_quantity, BundleDraft, DiscountType, ProductSelection};
use bundler_types::catalog::CatalogProduct;
use bundler_types::wizard::Field;

#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    SetName { name: String },
    SetCreateSectionBlock { enabled: bool },
    /// Replace the product list with a fresh catalog pick.
    SelectProducts { picked: Vec<CatalogProduct> },
    /// Free-form quantity text; anything not a positive integer becomes 1.
    SetQuantity { product_id: String, quantity: String },
    ToggleOptionValue {
        product_id: String,
        option_id: String,
        value: String,
    },
    RemoveProduct { product_id: String },
    SetDiscountType { discount_type: DiscountType },
    SetDiscountValue { value: String },
    SetStartDate { date: NaiveDate },
    SetEndDate { date: NaiveDate },
    SetDescription { description: String },
}

impl DraftEdit {
    /// Produce the next draft snapshot.
    pub fn apply(&self, draft: &BundleDraft) -> BundleDraft {
        match self {
            DraftEdit::SetName { name } => draft.with_name(name.clone()),
            DraftEdit::SetCreateSectionBlock { enabled } => {
                draft.with_create_section_block(*enabled)
            }
            DraftEdit::SelectProducts { picked } => {
                draft.with_products(merge_selection(&draft.products, picked))
            }
            DraftEdit::SetQuantity {
                product_id,
                quantity,
            } => draft.with_quantity(product_id, parse_quantity(quantity)),
            DraftEdit::ToggleOptionValue {
                product_id,
                option_id,
                value,
            } => draft.with_option_toggled(product_id, option_id, value),
            DraftEdit::RemoveProduct { product_id } => draft.without_product(product_id),
            DraftEdit::SetDiscountType { discount_type } => {
                draft.with_discount_type(*discount_type)
            }
            DraftEdit::SetDiscountValue { value } => draft.with_discount_value(value.clone()),
            DraftEdit::SetStartDate { date } => draft.with_start_date(*date),
            DraftEdit::SetEndDate { date } => draft.with_end_date(*date),
            DraftEdit::SetDescription { description } => {
                draft.with_description(description.clone())
            }
        }
    }

    /// Whether an error keyed on `field` is about something this edit changed.
    pub fn touches(&self, field: &Field) -> bool {
        match self {
            DraftEdit::SetName { .. } => *field == Field::BundleName,
            DraftEdit::SetCreateSectionBlock { .. } | DraftEdit::SetDiscountType { .. } => false,
            DraftEdit::SelectProducts { .. } => {
                matches!(field, Field::Products | Field::Option { .. })
            }
            DraftEdit::SetQuantity { .. } => false,
            DraftEdit::ToggleOptionValue {
                product_id,
                option_id,
                ..
            } => matches!(
                field,
                Field::Option { product_id: p, option_id: o } if p == product_id && o == option_id
            ),
            DraftEdit::RemoveProduct { product_id } => match field {
                Field::Products => true,
                Field::Option { product_id: p, .. } => p == product_id,
                _ => false,
            },
            DraftEdit::SetDiscountValue { .. } => *field == Field::DiscountValue,
            DraftEdit::SetStartDate { .. } | DraftEdit::SetEndDate { .. } => {
                *field == Field::DateRange
            }
            DraftEdit::SetDescription { .. } => *field == Field::Description,
        }
    }
}

/// Merge a new catalog pick into the existing selections.
///
/// The result follows the pick's order. Products that were already selected
/// keep their existing quantity and option toggles; new products are seeded
/// with every value selected; products missing from the pick are dropped.
pub fn merge_selection(
    existing: &[ProductSelection],
    picked: &[CatalogProduct],
) -> Vec<ProductSelection> {
    picked
        .iter()
        .map(|product| {
            existing
                .iter()
                .find(|p| p.id == product.id)
                .cloned()
                .unwrap_or_else(|| ProductSelection::from_catalog(product))
        })
        .collect()
}
