//! Per-step validation of a `BundleDraft`.
//!
//! Every function here is pure: the same draft always yields the same
//! `FieldErrors`, and nothing is mutated. An empty map means the step passes.

use std::str::FromStr;

use rust_decimal::Decimal;

use bundler_types::bundle::BundleDraft;
use bundler_types::error::ValidationError;
use bundler_types::wizard::{Field, FieldErrors, Step};

/// Validate the slice of the draft that `step` is responsible for.
pub fn validate_step(step: Step, draft: &BundleDraft) -> FieldErrors {
    match step {
        Step::Name => validate_name(draft),
        Step::Products => validate_products(draft),
        Step::Variants => option_errors(draft),
        Step::Discount => validate_discount(draft),
        Step::Description => validate_description(draft),
    }
}

pub fn validate_name(draft: &BundleDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if draft.bundle_name.trim().is_empty() {
        errors.insert(Field::BundleName, ValidationError::MissingName);
    }
    errors
}

/// Products step: at least one product, and every option of every product
/// keeps at least one value.
pub fn validate_products(draft: &BundleDraft) -> FieldErrors {
    let mut errors = option_errors(draft);
    if draft.products.is_empty() {
        errors.insert(Field::Products, ValidationError::NoProducts);
    }
    errors
}

/// Live option check: one `NoOptionValueSelected` per product/option pair
/// whose values are all deselected.
///
/// Non-empty iff some option of some selected product has zero selected
/// values.
pub fn option_errors(draft: &BundleDraft) -> FieldErrors {
    draft
        .products
        .iter()
        .flat_map(|product| {
            product
                .options
                .iter()
                .filter(|option| !option.has_selection())
                .map(move |option| {
                    (
                        Field::option(&product.id, &option.id),
                        ValidationError::NoOptionValueSelected {
                            option_name: option.name.clone(),
                        },
                    )
                })
        })
        .collect()
}

pub fn validate_discount(draft: &BundleDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if parse_positive_decimal(&draft.discount_value).is_none() {
        errors.insert(Field::DiscountValue, ValidationError::MissingDiscountValue);
    }
    if draft.start_date >= draft.end_date {
        errors.insert(Field::DateRange, ValidationError::InvalidDateRange);
    }
    errors
}

pub fn validate_description(draft: &BundleDraft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if draft.description.trim().is_empty() {
        errors.insert(Field::Description, ValidationError::MissingDescription);
    }
    errors
}

/// Parse discount text as a strictly positive decimal.
///
/// Accepts surrounding whitespace and scientific notation ("1e1").
pub fn parse_positive_decimal(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
        .filter(|value| value.is_sign_positive() && !value.is_zero())
}
