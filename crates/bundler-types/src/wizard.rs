//! Wizard steps, field keys, and the serializable wizard snapshot.
//!
//! The step sequence is a transition table derived from [`WizardConfig`]
//! instead of per-step branching in a surface.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::bundle::BundleDraft;
use crate::config::WizardConfig;
use crate::error::ValidationError;

/// One page of the bundle wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Name,
    Products,
    Variants,
    Discount,
    Description,
}

const DEFAULT_SEQUENCE: &[Step] = &[Step::Name, Step::Products, Step::Discount, Step::Description];

const VARIANT_SEQUENCE: &[Step] = &[
    Step::Name,
    Step::Products,
    Step::Variants,
    Step::Discount,
    Step::Description,
];

impl Step {
    /// The ordered steps for a wizard configuration.
    pub fn sequence(config: &WizardConfig) -> &'static [Step] {
        if config.variant_step {
            VARIANT_SEQUENCE
        } else {
            DEFAULT_SEQUENCE
        }
    }

    /// Human-readable page title.
    pub fn title(&self) -> &'static str {
        match self {
            Step::Name => "Name your bundle",
            Step::Products => "Select products",
            Step::Variants => "Select variants",
            Step::Discount => "Set discount",
            Step::Description => "Describe your bundle",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Name => write!(f, "name"),
            Step::Products => write!(f, "products"),
            Step::Variants => write!(f, "variants"),
            Step::Discount => write!(f, "discount"),
            Step::Description => write!(f, "description"),
        }
    }
}

// ---------------------------------------------------------------------------
// Field keys
// ---------------------------------------------------------------------------

/// The draft field a validation error is attached to.
///
/// Serialized as a flat string key (`bundleName`, `products[<product>][<option>]`,
/// ...) so error maps render as plain JSON objects.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Field {
    BundleName,
    Products,
    Option { product_id: String, option_id: String },
    DiscountValue,
    DateRange,
    Description,
}

impl Field {
    pub fn option(product_id: impl Into<String>, option_id: impl Into<String>) -> Self {
        Field::Option {
            product_id: product_id.into(),
            option_id: option_id.into(),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::BundleName => write!(f, "bundleName"),
            Field::Products => write!(f, "products"),
            Field::Option {
                product_id,
                option_id,
            } => write!(f, "products[{product_id}][{option_id}]"),
            Field::DiscountValue => write!(f, "discountValue"),
            Field::DateRange => write!(f, "dateRange"),
            Field::Description => write!(f, "description"),
        }
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bundleName" => Ok(Field::BundleName),
            "products" => Ok(Field::Products),
            "discountValue" => Ok(Field::DiscountValue),
            "dateRange" => Ok(Field::DateRange),
            "description" => Ok(Field::Description),
            other => other
                .strip_prefix("products[")
                .and_then(|rest| rest.strip_suffix(']'))
                .and_then(|rest| rest.split_once("]["))
                .map(|(product_id, option_id)| Field::option(product_id, option_id))
                .ok_or_else(|| format!("unknown field key: '{other}'")),
        }
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.to_string()
    }
}

impl TryFrom<String> for Field {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Field-keyed validation errors. Ordered so output is deterministic.
pub type FieldErrors = BTreeMap<Field, ValidationError>;

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Everything needed to render or resume a wizard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardSnapshot {
    pub config: WizardConfig,
    /// 1-based position in `Step::sequence(&config)`.
    pub step: usize,
    pub draft: BundleDraft,
    #[serde(default)]
    pub errors: FieldErrors,
    #[serde(default)]
    pub errors_visible: bool,
}

impl WizardSnapshot {
    /// The step the snapshot is positioned on.
    pub fn current_step(&self) -> Step {
        let sequence = Step::sequence(&self.config);
        let index = self.step.clamp(1, sequence.len()) - 1;
        sequence[index]
    }
}
