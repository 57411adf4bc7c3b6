use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A field-level validation failure raised by a wizard step.
///
/// These are values, never thrown: validators return them in a field-keyed
/// map and the surface renders them inline.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("Bundle name is required")]
    MissingName,

    #[error("At least one product must be selected")]
    NoProducts,

    #[error("At least one {option_name} must be selected")]
    NoOptionValueSelected { option_name: String },

    #[error("Discount value must be a positive number")]
    MissingDiscountValue,

    #[error("End date must be after start date")]
    InvalidDateRange,

    #[error("Description is required")]
    MissingDescription,
}

/// Errors that abort a cart transform invocation.
#[derive(Debug, Error)]
pub enum ExpansionError {
    #[error("malformed component reference on cart line '{cart_line_id}': {reason}")]
    MalformedComponentReference { cart_line_id: String, reason: String },

    #[error("invalid cart transform input: {0}")]
    InvalidInput(String),

    #[error("failed to encode cart transform output: {0}")]
    Encode(String),
}

/// Errors from the commerce platform collaborator.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// The platform rejected the request; `message` is surfaced verbatim.
    #[error("{message}")]
    UserError {
        field: Option<Vec<String>>,
        message: String,
    },

    #[error("platform request failed: {0}")]
    Transport(String),

    #[error("platform returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("failed to decode platform response: {0}")]
    Decode(String),

    #[error("platform client not configured: {0}")]
    NotConfigured(String),
}

/// Errors from repository operations (used by trait definitions in bundler-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::NoOptionValueSelected {
            option_name: "Size".to_string(),
        };
        assert_eq!(err.to_string(), "At least one Size must be selected");
        assert_eq!(ValidationError::MissingName.to_string(), "Bundle name is required");
    }

    #[test]
    fn test_validation_error_serializes_with_code() {
        let json = serde_json::to_value(ValidationError::InvalidDateRange).unwrap();
        assert_eq!(json["code"], "invalid_date_range");
    }

    #[test]
    fn test_platform_user_error_is_verbatim() {
        let err = PlatformError::UserError {
            field: Some(vec!["input".to_string(), "title".to_string()]),
            message: "Title can't be blank".to_string(),
        };
        assert_eq!(err.to_string(), "Title can't be blank");
    }

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }
}
