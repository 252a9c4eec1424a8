//! Search compilation errors
//!
//! Error codes (all REJECT, the caller maps them to a response):
//! - ILLEGAL_ARGUMENT
//! - VALUE_CANNOT_BE_NULL
//! - VALUES_CANNOT_BE_NULL
//! - ILLEGAL_OPERATOR
//! - FIELD_IS_NOT_ALLOWED_FOR_FILTERING
//! - FIELD_IS_NOT_ALLOWED_FOR_SORTING
//! - FIELD_CANNOT_BE_NULL
//! - FILTERS_CANNOT_BE_EMPTY

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Closed set of compile failure codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterErrorCode {
    /// Value(s) do not match the type of the target field
    IllegalArgument,
    /// `value` is required by the operator
    ValueCannotBeNull,
    /// `values` is required by the operator
    ValuesCannotBeNull,
    /// Operator is unknown or not valid in this position
    IllegalOperator,
    /// Path is not accessible for filtering
    FieldIsNotAllowedForFiltering,
    /// Path is not accessible for sorting
    FieldIsNotAllowedForSorting,
    /// Leaf filter without a field
    FieldCannotBeNull,
    /// Group filter without children
    FiltersCannotBeEmpty,
}

impl FilterErrorCode {
    /// Returns the wire tag of this code
    pub fn code(&self) -> &'static str {
        match self {
            FilterErrorCode::IllegalArgument => "ILLEGAL_ARGUMENT",
            FilterErrorCode::ValueCannotBeNull => "VALUE_CANNOT_BE_NULL",
            FilterErrorCode::ValuesCannotBeNull => "VALUES_CANNOT_BE_NULL",
            FilterErrorCode::IllegalOperator => "ILLEGAL_OPERATOR",
            FilterErrorCode::FieldIsNotAllowedForFiltering => "FIELD_IS_NOT_ALLOWED_FOR_FILTERING",
            FilterErrorCode::FieldIsNotAllowedForSorting => "FIELD_IS_NOT_ALLOWED_FOR_SORTING",
            FilterErrorCode::FieldCannotBeNull => "FIELD_CANNOT_BE_NULL",
            FilterErrorCode::FiltersCannotBeEmpty => "FILTERS_CANNOT_BE_EMPTY",
        }
    }
}

impl fmt::Display for FilterErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Compile error with context
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[REJECT] {code}: {message}")]
pub struct FilterError {
    code: FilterErrorCode,
    message: String,
    field: Option<String>,
}

impl FilterError {
    /// Create an error from a bare code
    pub fn new(code: FilterErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    fn with_field(code: FilterErrorCode, message: String, field: &str) -> Self {
        Self {
            code,
            message,
            field: Some(field.to_string()),
        }
    }

    /// Value could not be parsed into the field's kind
    pub fn illegal_argument(kind: &str, raw: &str) -> Self {
        Self::new(
            FilterErrorCode::IllegalArgument,
            format!("'{}' is not a valid {} value", raw, kind),
        )
    }

    /// Single value missing
    pub fn value_cannot_be_null() -> Self {
        Self::new(FilterErrorCode::ValueCannotBeNull, "Filter value is required")
    }

    /// Value list missing
    pub fn values_cannot_be_null() -> Self {
        Self::new(FilterErrorCode::ValuesCannotBeNull, "Filter values are required")
    }

    /// Operator not valid here
    pub fn illegal_operator(operator: &str) -> Self {
        Self::new(
            FilterErrorCode::IllegalOperator,
            format!("Operator '{}' is not allowed here", operator),
        )
    }

    pub fn not_allowed_for_filtering(field: &str) -> Self {
        Self::with_field(
            FilterErrorCode::FieldIsNotAllowedForFiltering,
            format!("Field '{}' is not allowed for filtering", field),
            field,
        )
    }

    pub fn not_allowed_for_sorting(field: &str) -> Self {
        Self::with_field(
            FilterErrorCode::FieldIsNotAllowedForSorting,
            format!("Field '{}' is not allowed for sorting", field),
            field,
        )
    }

    /// Leaf without field
    pub fn field_cannot_be_null() -> Self {
        Self::new(FilterErrorCode::FieldCannotBeNull, "Filter field is required")
    }

    /// Group without children
    pub fn filters_cannot_be_empty() -> Self {
        Self::new(
            FilterErrorCode::FiltersCannotBeEmpty,
            "Grouped filters cannot be empty",
        )
    }

    /// Attach the offending field path if none is set yet
    pub fn at_field(mut self, field: &str) -> Self {
        if self.field.is_none() {
            self.field = Some(field.to_string());
        }
        self
    }

    /// Returns the error code
    pub fn code(&self) -> FilterErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field path if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

/// Result type for search compilation
pub type FilterResult<T> = Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_match_wire_tags() {
        assert_eq!(FilterErrorCode::IllegalArgument.code(), "ILLEGAL_ARGUMENT");
        assert_eq!(FilterErrorCode::ValueCannotBeNull.code(), "VALUE_CANNOT_BE_NULL");
        assert_eq!(FilterErrorCode::ValuesCannotBeNull.code(), "VALUES_CANNOT_BE_NULL");
        assert_eq!(FilterErrorCode::IllegalOperator.code(), "ILLEGAL_OPERATOR");
        assert_eq!(
            FilterErrorCode::FieldIsNotAllowedForFiltering.code(),
            "FIELD_IS_NOT_ALLOWED_FOR_FILTERING"
        );
        assert_eq!(
            FilterErrorCode::FieldIsNotAllowedForSorting.code(),
            "FIELD_IS_NOT_ALLOWED_FOR_SORTING"
        );
        assert_eq!(FilterErrorCode::FieldCannotBeNull.code(), "FIELD_CANNOT_BE_NULL");
        assert_eq!(FilterErrorCode::FiltersCannotBeEmpty.code(), "FILTERS_CANNOT_BE_EMPTY");
    }

    #[test]
    fn test_serialized_code_matches_tag() {
        let json = serde_json::to_string(&FilterErrorCode::FieldIsNotAllowedForSorting).unwrap();
        assert_eq!(json, "\"FIELD_IS_NOT_ALLOWED_FOR_SORTING\"");
    }

    #[test]
    fn test_error_display() {
        let err = FilterError::not_allowed_for_filtering("secret");
        let display = format!("{}", err);
        assert!(display.contains("REJECT"));
        assert!(display.contains("FIELD_IS_NOT_ALLOWED_FOR_FILTERING"));
        assert!(display.contains("secret"));
        assert_eq!(err.field(), Some("secret"));
    }

    #[test]
    fn test_at_field_keeps_existing() {
        let err = FilterError::not_allowed_for_sorting("a.b").at_field("c");
        assert_eq!(err.field(), Some("a.b"));

        let err = FilterError::value_cannot_be_null().at_field("age");
        assert_eq!(err.field(), Some("age"));
    }
}
