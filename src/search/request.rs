//! Search request types
//!
//! Wire shape (JSON):
//!
//! ```text
//! SearchRequest    { filters?: [FilterExpression], sorts?: [SortSpecification] }
//! FilterExpression { operator, field?, value?, values?, filters? }
//! SortSpecification{ field, order: "ASC" | "DESC" = "ASC" }
//! ```
//!
//! A node whose operator is `AND`/`OR` is a group over `filters`; any other
//! operator makes it a leaf on `field`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Filter operator tags (case-sensitive)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum QueryOperator {
    Equals,
    NotEquals,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
    /// Substring match on raw text
    Like,
    In,
    NotIn,
    Null,
    NotNull,
    Or,
    And,
    /// Any tag outside the vocabulary, rejected at compile time
    Unrecognized(String),
}

impl QueryOperator {
    /// Returns the wire tag
    pub fn as_str(&self) -> &str {
        match self {
            QueryOperator::Equals => "EQUALS",
            QueryOperator::NotEquals => "NOT_EQUALS",
            QueryOperator::LessThan => "LESS_THAN",
            QueryOperator::GreaterThan => "GREATER_THAN",
            QueryOperator::LessThanOrEqual => "LESS_THAN_OR_EQUAL",
            QueryOperator::GreaterThanOrEqual => "GREATER_THAN_OR_EQUAL",
            QueryOperator::Like => "LIKE",
            QueryOperator::In => "IN",
            QueryOperator::NotIn => "NOT_IN",
            QueryOperator::Null => "NULL",
            QueryOperator::NotNull => "NOT_NULL",
            QueryOperator::Or => "OR",
            QueryOperator::And => "AND",
            QueryOperator::Unrecognized(tag) => tag,
        }
    }

    /// Returns true for `AND` / `OR`
    pub fn is_group(&self) -> bool {
        matches!(self, QueryOperator::And | QueryOperator::Or)
    }
}

impl From<&str> for QueryOperator {
    fn from(tag: &str) -> Self {
        match tag {
            "EQUALS" => QueryOperator::Equals,
            "NOT_EQUALS" => QueryOperator::NotEquals,
            "LESS_THAN" => QueryOperator::LessThan,
            "GREATER_THAN" => QueryOperator::GreaterThan,
            "LESS_THAN_OR_EQUAL" => QueryOperator::LessThanOrEqual,
            "GREATER_THAN_OR_EQUAL" => QueryOperator::GreaterThanOrEqual,
            "LIKE" => QueryOperator::Like,
            "IN" => QueryOperator::In,
            "NOT_IN" => QueryOperator::NotIn,
            "NULL" => QueryOperator::Null,
            "NOT_NULL" => QueryOperator::NotNull,
            "OR" => QueryOperator::Or,
            "AND" => QueryOperator::And,
            other => QueryOperator::Unrecognized(other.to_string()),
        }
    }
}

impl From<String> for QueryOperator {
    fn from(tag: String) -> Self {
        QueryOperator::from(tag.as_str())
    }
}

impl From<QueryOperator> for String {
    fn from(op: QueryOperator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One node of a filter expression tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterExpression {
    /// Leaf comparison or group combinator
    pub operator: QueryOperator,

    /// Dotted field path (leaves)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Single operand (leaves)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// List operand for `IN` / `NOT_IN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,

    /// Children (groups)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterExpression>>,
}

impl FilterExpression {
    /// Create a node with only an operator
    pub fn new(operator: QueryOperator) -> Self {
        Self {
            operator,
            field: None,
            value: None,
            values: None,
            filters: None,
        }
    }

    /// Create a leaf on `field`
    pub fn leaf(operator: QueryOperator, field: impl Into<String>) -> Self {
        Self::new(operator).with_field(field)
    }

    /// Create an `AND` group
    pub fn and(children: Vec<FilterExpression>) -> Self {
        Self::new(QueryOperator::And).with_filters(children)
    }

    /// Create an `OR` group
    pub fn or(children: Vec<FilterExpression>) -> Self {
        Self::new(QueryOperator::Or).with_filters(children)
    }

    /// Create an `EQUALS` leaf
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::leaf(QueryOperator::Equals, field).with_value(value)
    }

    /// Create an `IN` leaf
    pub fn in_list<I, S>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::leaf(QueryOperator::In, field).with_values(values)
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_filters(mut self, filters: Vec<FilterExpression>) -> Self {
        self.filters = Some(filters);
        self
    }

    /// Join path: everything before the last dot, `None` without a dot
    pub fn join_path(&self) -> Option<&str> {
        self.field.as_deref().and_then(|f| split_path(f).0)
    }

    /// Field name: everything after the last dot
    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref().map(|f| split_path(f).1)
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// One sort instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpecification {
    /// Dotted field path
    pub field: String,
    /// Direction, ascending when absent
    #[serde(default)]
    pub order: SortOrder,
}

impl SortSpecification {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }

    pub fn join_path(&self) -> Option<&str> {
        split_path(&self.field).0
    }

    pub fn field_name(&self) -> &str {
        split_path(&self.field).1
    }
}

/// Full search request as received from a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<Vec<FilterExpression>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorts: Option<Vec<SortSpecification>>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: FilterExpression) -> Self {
        self.filters.get_or_insert_with(Vec::new).push(filter);
        self
    }

    pub fn with_sort(mut self, sort: SortSpecification) -> Self {
        self.sorts.get_or_insert_with(Vec::new).push(sort);
        self
    }
}

/// Splits a dotted path on its last dot into (join path, field name)
pub fn split_path(path: &str) -> (Option<&str>, &str) {
    match path.rfind('.') {
        Some(idx) => (Some(&path[..idx]), &path[idx + 1..]),
        None => (None, path),
    }
}
