//! Query-build context supplied by the execution backend
//!
//! The compiler never builds backend constructs itself. It asks the context
//! for join handles, comparisons and combinators, and hands the results
//! back. All field names passed to the context are canonical.

use serde::Serialize;

use super::value::Value;

/// Ordinal and equality comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Comparison {
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl Comparison {
    /// SQL-style symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::Equal => "=",
            Comparison::NotEqual => "<>",
            Comparison::LessThan => "<",
            Comparison::GreaterThan => ">",
            Comparison::LessThanOrEqual => "<=",
            Comparison::GreaterThanOrEqual => ">=",
        }
    }
}

/// Reference to a field on the query root or on a joined relation
#[derive(Debug, PartialEq, Eq)]
pub struct FieldRef<'a, J> {
    /// Owning join, `None` for the query root
    pub source: Option<&'a J>,
    /// Canonical field name
    pub name: &'a str,
}

impl<'a, J> FieldRef<'a, J> {
    pub fn root(name: &'a str) -> Self {
        Self { source: None, name }
    }

    pub fn joined(join: &'a J, name: &'a str) -> Self {
        Self {
            source: Some(join),
            name,
        }
    }
}

impl<J> Clone for FieldRef<'_, J> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<J> Copy for FieldRef<'_, J> {}

/// Backend construct factory for one query
pub trait QueryContext {
    /// Relation traversal handle
    type Join: Clone;
    /// Boolean condition
    type Predicate;
    /// Ordering instruction
    type Order;

    /// Joins `relation` from the root (`parent == None`) or from a join
    fn join(&mut self, parent: Option<&Self::Join>, relation: &str) -> Self::Join;

    fn compare(&mut self, field: FieldRef<'_, Self::Join>, op: Comparison, value: Value) -> Self::Predicate;

    /// SQL `LIKE` with a complete pattern
    fn like(&mut self, field: FieldRef<'_, Self::Join>, pattern: String) -> Self::Predicate;

    /// Membership in a value set
    fn in_list(&mut self, field: FieldRef<'_, Self::Join>, values: Vec<Value>) -> Self::Predicate;

    fn is_null(&mut self, field: FieldRef<'_, Self::Join>) -> Self::Predicate;

    fn is_not_null(&mut self, field: FieldRef<'_, Self::Join>) -> Self::Predicate;

    fn not(&mut self, predicate: Self::Predicate) -> Self::Predicate;

    /// Conjunction; an empty list is always true
    fn and(&mut self, predicates: Vec<Self::Predicate>) -> Self::Predicate;

    /// Disjunction; an empty list is always false
    fn or(&mut self, predicates: Vec<Self::Predicate>) -> Self::Predicate;

    fn asc(&mut self, field: FieldRef<'_, Self::Join>) -> Self::Order;

    fn desc(&mut self, field: FieldRef<'_, Self::Join>) -> Self::Order;
}
