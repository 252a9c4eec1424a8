//! Search compiler subsystem
//!
//! Turns client filter trees and sort lists into backend predicates and
//! orderings through a [`QueryContext`].
//!
//! # Design Principles
//!
//! - Authorized: every path is checked against the field access policy
//! - Fail-fast: the first rejected node aborts the whole compile
//! - Shared joins: one handle per canonical join path per compile
//! - Backend-neutral: all constructs come from the context
//!
//! # Leaf compile order (strict)
//!
//! 1. Operator recognized
//! 2. Field present
//! 3. Path authorized
//! 4. Join prefix resolved
//! 5. Value(s) coerced to the terminal field's kind

mod config;
mod context;
mod errors;
mod joins;
mod order;
mod predicate;
mod request;
mod specification;
mod value;

pub use config::{CompilerConfig, ConfigError, JoinStrategy};
pub use context::{Comparison, FieldRef, QueryContext};
pub use errors::{FilterError, FilterErrorCode, FilterResult};
pub use joins::JoinResolver;
pub use order::OrderCompiler;
pub use predicate::PredicateCompiler;
pub use request::{
    split_path, FilterExpression, QueryOperator, SearchRequest, SortOrder, SortSpecification,
};
pub use specification::{CompiledSearch, NoHooks, SearchCompiler, SearchHooks};
pub use value::{coerce, coerce_list, BooleanCoercion, Value};
