//! Reference query context
//!
//! [`CriteriaBuilder`] implements [`QueryContext`](crate::search::QueryContext)
//! by building a backend-neutral criterion tree. It renders as JPQL-like
//! text and serializes to JSON.

mod ast;
mod builder;

pub use ast::{Column, Criterion, JoinHandle, JoinNode, OrderClause, ROOT_ALIAS};
pub use builder::CriteriaBuilder;
