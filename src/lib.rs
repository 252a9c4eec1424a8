//! searchkit - a policy-checked filter and sort compiler for entity models
//!
//! Client search requests (filter trees and sort lists) are validated
//! against per-field access policies and compiled into backend predicates
//! and orderings through a [`search::QueryContext`].

pub mod cli;
pub mod criteria;
pub mod model;
pub mod observability;
pub mod search;
