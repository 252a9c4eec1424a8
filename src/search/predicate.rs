//! Filter tree compilation
//!
//! Groups (`AND`/`OR`) compile every child eagerly and combine the results.
//! Leaves run, in order:
//! 1. field present
//! 2. path authorized
//! 3. join prefix resolved (root when absent)
//! 4. operator dispatch against the terminal field's kind
//!
//! Unrecognized operator tags are rejected before any of these checks.

use super::context::{Comparison, FieldRef, QueryContext};
use super::errors::{FilterError, FilterResult};
use super::joins::JoinResolver;
use super::request::{FilterExpression, QueryOperator};
use super::value::{coerce, coerce_list, BooleanCoercion};
use crate::model::{resolve_path, EntityRegistry};

/// Compiles filter expressions for one root entity
pub struct PredicateCompiler<'a> {
    registry: &'a EntityRegistry,
    entity: &'a str,
    booleans: BooleanCoercion,
}

impl<'a> PredicateCompiler<'a> {
    pub fn new(registry: &'a EntityRegistry, entity: &'a str, booleans: BooleanCoercion) -> Self {
        Self {
            registry,
            entity,
            booleans,
        }
    }

    /// Compiles `filters` and combines them with `combine` (`AND` / `OR`).
    ///
    /// Children are compiled before the combinator is checked; the first
    /// failure aborts the whole compile.
    pub fn compile_all<C: QueryContext>(
        &self,
        ctx: &mut C,
        joins: &mut JoinResolver<C::Join>,
        filters: &[FilterExpression],
        combine: &QueryOperator,
    ) -> FilterResult<C::Predicate> {
        let predicates = filters
            .iter()
            .map(|filter| self.compile(ctx, joins, filter))
            .collect::<FilterResult<Vec<_>>>()?;

        match combine {
            QueryOperator::And => Ok(ctx.and(predicates)),
            QueryOperator::Or => Ok(ctx.or(predicates)),
            other => Err(FilterError::illegal_operator(other.as_str())),
        }
    }

    /// Compiles one node of the filter tree
    pub fn compile<C: QueryContext>(
        &self,
        ctx: &mut C,
        joins: &mut JoinResolver<C::Join>,
        filter: &FilterExpression,
    ) -> FilterResult<C::Predicate> {
        if let QueryOperator::Unrecognized(tag) = &filter.operator {
            return Err(FilterError::illegal_operator(tag));
        }

        if filter.operator.is_group() {
            let children = match filter.filters.as_deref() {
                Some(children) if !children.is_empty() => children,
                _ => return Err(FilterError::filters_cannot_be_empty()),
            };
            return self.compile_all(ctx, joins, children, &filter.operator);
        }

        self.compile_leaf(ctx, joins, filter)
    }

    fn compile_leaf<C: QueryContext>(
        &self,
        ctx: &mut C,
        joins: &mut JoinResolver<C::Join>,
        filter: &FilterExpression,
    ) -> FilterResult<C::Predicate> {
        let path = filter
            .field
            .as_deref()
            .ok_or_else(FilterError::field_cannot_be_null)?;

        let resolved = resolve_path(self.registry, self.entity, path)
            .ok_or_else(|| FilterError::not_allowed_for_filtering(path))?;

        let source = if resolved.joins.is_empty() {
            None
        } else {
            let handle = joins
                .resolve(ctx, &resolved.joins)
                .ok_or_else(|| FilterError::not_allowed_for_filtering(path))?;
            Some(handle)
        };

        let field = FieldRef {
            source: source.as_ref(),
            name: resolved.field.name.as_str(),
        };
        let kind = &resolved.field.kind;
        let value = || coerce(kind, filter.value.as_deref(), self.booleans).map_err(|e| e.at_field(path));
        let values = || coerce_list(kind, filter.values.as_deref(), self.booleans).map_err(|e| e.at_field(path));

        let predicate = match &filter.operator {
            QueryOperator::Equals => ctx.compare(field, Comparison::Equal, value()?),
            QueryOperator::NotEquals => ctx.compare(field, Comparison::NotEqual, value()?),
            QueryOperator::LessThan => ctx.compare(field, Comparison::LessThan, value()?),
            QueryOperator::GreaterThan => ctx.compare(field, Comparison::GreaterThan, value()?),
            QueryOperator::LessThanOrEqual => {
                ctx.compare(field, Comparison::LessThanOrEqual, value()?)
            }
            QueryOperator::GreaterThanOrEqual => {
                ctx.compare(field, Comparison::GreaterThanOrEqual, value()?)
            }
            QueryOperator::Like => {
                let raw = filter
                    .value
                    .as_deref()
                    .ok_or_else(|| FilterError::value_cannot_be_null().at_field(path))?;
                ctx.like(field, format!("%{}%", raw))
            }
            QueryOperator::In => ctx.in_list(field, values()?),
            QueryOperator::NotIn => {
                let members = ctx.in_list(field, values()?);
                ctx.not(members)
            }
            QueryOperator::Null => ctx.is_null(field),
            QueryOperator::NotNull => ctx.is_not_null(field),
            other => return Err(FilterError::illegal_operator(other.as_str())),
        };

        Ok(predicate)
    }
}
