//! Search compilation entry point
//!
//! [`SearchCompiler::compile`] runs one compile with a fresh
//! [`JoinResolver`] in a fixed order:
//! 1. join set-up hook
//! 2. access-control hook (extra predicates)
//! 3. filters, skipped when absent or empty
//! 4. sorts, skipped when absent or empty
//!
//! Hook predicates and the filter predicate are combined with AND.

use serde::Serialize;

use super::config::CompilerConfig;
use super::context::QueryContext;
use super::errors::{FilterError, FilterResult};
use super::joins::JoinResolver;
use super::order::OrderCompiler;
use super::predicate::PredicateCompiler;
use super::request::{FilterExpression, QueryOperator, SearchRequest, SortSpecification};
use crate::model::EntityRegistry;
use crate::observability::{log_event_with_fields, Event};

/// Per-compile extension points.
///
/// Both hooks default to doing nothing.
pub trait SearchHooks<C: QueryContext> {
    /// Runs before anything else; may register join handles
    fn setup_joins(&mut self, _ctx: &mut C, _joins: &mut JoinResolver<C::Join>) -> FilterResult<()> {
        Ok(())
    }

    /// Returns predicates ANDed with the request's filters
    fn access_predicates(
        &mut self,
        _ctx: &mut C,
        _joins: &mut JoinResolver<C::Join>,
    ) -> FilterResult<Vec<C::Predicate>> {
        Ok(Vec::new())
    }
}

/// Hooks that do nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl<C: QueryContext> SearchHooks<C> for NoHooks {}

/// Output of one compile
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledSearch<P, O> {
    /// Combined predicate, `None` when nothing restricts the query
    pub predicate: Option<P>,
    /// Ordering in request order
    pub orders: Vec<O>,
    /// Distinct join paths used
    pub join_count: usize,
}

/// Compiles search requests against a model registry
#[derive(Debug, Clone, Copy)]
pub struct SearchCompiler<'a> {
    registry: &'a EntityRegistry,
    config: &'a CompilerConfig,
}

impl<'a> SearchCompiler<'a> {
    pub fn new(registry: &'a EntityRegistry, config: &'a CompilerConfig) -> Self {
        Self { registry, config }
    }

    /// AND of the top-level filter list
    pub fn compile_predicate<C: QueryContext>(
        &self,
        entity: &str,
        ctx: &mut C,
        filters: &[FilterExpression],
    ) -> FilterResult<C::Predicate> {
        let mut joins = self.resolver();
        self.predicates(entity)
            .compile_all(ctx, &mut joins, filters, &QueryOperator::And)
    }

    pub fn compile_order<C: QueryContext>(
        &self,
        entity: &str,
        ctx: &mut C,
        sorts: &[SortSpecification],
    ) -> FilterResult<Vec<C::Order>> {
        let mut joins = self.resolver();
        OrderCompiler::new(self.registry, entity).compile_all(ctx, &mut joins, sorts)
    }

    /// Compiles a full request. Filters and sorts share one join resolver.
    pub fn compile<C, H>(
        &self,
        entity: &str,
        ctx: &mut C,
        request: &SearchRequest,
        hooks: &mut H,
    ) -> FilterResult<CompiledSearch<C::Predicate, C::Order>>
    where
        C: QueryContext,
        H: SearchHooks<C>,
    {
        if self.config.log_compiles {
            let filters = request.filters.as_ref().map_or(0, Vec::len).to_string();
            let sorts = request.sorts.as_ref().map_or(0, Vec::len).to_string();
            log_event_with_fields(
                Event::CompileStart,
                &[("entity", entity), ("filters", filters.as_str()), ("sorts", sorts.as_str())],
            );
        }

        let result = self.compile_request(entity, ctx, request, hooks);

        if self.config.log_compiles {
            match &result {
                Ok(compiled) => {
                    let joins = compiled.join_count.to_string();
                    let orders = compiled.orders.len().to_string();
                    log_event_with_fields(
                        Event::CompileComplete,
                        &[("entity", entity), ("joins", joins.as_str()), ("orders", orders.as_str())],
                    );
                }
                Err(err) => log_rejected(entity, err),
            }
        }

        result
    }

    fn compile_request<C, H>(
        &self,
        entity: &str,
        ctx: &mut C,
        request: &SearchRequest,
        hooks: &mut H,
    ) -> FilterResult<CompiledSearch<C::Predicate, C::Order>>
    where
        C: QueryContext,
        H: SearchHooks<C>,
    {
        let mut joins = self.resolver();

        hooks.setup_joins(ctx, &mut joins)?;
        let mut predicates = hooks.access_predicates(ctx, &mut joins)?;

        if let Some(filters) = request.filters.as_deref().filter(|f| !f.is_empty()) {
            let predicate = self
                .predicates(entity)
                .compile_all(ctx, &mut joins, filters, &QueryOperator::And)?;
            predicates.push(predicate);
        }

        let orders = match request.sorts.as_deref().filter(|s| !s.is_empty()) {
            Some(sorts) => OrderCompiler::new(self.registry, entity).compile_all(ctx, &mut joins, sorts)?,
            None => Vec::new(),
        };

        let predicate = match predicates.len() {
            0 => None,
            1 => predicates.pop(),
            _ => Some(ctx.and(predicates)),
        };

        Ok(CompiledSearch {
            predicate,
            orders,
            join_count: joins.len(),
        })
    }

    fn predicates<'e>(&self, entity: &'e str) -> PredicateCompiler<'e>
    where
        'a: 'e,
    {
        PredicateCompiler::new(self.registry, entity, self.config.boolean_coercion)
    }

    fn resolver<J: Clone>(&self) -> JoinResolver<J> {
        JoinResolver::new(self.config.join_strategy).with_logging(self.config.log_compiles)
    }
}

fn log_rejected(entity: &str, err: &FilterError) {
    let code = err.code().code();
    match err.field() {
        Some(field) => log_event_with_fields(
            Event::CompileRejected,
            &[("code", code), ("entity", entity), ("field", field)],
        ),
        None => log_event_with_fields(Event::CompileRejected, &[("code", code), ("entity", entity)]),
    }
}
