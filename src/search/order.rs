//! Sort specification compilation
//!
//! Sorts share the filter access policy and the join resolver of the
//! compile. Output order matches input order.

use super::context::{FieldRef, QueryContext};
use super::errors::{FilterError, FilterResult};
use super::joins::JoinResolver;
use super::request::{SortOrder, SortSpecification};
use crate::model::{resolve_path, EntityRegistry};

/// Compiles sort specifications for one root entity
pub struct OrderCompiler<'a> {
    registry: &'a EntityRegistry,
    entity: &'a str,
}

impl<'a> OrderCompiler<'a> {
    pub fn new(registry: &'a EntityRegistry, entity: &'a str) -> Self {
        Self { registry, entity }
    }

    /// Compiles every sort; the first unauthorized field aborts
    pub fn compile_all<C: QueryContext>(
        &self,
        ctx: &mut C,
        joins: &mut JoinResolver<C::Join>,
        sorts: &[SortSpecification],
    ) -> FilterResult<Vec<C::Order>> {
        sorts.iter().map(|sort| self.compile(ctx, joins, sort)).collect()
    }

    pub fn compile<C: QueryContext>(
        &self,
        ctx: &mut C,
        joins: &mut JoinResolver<C::Join>,
        sort: &SortSpecification,
    ) -> FilterResult<C::Order> {
        let path = sort.field.as_str();
        let resolved = resolve_path(self.registry, self.entity, path)
            .ok_or_else(|| FilterError::not_allowed_for_sorting(path))?;

        let source = if resolved.joins.is_empty() {
            None
        } else {
            let handle = joins
                .resolve(ctx, &resolved.joins)
                .ok_or_else(|| FilterError::not_allowed_for_sorting(path))?;
            Some(handle)
        };

        let field = FieldRef {
            source: source.as_ref(),
            name: resolved.field.name.as_str(),
        };

        Ok(match sort.order {
            SortOrder::Asc => ctx.asc(field),
            SortOrder::Desc => ctx.desc(field),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::CriteriaBuilder;
    use crate::model::{EntityDescriptor, FieldAccess, FieldDescriptor, ValueKind};
    use crate::search::config::JoinStrategy;
    use crate::search::errors::FilterErrorCode;

    fn registry() -> EntityRegistry {
        let owners = EntityDescriptor::new("owners")
            .with_field(FieldDescriptor::accessible("name", ValueKind::String, FieldAccess::filterable()))
            .with_field(FieldDescriptor::hidden("ssn", ValueKind::String));
        let pets = EntityDescriptor::new("pets")
            .with_field(FieldDescriptor::accessible(
                "age",
                ValueKind::Int32,
                FieldAccess::filterable().with_alias("years"),
            ))
            .with_field(FieldDescriptor::accessible(
                "owner",
                ValueKind::RelationToOne {
                    target: "owners".into(),
                },
                FieldAccess::joinable(),
            ));

        EntityRegistry::new()
            .with_entity(owners)
            .and_then(|r| r.with_entity(pets))
            .unwrap()
    }

    fn compile(sorts: &[SortSpecification]) -> FilterResult<(Vec<String>, CriteriaBuilder)> {
        let registry = registry();
        let compiler = OrderCompiler::new(&registry, "pets");
        let mut ctx = CriteriaBuilder::new("pets");
        let mut joins = JoinResolver::new(JoinStrategy::OnDemand);
        let orders = compiler.compile_all(&mut ctx, &mut joins, sorts)?;
        Ok((orders.iter().map(|o| o.to_string()).collect(), ctx))
    }

    #[test]
    fn test_preserves_input_order() {
        let (orders, ctx) = compile(&[
            SortSpecification::desc("owner.name"),
            SortSpecification::asc("years"),
        ])
        .unwrap();

        assert_eq!(orders, vec!["j1.name DESC", "t.age ASC"]);
        assert_eq!(ctx.from_clause(), "FROM pets t JOIN t.owner j1");
    }

    #[test]
    fn test_repeated_join_is_shared() {
        let (orders, ctx) = compile(&[
            SortSpecification::asc("owner.name"),
            SortSpecification::desc("owner.name"),
        ])
        .unwrap();

        assert_eq!(orders.len(), 2);
        assert_eq!(ctx.joins().len(), 1);
    }

    #[test]
    fn test_unauthorized_sort_field() {
        for path in ["owner.ssn", "owner", "color", ""] {
            let err = compile(&[SortSpecification::asc(path)]).unwrap_err();
            assert_eq!(err.code(), FilterErrorCode::FieldIsNotAllowedForSorting, "{}", path);
        }
    }

    #[test]
    fn test_empty_sorts() {
        let (orders, ctx) = compile(&[]).unwrap();
        assert!(orders.is_empty());
        assert!(ctx.joins().is_empty());
    }
}
