//! In-memory query context
//!
//! Records joins and builds [`Criterion`] / [`OrderClause`] values instead
//! of backend objects. Useful for rendering, inspection and tests.

use super::ast::{Column, Criterion, JoinHandle, JoinNode, OrderClause, ROOT_ALIAS};
use crate::search::{Comparison, FieldRef, QueryContext, SortOrder, Value};

/// Query context building a criterion tree for one root entity
#[derive(Debug, Clone)]
pub struct CriteriaBuilder {
    root: String,
    joins: Vec<JoinNode>,
}

impl CriteriaBuilder {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            joins: Vec::new(),
        }
    }

    /// Root entity name
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Joins in creation order
    pub fn joins(&self) -> &[JoinNode] {
        &self.joins
    }

    /// `FROM <root> t JOIN t.<relation> j1 ...`
    pub fn from_clause(&self) -> String {
        let mut clause = format!("FROM {} {}", self.root, ROOT_ALIAS);
        for join in &self.joins {
            clause.push(' ');
            clause.push_str(&join.to_string());
        }
        clause
    }

    fn column(field: FieldRef<'_, JoinHandle>) -> Column {
        Column {
            source: field.source.copied(),
            field: field.name.to_string(),
        }
    }
}

impl QueryContext for CriteriaBuilder {
    type Join = JoinHandle;
    type Predicate = Criterion;
    type Order = OrderClause;

    fn join(&mut self, parent: Option<&JoinHandle>, relation: &str) -> JoinHandle {
        let handle = JoinHandle(self.joins.len());
        self.joins.push(JoinNode {
            handle,
            parent: parent.copied(),
            relation: relation.to_string(),
        });
        handle
    }

    fn compare(&mut self, field: FieldRef<'_, JoinHandle>, op: Comparison, value: Value) -> Criterion {
        Criterion::Compare {
            column: Self::column(field),
            op,
            value,
        }
    }

    fn like(&mut self, field: FieldRef<'_, JoinHandle>, pattern: String) -> Criterion {
        Criterion::Like {
            column: Self::column(field),
            pattern,
        }
    }

    fn in_list(&mut self, field: FieldRef<'_, JoinHandle>, values: Vec<Value>) -> Criterion {
        Criterion::In {
            column: Self::column(field),
            values,
        }
    }

    fn is_null(&mut self, field: FieldRef<'_, JoinHandle>) -> Criterion {
        Criterion::IsNull {
            column: Self::column(field),
        }
    }

    fn is_not_null(&mut self, field: FieldRef<'_, JoinHandle>) -> Criterion {
        Criterion::IsNotNull {
            column: Self::column(field),
        }
    }

    fn not(&mut self, predicate: Criterion) -> Criterion {
        Criterion::Not {
            criterion: Box::new(predicate),
        }
    }

    fn and(&mut self, predicates: Vec<Criterion>) -> Criterion {
        Criterion::And { all: predicates }
    }

    fn or(&mut self, predicates: Vec<Criterion>) -> Criterion {
        Criterion::Or { any: predicates }
    }

    fn asc(&mut self, field: FieldRef<'_, JoinHandle>) -> OrderClause {
        OrderClause {
            column: Self::column(field),
            direction: SortOrder::Asc,
        }
    }

    fn desc(&mut self, field: FieldRef<'_, JoinHandle>) -> OrderClause {
        OrderClause {
            column: Self::column(field),
            direction: SortOrder::Desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_handles_are_sequential() {
        let mut ctx = CriteriaBuilder::new("pets");
        let owner = ctx.join(None, "owner");
        let address = ctx.join(Some(&owner), "address");

        assert_eq!(owner.index(), 0);
        assert_eq!(address.index(), 1);
        assert_eq!(
            ctx.from_clause(),
            "FROM pets t JOIN t.owner j1 JOIN j1.address j2"
        );
    }

    #[test]
    fn test_builds_criteria_on_joined_columns() {
        let mut ctx = CriteriaBuilder::new("pets");
        let owner = ctx.join(None, "owner");

        let name = ctx.compare(
            FieldRef::joined(&owner, "name"),
            Comparison::Equal,
            Value::String("Alice".into()),
        );
        let alive = ctx.is_null(FieldRef::root("diedAt"));
        let both = ctx.and(vec![name, alive]);

        assert_eq!(both.to_string(), "j1.name = 'Alice' AND t.diedAt IS NULL");

        let order = ctx.desc(FieldRef::joined(&owner, "name"));
        assert_eq!(order.to_string(), "j1.name DESC");
    }
}
