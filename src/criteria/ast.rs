//! Criterion tree produced by [`CriteriaBuilder`](super::CriteriaBuilder)
//!
//! Rendering is JPQL-like: the root is aliased `t`, joins `j1`, `j2`, ...

use std::fmt;

use serde::Serialize;

use crate::search::{Comparison, SortOrder, Value};

/// Alias of the query root in rendered output
pub const ROOT_ALIAS: &str = "t";

/// Opaque join handle, an index into the builder's join list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JoinHandle(pub(super) usize);

impl JoinHandle {
    pub fn index(&self) -> usize {
        self.0
    }

    /// Rendered alias (`j1` for the first join)
    pub fn alias(&self) -> String {
        format!("j{}", self.0 + 1)
    }
}

/// One joined relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinNode {
    pub handle: JoinHandle,
    /// Joined from, `None` for the root
    pub parent: Option<JoinHandle>,
    /// Canonical relation field name
    pub relation: String,
}

impl fmt::Display for JoinNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = self.parent.map_or_else(|| ROOT_ALIAS.to_string(), |p| p.alias());
        write!(f, "JOIN {}.{} {}", parent, self.relation, self.handle.alias())
    }
}

/// Field on the root or on a join
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub source: Option<JoinHandle>,
    pub field: String,
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            Some(join) => write!(f, "{}.{}", join.alias(), self.field),
            None => write!(f, "{}.{}", ROOT_ALIAS, self.field),
        }
    }
}

/// Boolean condition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Criterion {
    And { all: Vec<Criterion> },
    Or { any: Vec<Criterion> },
    Not { criterion: Box<Criterion> },
    Compare { column: Column, op: Comparison, value: Value },
    Like { column: Column, pattern: String },
    In { column: Column, values: Vec<Value> },
    IsNull { column: Column },
    IsNotNull { column: Column },
}

impl Criterion {
    /// Columns referenced anywhere in this tree, in visiting order
    pub fn columns(&self) -> Vec<&Column> {
        let mut out = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a Column>) {
        match self {
            Criterion::And { all: children } | Criterion::Or { any: children } => {
                for child in children {
                    child.collect_columns(out);
                }
            }
            Criterion::Not { criterion } => criterion.collect_columns(out),
            Criterion::Compare { column, .. }
            | Criterion::Like { column, .. }
            | Criterion::In { column, .. }
            | Criterion::IsNull { column }
            | Criterion::IsNotNull { column } => out.push(column),
        }
    }

    /// Renders as a bare `AND`/`OR` chain; single-child groups render as
    /// their child and are looked through
    fn is_compound(&self) -> bool {
        match self {
            Criterion::And { all: children } | Criterion::Or { any: children } => {
                match children.as_slice() {
                    [only] => only.is_compound(),
                    _ => children.len() > 1,
                }
            }
            _ => false,
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Criterion::And { all } => write_joined(f, all, " AND ", "TRUE"),
            Criterion::Or { any } => write_joined(f, any, " OR ", "FALSE"),
            Criterion::Not { criterion } => write!(f, "NOT ({})", criterion),
            Criterion::Compare { column, op, value } => {
                write!(f, "{} {} {}", column, op.symbol(), Literal(value))
            }
            Criterion::Like { column, pattern } => {
                write!(f, "{} LIKE {}", column, Quoted(pattern))
            }
            Criterion::In { column, values } => {
                write!(f, "{} IN (", column)?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", Literal(value))?;
                }
                write!(f, ")")
            }
            Criterion::IsNull { column } => write!(f, "{} IS NULL", column),
            Criterion::IsNotNull { column } => write!(f, "{} IS NOT NULL", column),
        }
    }
}

fn write_joined(
    f: &mut fmt::Formatter<'_>,
    children: &[Criterion],
    separator: &str,
    empty: &str,
) -> fmt::Result {
    if children.is_empty() {
        return write!(f, "{}", empty);
    }
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, "{}", separator)?;
        }
        if children.len() > 1 && child.is_compound() {
            write!(f, "({})", child)?;
        } else {
            write!(f, "{}", child)?;
        }
    }
    Ok(())
}

/// Ordering instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderClause {
    pub column: Column,
    pub direction: SortOrder,
}

impl fmt::Display for OrderClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.column, self.direction.as_str())
    }
}

struct Literal<'a>(&'a Value);

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Int8(_)
            | Value::Int16(_)
            | Value::Int32(_)
            | Value::Int64(_)
            | Value::Float32(_)
            | Value::Float64(_) => write!(f, "{}", self.0),
            Value::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            other => write!(f, "{}", Quoted(&other.to_string())),
        }
    }
}

struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0.replace('\'', "''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(field: &str) -> Column {
        Column {
            source: None,
            field: field.into(),
        }
    }

    #[test]
    fn test_compare_rendering() {
        let c = Criterion::Compare {
            column: root("age"),
            op: Comparison::GreaterThan,
            value: Value::Int32(18),
        };
        assert_eq!(c.to_string(), "t.age > 18");

        let c = Criterion::Compare {
            column: Column {
                source: Some(JoinHandle(0)),
                field: "name".into(),
            },
            op: Comparison::Equal,
            value: Value::String("O'Brien".into()),
        };
        assert_eq!(c.to_string(), "j1.name = 'O''Brien'");
    }

    #[test]
    fn test_nested_groups_are_parenthesized() {
        let c = Criterion::And {
            all: vec![
                Criterion::IsNotNull { column: root("email") },
                Criterion::Or {
                    any: vec![
                        Criterion::IsNull { column: root("deletedAt") },
                        Criterion::Compare {
                            column: root("active"),
                            op: Comparison::Equal,
                            value: Value::Boolean(true),
                        },
                    ],
                },
            ],
        };
        assert_eq!(
            c.to_string(),
            "t.email IS NOT NULL AND (t.deletedAt IS NULL OR t.active = TRUE)"
        );
        assert_eq!(c.columns().len(), 3);
    }

    #[test]
    fn test_empty_groups() {
        assert_eq!(Criterion::And { all: vec![] }.to_string(), "TRUE");
        assert_eq!(Criterion::Or { any: vec![] }.to_string(), "FALSE");
    }

    #[test]
    fn test_single_child_group_keeps_parentheses_when_nested() {
        let either = Criterion::Or {
            any: vec![
                Criterion::IsNull { column: root("a") },
                Criterion::IsNull { column: root("b") },
            ],
        };
        let c = Criterion::And {
            all: vec![
                Criterion::IsNull { column: root("c") },
                Criterion::And {
                    all: vec![Criterion::And { all: vec![either] }],
                },
            ],
        };
        assert_eq!(c.to_string(), "t.c IS NULL AND (t.a IS NULL OR t.b IS NULL)");
    }

    #[test]
    fn test_single_child_group_is_transparent() {
        let inner = Criterion::Or {
            any: vec![
                Criterion::IsNull { column: root("a") },
                Criterion::IsNull { column: root("b") },
            ],
        };
        let outer = Criterion::And { all: vec![inner] };
        assert_eq!(outer.to_string(), "t.a IS NULL OR t.b IS NULL");
    }

    #[test]
    fn test_in_and_not() {
        let c = Criterion::Not {
            criterion: Box::new(Criterion::In {
                column: root("status"),
                values: vec![Value::Enum("ACTIVE".into()), Value::Enum("BLOCKED".into())],
            }),
        };
        assert_eq!(c.to_string(), "NOT (t.status IN ('ACTIVE', 'BLOCKED'))");
    }

    #[test]
    fn test_join_and_order_rendering() {
        let join = JoinNode {
            handle: JoinHandle(1),
            parent: Some(JoinHandle(0)),
            relation: "address".into(),
        };
        assert_eq!(join.to_string(), "JOIN j1.address j2");

        let order = OrderClause {
            column: root("age"),
            direction: SortOrder::Desc,
        };
        assert_eq!(order.to_string(), "t.age DESC");
    }
}
