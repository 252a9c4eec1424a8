//! Field access policy resolution
//!
//! A dotted path is walked segment by segment:
//! - each segment matches a canonical field name, then a declared alias
//! - a field without an access policy is never accessible
//! - the terminal segment must NOT be joinable
//! - every other segment must be joinable and continues in the related
//!   entity (the element entity for to-many relations)
//!
//! The same policy governs filtering and sorting.

use super::registry::EntityRegistry;
use super::types::FieldDescriptor;

/// An authorized path with aliases replaced by canonical names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath<'r> {
    /// Canonical relation names leading to the terminal field
    pub joins: Vec<&'r str>,
    /// Terminal field
    pub field: &'r FieldDescriptor,
}

impl<'r> ResolvedPath<'r> {
    /// Canonical dotted join path, `None` when the field is on the root
    pub fn join_path(&self) -> Option<String> {
        if self.joins.is_empty() {
            None
        } else {
            Some(self.joins.join("."))
        }
    }

    /// Canonical dotted path including the terminal field
    pub fn canonical(&self) -> String {
        match self.join_path() {
            Some(join) => format!("{}.{}", join, self.field.name),
            None => self.field.name.clone(),
        }
    }
}

/// Returns whether `path` may be used for filtering or sorting on `entity`
pub fn is_authorized(registry: &EntityRegistry, entity: &str, path: &str) -> bool {
    resolve_path(registry, entity, path).is_some()
}

/// Resolves an authorized path, returning `None` when it is not accessible
pub fn resolve_path<'r>(
    registry: &'r EntityRegistry,
    entity: &str,
    path: &str,
) -> Option<ResolvedPath<'r>> {
    if path.is_empty() {
        return None;
    }

    let mut joins = Vec::new();
    let mut current = registry.get(entity)?;
    let mut rest = path;

    loop {
        let (name, next) = match rest.find('.') {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => (rest, ""),
        };

        let field = current.find_field(name)?;
        let access = field.access.as_ref()?;

        if next.is_empty() {
            // A relation is never a target itself, only its sub-fields are
            return if access.joinable {
                None
            } else {
                Some(ResolvedPath { joins, field })
            };
        }

        if !access.joinable {
            return None;
        }

        current = registry.get(field.kind.relation_target()?)?;
        joins.push(field.name.as_str());
        rest = next;
    }
}
