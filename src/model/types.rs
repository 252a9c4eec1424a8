//! Entity model definitions
//!
//! Supported value kinds:
//! - string, character, boolean
//! - int8 / int16 / int32 / int64
//! - float32 / float64
//! - date / datetime / time (ISO-8601 local)
//! - enum with declared symbolic names
//! - relation_to_one / relation_to_many (by target entity name)

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::errors::{RegistryError, RegistryResult};

/// Value kind of a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValueKind {
    String,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Boolean,
    Character,
    Date,
    #[serde(rename = "datetime")]
    DateTime,
    Time,
    /// Enumeration with case-sensitive symbolic names
    Enum { variants: Vec<String> },
    /// Single related entity
    RelationToOne { target: String },
    /// Collection of related entities, `target` is the element entity
    RelationToMany { target: String },
}

impl ValueKind {
    /// Returns the kind name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Int8 => "int8",
            ValueKind::Int16 => "int16",
            ValueKind::Int32 => "int32",
            ValueKind::Int64 => "int64",
            ValueKind::Float32 => "float32",
            ValueKind::Float64 => "float64",
            ValueKind::Boolean => "boolean",
            ValueKind::Character => "character",
            ValueKind::Date => "date",
            ValueKind::DateTime => "datetime",
            ValueKind::Time => "time",
            ValueKind::Enum { .. } => "enum",
            ValueKind::RelationToOne { .. } => "relation_to_one",
            ValueKind::RelationToMany { .. } => "relation_to_many",
        }
    }

    /// Returns the related entity name for relation kinds
    pub fn relation_target(&self) -> Option<&str> {
        match self {
            ValueKind::RelationToOne { target } | ValueKind::RelationToMany { target } => {
                Some(target)
            }
            _ => None,
        }
    }

    pub fn is_relation(&self) -> bool {
        self.relation_target().is_some()
    }
}

/// Access policy attached to a field
///
/// The canonical field name is always an implicit alias.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAccess {
    /// Additional names the field may be addressed by
    #[serde(default)]
    pub aliases: BTreeSet<String>,
    /// Whether sub-fields of this relation may be addressed
    #[serde(default)]
    pub joinable: bool,
}

impl FieldAccess {
    /// Directly filterable/sortable field
    pub fn filterable() -> Self {
        Self::default()
    }

    /// Traversable relation
    pub fn joinable() -> Self {
        Self {
            aliases: BTreeSet::new(),
            joinable: true,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into());
        self
    }
}

/// Field definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Canonical field name
    pub name: String,
    /// Value kind
    pub kind: ValueKind,
    /// Access policy, `None` means the field is not accessible
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<FieldAccess>,
}

impl FieldDescriptor {
    /// Create a field without an access policy
    pub fn hidden(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            kind,
            access: None,
        }
    }

    /// Create a field with an access policy
    pub fn accessible(name: impl Into<String>, kind: ValueKind, access: FieldAccess) -> Self {
        Self {
            name: name.into(),
            kind,
            access: Some(access),
        }
    }

    /// Returns true if `name` is an alias declared in the access policy
    pub fn has_alias(&self, name: &str) -> bool {
        self.access
            .as_ref()
            .map_or(false, |access| access.aliases.contains(name))
    }
}

/// Static description of one entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDescriptor {
    /// Entity name, unique within a registry
    pub name: String,
    /// Ordered field definitions
    pub fields: Vec<FieldDescriptor>,
}

impl EntityDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Finds a field by canonical name, then by declared alias
    pub fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.fields.iter().find(|f| f.has_alias(name)))
    }

    /// Validates the entity structure itself (not its relations)
    pub fn validate_structure(&self) -> RegistryResult<()> {
        if self.name.is_empty() {
            return Err(RegistryError::InvalidEntity("Entity name cannot be empty".into()));
        }

        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if field.name.is_empty() || field.name.contains('.') {
                return Err(RegistryError::InvalidEntity(format!(
                    "Entity '{}' has an invalid field name '{}'",
                    self.name, field.name
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(RegistryError::InvalidEntity(format!(
                    "Entity '{}' declares field '{}' twice",
                    self.name, field.name
                )));
            }
            if let ValueKind::Enum { variants } = &field.kind {
                if variants.is_empty() {
                    return Err(RegistryError::InvalidEntity(format!(
                        "Enum field '{}.{}' declares no variants",
                        self.name, field.name
                    )));
                }
            }
        }

        for field in &self.fields {
            for alias in field.access.iter().flat_map(|a| a.aliases.iter()) {
                if alias.is_empty() || alias.contains('.') {
                    return Err(RegistryError::InvalidEntity(format!(
                        "Field '{}.{}' has an invalid alias '{}'",
                        self.name, field.name, alias
                    )));
                }
                let clashes = self
                    .fields
                    .iter()
                    .any(|other| other.name != field.name && (other.name == *alias || other.has_alias(alias)));
                if clashes {
                    return Err(RegistryError::InvalidEntity(format!(
                        "Alias '{}' of '{}.{}' is ambiguous",
                        alias, self.name, field.name
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entity() -> EntityDescriptor {
        EntityDescriptor::new("users")
            .with_field(FieldDescriptor::accessible(
                "name",
                ValueKind::String,
                FieldAccess::filterable().with_alias("fullName"),
            ))
            .with_field(FieldDescriptor::hidden("password", ValueKind::String))
    }

    #[test]
    fn test_find_field_by_name_and_alias() {
        let entity = sample_entity();
        assert_eq!(entity.find_field("name").unwrap().name, "name");
        assert_eq!(entity.find_field("fullName").unwrap().name, "name");
        assert!(entity.find_field("missing").is_none());
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let entity = sample_entity().with_field(FieldDescriptor::hidden("name", ValueKind::Int32));
        let err = entity.validate_structure().unwrap_err();
        assert!(matches!(&err, RegistryError::InvalidEntity(msg) if msg.contains("twice")));
    }

    #[test]
    fn test_ambiguous_alias_rejected() {
        let entity = sample_entity().with_field(FieldDescriptor::accessible(
            "nickname",
            ValueKind::String,
            FieldAccess::filterable().with_alias("fullName"),
        ));
        let err = entity.validate_structure().unwrap_err();
        assert!(matches!(&err, RegistryError::InvalidEntity(msg) if msg.contains("ambiguous")));
    }

    #[test]
    fn test_kind_deserialization() {
        let kind: ValueKind = serde_json::from_str(r#"{"type": "datetime"}"#).unwrap();
        assert_eq!(kind, ValueKind::DateTime);

        let kind: ValueKind =
            serde_json::from_str(r#"{"type": "relation_to_many", "target": "tags"}"#).unwrap();
        assert_eq!(kind.relation_target(), Some("tags"));
        assert_eq!(kind.type_name(), "relation_to_many");
    }

    #[test]
    fn test_field_without_access_deserializes_hidden() {
        let field: FieldDescriptor =
            serde_json::from_str(r#"{"name": "secret", "kind": {"type": "string"}}"#).unwrap();
        assert!(field.access.is_none());
    }
}
