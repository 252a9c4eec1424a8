//! Entity registry
//!
//! Descriptors are registered once, validated as a whole, and read-only
//! afterwards. Model files are loaded from `<models_dir>/*.json`, one
//! entity per file.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::errors::{RegistryError, RegistryResult};
use super::types::EntityDescriptor;
use crate::observability::{log_event_with_fields, Event};

/// Read-only lookup of entity descriptors by name
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: HashMap<String, EntityDescriptor>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an entity descriptor.
    ///
    /// Relations are checked by [`EntityRegistry::validate`] once every
    /// entity is known.
    pub fn register(&mut self, entity: EntityDescriptor) -> RegistryResult<()> {
        entity.validate_structure()?;

        if self.entities.contains_key(&entity.name) {
            return Err(RegistryError::DuplicateEntity(entity.name));
        }

        self.entities.insert(entity.name.clone(), entity);
        Ok(())
    }

    /// Builder-style registration
    pub fn with_entity(mut self, entity: EntityDescriptor) -> RegistryResult<Self> {
        self.register(entity)?;
        Ok(self)
    }

    /// Looks up an entity by name
    pub fn get(&self, name: &str) -> Option<&EntityDescriptor> {
        self.entities.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entities.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entity names in lexicographic order
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entities.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Checks that every relation points to a registered entity and that
    /// joinable fields are relations.
    pub fn validate(&self) -> RegistryResult<()> {
        for name in self.entity_names() {
            let entity = &self.entities[name];
            for field in &entity.fields {
                if let Some(target) = field.kind.relation_target() {
                    if !self.entities.contains_key(target) {
                        return Err(RegistryError::UnknownRelationTarget {
                            entity: entity.name.clone(),
                            field: field.name.clone(),
                            target: target.to_string(),
                        });
                    }
                }

                let joinable = field.access.as_ref().map_or(false, |a| a.joinable);
                if joinable && !field.kind.is_relation() {
                    return Err(RegistryError::InvalidEntity(format!(
                        "Field '{}.{}' is joinable but of kind {}",
                        entity.name,
                        field.name,
                        field.kind.type_name()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Parses and registers one entity from JSON text
    pub fn register_json(&mut self, json: &str) -> RegistryResult<()> {
        let entity: EntityDescriptor = serde_json::from_str(json)?;
        self.register(entity)
    }

    /// Loads every `*.json` model file from a directory and validates the
    /// resulting registry.
    pub fn load_dir(dir: &Path) -> RegistryResult<Self> {
        let mut registry = Self::new();

        let entries = fs::read_dir(dir).map_err(|e| RegistryError::io(dir, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| RegistryError::io(dir, e))?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "json") {
                paths.push(path);
            }
        }
        // Deterministic registration order
        paths.sort();

        for path in &paths {
            let content = fs::read_to_string(path).map_err(|e| RegistryError::io(path, e))?;
            let entity: EntityDescriptor =
                serde_json::from_str(&content).map_err(|e| RegistryError::Malformed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            registry.register(entity)?;
        }

        registry.validate()?;

        let count = registry.len().to_string();
        let dir_display = dir.display().to_string();
        log_event_with_fields(
            Event::ModelsLoaded,
            &[("dir", dir_display.as_str()), ("entities", count.as_str())],
        );

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{FieldAccess, FieldDescriptor, ValueKind};

    fn owner() -> EntityDescriptor {
        EntityDescriptor::new("owners").with_field(FieldDescriptor::accessible(
            "name",
            ValueKind::String,
            FieldAccess::filterable(),
        ))
    }

    fn pets() -> EntityDescriptor {
        EntityDescriptor::new("pets").with_field(FieldDescriptor::accessible(
            "owner",
            ValueKind::RelationToOne {
                target: "owners".into(),
            },
            FieldAccess::joinable(),
        ))
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = EntityRegistry::new()
            .with_entity(owner())
            .unwrap()
            .with_entity(pets())
            .unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("pets"));
        assert_eq!(registry.entity_names(), vec!["owners", "pets"]);
        assert!(registry.validate().is_ok());
    }

    #[test]
    fn test_duplicate_entity_rejected() {
        let mut registry = EntityRegistry::new();
        registry.register(owner()).unwrap();
        let err = registry.register(owner()).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateEntity(name) if name == "owners"));
    }

    #[test]
    fn test_unknown_relation_target_rejected() {
        let registry = EntityRegistry::new().with_entity(pets()).unwrap();
        let err = registry.validate().unwrap_err();
        assert!(matches!(err, RegistryError::UnknownRelationTarget { .. }));
    }

    #[test]
    fn test_joinable_scalar_rejected() {
        let entity = EntityDescriptor::new("bad").with_field(FieldDescriptor::accessible(
            "age",
            ValueKind::Int32,
            FieldAccess::joinable(),
        ));
        let registry = EntityRegistry::new().with_entity(entity).unwrap();
        assert!(matches!(
            registry.validate().unwrap_err(),
            RegistryError::InvalidEntity(_)
        ));
    }

    #[test]
    fn test_register_json() {
        let mut registry = EntityRegistry::new();
        registry
            .register_json(
                r#"{"name": "tags", "fields": [
                    {"name": "label", "kind": {"type": "string"}, "access": {}}
                ]}"#,
            )
            .unwrap();
        assert!(registry.get("tags").unwrap().find_field("label").is_some());
    }
}
