//! Entity model subsystem
//!
//! Static, read-only metadata: which fields an entity has, their value
//! kinds, the relations between entities and the access policy of every
//! field.
//!
//! # Design Principles
//!
//! - Built once at registration time, immutable afterwards
//! - No runtime introspection; descriptors are declared in code or JSON
//! - Relations reference their target entity by name

mod access;
mod errors;
mod registry;
mod types;

pub use access::{is_authorized, resolve_path, ResolvedPath};
pub use errors::{RegistryError, RegistryResult};
pub use registry::EntityRegistry;
pub use types::{EntityDescriptor, FieldAccess, FieldDescriptor, ValueKind};
