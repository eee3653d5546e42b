//! Type descriptors and the schema registry
//!
//! Every record type served by the API is described once at startup by a
//! [`TypeDescriptor`]: its scalar fields, its relationships to other types and
//! an optional default field set. The [`SchemaRegistry`] holds all descriptors
//! and guarantees that every relationship resolves to a registered type.
//!
//! # Example
//!
//! ```rust,ignore
//! let registry = SchemaRegistry::builder()
//!     .register(
//!         TypeDescriptor::new("subject")
//!             .scalars(["id", "name", "code"])
//!             .many("grades", "grade"),
//!     )
//!     .register(TypeDescriptor::new("grade").scalars(["id", "grade"]))
//!     .build()?;
//! ```

use crate::core::error::ConfigError;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Name of the identifier field, force-included whenever a type declares it
pub const ID_FIELD: &str = "id";

/// Whether a relation holds one related record or a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    One,
    Many,
}

/// What a declared field holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A leaf value serialized as-is
    Scalar,
    /// A nested record (or list of records) of another registered type
    Relation {
        target: String,
        cardinality: Cardinality,
    },
}

/// A single declared field of a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, FieldKind::Scalar)
    }
}

/// Static description of a record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    name: String,
    fields: Vec<FieldDescriptor>,
    default_fields: Option<Vec<String>>,
}

impl TypeDescriptor {
    /// Create a type with no fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            default_fields: None,
        }
    }

    /// Declare a scalar field
    pub fn scalar(mut self, name: impl Into<String>) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            kind: FieldKind::Scalar,
        });
        self
    }

    /// Declare several scalar fields
    pub fn scalars<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(self, |ty, name| ty.scalar(name))
    }

    /// Declare a relation to a single record of `target`
    pub fn one(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.relation(name, target, Cardinality::One)
    }

    /// Declare a relation to a collection of `target` records
    pub fn many(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.relation(name, target, Cardinality::Many)
    }

    /// Declare a relation with an explicit cardinality
    pub fn relation(
        mut self,
        name: impl Into<String>,
        target: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            kind: FieldKind::Relation {
                target: target.into(),
                cardinality,
            },
        });
        self
    }

    /// Fields serialized when the caller selects none
    pub fn with_default_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_fields = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All declared fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn default_fields(&self) -> Option<&[String]> {
        self.default_fields.as_deref()
    }

    /// Scalar field names in declaration order
    pub fn scalar_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_scalar())
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Relation field names in declaration order
    pub fn relation_names(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| !f.is_scalar())
            .map(|f| f.name.as_str())
            .collect()
    }

    pub fn is_scalar(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f.is_scalar() && f.name == name)
    }

    /// Target type and cardinality of a relation field
    pub fn relation_target(&self, name: &str) -> Option<(&str, Cardinality)> {
        self.fields.iter().find_map(|f| match &f.kind {
            FieldKind::Relation {
                target,
                cardinality,
            } if f.name == name => Some((target.as_str(), *cardinality)),
            _ => None,
        })
    }

    /// Whether the type declares the `id` scalar
    pub fn has_identifier(&self) -> bool {
        self.is_scalar(ID_FIELD)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_identifier(&self.name)?;

        let mut seen = HashSet::new();
        for field in &self.fields {
            check_identifier(&field.name)?;
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField {
                    type_name: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        for field in self.default_fields.iter().flatten() {
            if !self.is_scalar(field) {
                return Err(ConfigError::UnknownDefaultField {
                    type_name: self.name.clone(),
                    field: field.clone(),
                });
            }
        }

        Ok(())
    }
}

fn check_identifier(name: &str) -> Result<(), ConfigError> {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    let regex = IDENTIFIER.get_or_init(|| Regex::new(r"^[a-z_][a-z0-9_]*$").unwrap());

    // `all` is the field-selection wildcard
    if regex.is_match(name) && name != "all" {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

/// Registry of all type descriptors, built once and shared read-only
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: IndexMap<String, TypeDescriptor>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Registered type names in registration order
    pub fn type_names(&self) -> Vec<&str> {
        self.types.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Collects descriptors and validates them as a whole
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    types: Vec<TypeDescriptor>,
}

impl SchemaRegistryBuilder {
    pub fn register(mut self, descriptor: TypeDescriptor) -> Self {
        self.types.push(descriptor);
        self
    }

    /// Validate every descriptor and every relation target
    pub fn build(self) -> Result<SchemaRegistry, ConfigError> {
        let mut types = IndexMap::with_capacity(self.types.len());
        for descriptor in self.types {
            descriptor.validate()?;
            if types.contains_key(descriptor.name()) {
                return Err(ConfigError::DuplicateType {
                    type_name: descriptor.name,
                });
            }
            types.insert(descriptor.name.clone(), descriptor);
        }

        for descriptor in types.values() {
            for field in &descriptor.fields {
                let FieldKind::Relation { target, .. } = &field.kind else {
                    continue;
                };
                if !types.contains_key(target) {
                    return Err(ConfigError::UnknownRelationTarget {
                        type_name: descriptor.name.clone(),
                        relation: field.name.clone(),
                        target: target.clone(),
                    });
                }
            }
        }

        Ok(SchemaRegistry { types })
    }
}
