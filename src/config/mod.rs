//! Configuration loading and management
//!
//! The schema of every record type is declared in YAML:
//!
//! ```yaml
//! types:
//!   - name: subject
//!     plural: subjects
//!     fields: [id, name, code]
//!     default_fields: [name]
//!     relations:
//!       - { name: grades, target: grade, many: true }
//! ```
//!
//! Types with a `plural` are exposed as REST resources under `/{plural}`.

use crate::core::error::ConfigError;
use crate::core::schema::{Cardinality, SchemaRegistry, TypeDescriptor};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a relationship field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationConfig {
    /// Field name on the owning type (e.g., "grades")
    pub name: String,

    /// Related type name (e.g., "grade")
    pub target: String,

    /// Whether the field holds a collection
    #[serde(default)]
    pub many: bool,
}

impl RelationConfig {
    pub fn cardinality(&self) -> Cardinality {
        if self.many {
            Cardinality::Many
        } else {
            Cardinality::One
        }
    }
}

/// Configuration for a record type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeConfig {
    /// Singular type name (e.g., "academic_year")
    pub name: String,

    /// Route path segment; types without one are only reachable through relations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plural: Option<String>,

    /// Scalar field names
    pub fields: Vec<String>,

    /// Fields serialized when none are requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_fields: Option<Vec<String>>,

    /// Relationship fields
    #[serde(default)]
    pub relations: Vec<RelationConfig>,
}

impl TypeConfig {
    /// Convert into a type descriptor
    pub fn to_descriptor(&self) -> TypeDescriptor {
        let descriptor = self
            .relations
            .iter()
            .fold(
                TypeDescriptor::new(&self.name).scalars(&self.fields),
                |ty, relation| ty.relation(&relation.name, &relation.target, relation.cardinality()),
            );

        match &self.default_fields {
            Some(defaults) => descriptor.with_default_fields(defaults),
            None => descriptor,
        }
    }
}

/// Complete schema configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Record types in declaration order
    pub types: Vec<TypeConfig>,
}

impl SchemaConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.display().to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Build the validated registry of all declared types
    pub fn to_registry(&self) -> Result<SchemaRegistry, ConfigError> {
        self.types
            .iter()
            .fold(SchemaRegistry::builder(), |builder, ty| {
                builder.register(ty.to_descriptor())
            })
            .build()
    }

    /// `(type name, plural)` of every type exposed as a resource
    pub fn resources(&self) -> impl Iterator<Item = (&str, &str)> {
        self.types
            .iter()
            .filter_map(|ty| ty.plural.as_deref().map(|plural| (ty.name.as_str(), plural)))
    }

    /// The school administration schema
    pub fn default_config() -> Self {
        fn ty(
            name: &str,
            plural: &str,
            fields: &[&str],
            default_fields: Option<&[&str]>,
            relations: &[(&str, &str, bool)],
        ) -> TypeConfig {
            TypeConfig {
                name: name.to_string(),
                plural: Some(plural.to_string()),
                fields: fields.iter().map(|f| f.to_string()).collect(),
                default_fields: default_fields
                    .map(|fields| fields.iter().map(|f| f.to_string()).collect()),
                relations: relations
                    .iter()
                    .map(|(name, target, many)| RelationConfig {
                        name: name.to_string(),
                        target: target.to_string(),
                        many: *many,
                    })
                    .collect(),
            }
        }

        Self {
            types: vec![
                ty(
                    "academic_year",
                    "academic_years",
                    &["id", "year", "start_date", "end_date", "status"],
                    Some(&["year", "status"][..]),
                    &[("grades", "grade", true)],
                ),
                ty(
                    "grade",
                    "grades",
                    &["id", "grade", "level", "has_stream"],
                    None,
                    &[
                        ("academic_year", "academic_year", false),
                        ("sections", "section", true),
                        ("subjects", "subject", true),
                    ],
                ),
                ty(
                    "section",
                    "sections",
                    &["id", "section", "capacity"],
                    None,
                    &[
                        ("grade", "grade", false),
                        ("homeroom_teacher", "teacher", false),
                        ("students", "student", true),
                    ],
                ),
                ty(
                    "subject",
                    "subjects",
                    &["id", "name", "code"],
                    None,
                    &[("grades", "grade", true), ("teachers", "teacher", true)],
                ),
                ty(
                    "teacher",
                    "teachers",
                    &["id", "first_name", "last_name", "email", "phone"],
                    Some(&["first_name", "last_name"][..]),
                    &[("subjects", "subject", true)],
                ),
                ty(
                    "student",
                    "students",
                    &[
                        "id",
                        "student_number",
                        "first_name",
                        "last_name",
                        "date_of_birth",
                        "gender",
                    ],
                    Some(&["student_number", "first_name", "last_name"][..]),
                    &[("section", "section", false), ("grade", "grade", false)],
                ),
            ],
        }
    }
}
