//! Resource registry mapping REST path segments to schema types

use crate::config::SchemaConfig;
use crate::core::error::{ConfigError, ResourceError};
use indexmap::IndexMap;

/// Path segments served by the health routes
pub const RESERVED_PATHS: [&str; 2] = ["health", "healthz"];

/// A schema type exposed under `/{plural}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    /// The schema type name (singular, e.g., "academic_year")
    pub type_name: String,

    /// The path segment (e.g., "academic_years")
    pub plural: String,
}

/// Registry for all resources in the application
///
/// Lookups go from the plural path segment to the descriptor, since that is
/// what the generic handlers receive.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
    resources: IndexMap<String, ResourceDescriptor>,
}

impl ResourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every type of the configuration that declares a plural
    pub fn from_config(config: &SchemaConfig) -> Result<Self, ConfigError> {
        let mut registry = Self::new();
        for (type_name, plural) in config.resources() {
            registry.register(type_name, plural)?;
        }
        Ok(registry)
    }

    /// Register a resource
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        plural: impl Into<String>,
    ) -> Result<(), ConfigError> {
        let plural = plural.into();
        if RESERVED_PATHS.contains(&plural.as_str()) {
            return Err(ConfigError::ReservedResource { plural });
        }
        if self.resources.contains_key(&plural) {
            return Err(ConfigError::DuplicateResource { plural });
        }

        self.resources.insert(
            plural.clone(),
            ResourceDescriptor {
                type_name: type_name.into(),
                plural,
            },
        );
        Ok(())
    }

    /// Find the resource served under a path segment
    pub fn resolve(&self, plural: &str) -> Result<&ResourceDescriptor, ResourceError> {
        self.resources
            .get(plural)
            .ok_or_else(|| ResourceError::UnknownResource {
                resource: plural.to_string(),
                available: self.resources.keys().cloned().collect(),
            })
    }

    /// All registered descriptors in registration order
    pub fn descriptors(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.resources.values()
    }

    /// All registered path segments
    pub fn plurals(&self) -> Vec<&str> {
        self.resources.keys().map(String::as_str).collect()
    }
}
