//! Server host for transport-agnostic API exposure
//!
//! The `ServerHost` owns everything a request needs: the validated schema
//! registry, the resource table and the record service. Exposures build their
//! routers from it.

use crate::config::SchemaConfig;
use crate::core::FieldExpansionResolver;
use crate::core::schema::SchemaRegistry;
use crate::core::service::RecordService;
use crate::server::resource_registry::ResourceRegistry;
use anyhow::Result;
use std::sync::Arc;

/// Host context containing all application state
///
/// # Example
///
/// ```rust,ignore
/// let host = ServerHost::from_builder_components(
///     Arc::new(InMemoryRecordService::new()),
///     &SchemaConfig::default_config(),
/// )?;
///
/// let app = RestExposure::build_router(Arc::new(host), vec![])?;
/// ```
pub struct ServerHost {
    /// Type descriptors for every record type
    pub schema: Arc<SchemaRegistry>,

    /// Types exposed as REST resources
    pub resources: Arc<ResourceRegistry>,

    /// Record storage
    pub records: Arc<dyn RecordService>,
}

impl ServerHost {
    /// Build the host from builder components
    ///
    /// Fails with a [`ConfigError`](crate::core::error::ConfigError) when the
    /// schema or the resource table is invalid.
    pub fn from_builder_components(
        records: Arc<dyn RecordService>,
        config: &SchemaConfig,
    ) -> Result<Self> {
        let schema = config.to_registry()?;
        let resources = ResourceRegistry::from_config(config)?;

        tracing::debug!(
            types = schema.len(),
            resources = ?resources.plurals(),
            "schema registry built"
        );

        Ok(Self {
            schema: Arc::new(schema),
            resources: Arc::new(resources),
            records,
        })
    }

    /// Get resource path segments registered in the host
    pub fn resource_names(&self) -> Vec<&str> {
        self.resources.plurals()
    }

    /// Resolver over this host's schema
    pub fn resolver(&self) -> FieldExpansionResolver<'_> {
        FieldExpansionResolver::new(&self.schema)
    }
}
