//! ServerBuilder for fluent API to build HTTP servers

use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::SchemaConfig;
use crate::core::service::RecordService;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for creating HTTP servers with auto-registered resource routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_record_service(InMemoryRecordService::new())
///     .with_schema(SchemaConfig::from_yaml_file("config/schema.yaml")?)
///     .build()?;
/// ```
pub struct ServerBuilder {
    record_service: Option<Arc<dyn RecordService>>,
    schema: Option<SchemaConfig>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            record_service: None,
            schema: None,
            custom_routes: Vec::new(),
        }
    }

    /// Set the record service (required)
    pub fn with_record_service(self, service: impl RecordService + 'static) -> Self {
        self.with_shared_record_service(Arc::new(service))
    }

    /// Set a record service that the caller keeps a handle to
    pub fn with_shared_record_service(mut self, service: Arc<dyn RecordService>) -> Self {
        self.record_service = Some(service);
        self
    }

    /// Set the schema configuration (required)
    pub fn with_schema(mut self, schema: SchemaConfig) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Add custom routes to the server
    ///
    /// Use this for endpoints that don't fit the generic resource pattern,
    /// such as dashboards or report downloads. Custom static paths take
    /// precedence over `/{resource}`.
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Build the transport-agnostic host
    pub fn build_host(mut self) -> Result<ServerHost> {
        let records = self.record_service.take().ok_or_else(|| {
            anyhow::anyhow!("RecordService is required. Call .with_record_service()")
        })?;
        let schema = self
            .schema
            .take()
            .ok_or_else(|| anyhow::anyhow!("SchemaConfig is required. Call .with_schema()"))?;

        ServerHost::from_builder_components(records, &schema)
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        RestExposure::build_router(host, custom_routes)
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryRecordService;

    #[test]
    fn test_build_without_record_service_fails() {
        let result = ServerBuilder::new()
            .with_schema(SchemaConfig::default_config())
            .build();
        let err = result.err().expect("build should fail");
        assert!(err.to_string().contains("RecordService is required"));
    }

    #[test]
    fn test_build_without_schema_fails() {
        let result = ServerBuilder::new()
            .with_record_service(InMemoryRecordService::new())
            .build();
        let err = result.err().expect("build should fail");
        assert!(err.to_string().contains("SchemaConfig is required"));
    }

    #[test]
    fn test_build_host_registers_resources() {
        let host = ServerBuilder::new()
            .with_record_service(InMemoryRecordService::new())
            .with_schema(SchemaConfig::default_config())
            .build_host()
            .expect("host should build");
        assert_eq!(host.resource_names().len(), 6);
    }

    #[test]
    fn test_fluent_chaining_full_pipeline() {
        let result = ServerBuilder::default()
            .with_record_service(InMemoryRecordService::new())
            .with_schema(SchemaConfig::default_config())
            .with_custom_routes(Router::new())
            .build();
        assert!(result.is_ok(), "full fluent pipeline should succeed");
    }
}
