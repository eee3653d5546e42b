//! Service trait for record storage

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// Storage for records of every schema type
///
/// Records are stored as hydrated JSON documents: relations are already
/// embedded, and read endpoints prune them with an include tree.
/// Implementations are keyed by schema type name (e.g. "subject").
#[async_trait]
pub trait RecordService: Send + Sync {
    /// Store a new record, assigning an `id` when it has none
    ///
    /// Fails with [`ResourceError::AlreadyExists`](crate::core::error::ResourceError)
    /// when a record of the type already has that `id`.
    async fn create(&self, type_name: &str, record: Value) -> Result<Value>;

    /// Get a record by ID
    async fn get(&self, type_name: &str, id: &Uuid) -> Result<Option<Value>>;

    /// List all records of a type in insertion order
    async fn list(&self, type_name: &str) -> Result<Vec<Value>>;

    /// Delete a record, returning it if it existed
    async fn delete(&self, type_name: &str, id: &Uuid) -> Result<Option<Value>>;
}
