//! In-memory implementation of RecordService for testing and development

use crate::core::RecordService;
use crate::core::error::ResourceError;
use crate::core::schema::ID_FIELD;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

type Records = HashMap<String, IndexMap<Uuid, Value>>;

/// In-memory record service implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access.
#[derive(Clone, Default)]
pub struct InMemoryRecordService {
    records: Arc<RwLock<Records>>,
}

impl InMemoryRecordService {
    /// Create a new in-memory record service
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records of a type
    pub fn count(&self, type_name: &str) -> usize {
        self.records
            .read()
            .map(|records| records.get(type_name).map_or(0, IndexMap::len))
            .unwrap_or(0)
    }
}

fn record_id(record: &mut Value) -> Result<Uuid> {
    let Value::Object(fields) = record else {
        return Err(anyhow!("Record must be a JSON object"));
    };

    match fields.get(ID_FIELD) {
        Some(Value::String(raw)) => {
            Uuid::parse_str(raw).map_err(|e| anyhow!("Invalid record id '{}': {}", raw, e))
        }
        Some(other) => Err(anyhow!("Record id must be a UUID string, got {}", other)),
        None => {
            let id = Uuid::new_v4();
            fields.insert(ID_FIELD.to_string(), Value::String(id.to_string()));
            Ok(id)
        }
    }
}

#[async_trait]
impl RecordService for InMemoryRecordService {
    async fn create(&self, type_name: &str, mut record: Value) -> Result<Value> {
        let id = record_id(&mut record)?;

        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let by_id = records.entry(type_name.to_string()).or_default();
        if by_id.contains_key(&id) {
            return Err(ResourceError::AlreadyExists {
                resource: type_name.to_string(),
                id,
            }
            .into());
        }
        by_id.insert(id, record.clone());

        Ok(record)
    }

    async fn get(&self, type_name: &str, id: &Uuid) -> Result<Option<Value>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records.get(type_name).and_then(|by_id| by_id.get(id)).cloned())
    }

    async fn list(&self, type_name: &str) -> Result<Vec<Value>> {
        let records = self
            .records
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(records
            .get(type_name)
            .map(|by_id| by_id.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn delete(&self, type_name: &str, id: &Uuid) -> Result<Option<Value>> {
        let mut records = self
            .records
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        Ok(records
            .get_mut(type_name)
            .and_then(|by_id| by_id.shift_remove(id)))
    }
}
