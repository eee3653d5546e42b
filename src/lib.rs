//! # schoolyard
//!
//! A school administration REST backend: academic years, grades, sections,
//! subjects, teachers and students, served through generic resource routes.
//!
//! ## Features
//!
//! - **Partial responses**: `fields` selects the scalar fields to return
//! - **Relationship expansion**: `expand` inlines related records, to any depth
//! - **Validated queries**: unknown fields and relations are rejected with the
//!   list of allowed names
//! - **Configuration-Based**: record types and relations are declared in YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use schoolyard::prelude::*;
//!
//! let registry = SchemaConfig::default_config().to_registry()?;
//! let tree = FieldExpansionResolver::new(&registry)
//!     .resolve("subject", "name,grades.grade", "grades")?;
//!
//! // {"name": true, "id": true, "grades": {"__all__": {"grade": true, "id": true}}}
//! let body = serde_json::to_value(&tree)?;
//!
//! // Prune a stored record down to the requested shape
//! let response = tree.project(&record);
//! ```

pub mod config;
pub mod core;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{
            ApiError, ApiResult, ConfigError, ErrorResponse, ExpansionError, RequestError,
            ResourceError,
        },
        expansion::{ALL_FIELDS, ALL_ITEMS_KEY, FieldExpansionResolver, IncludeNode, IncludeTree},
        query::{ExpansionParams, PaginatedResponse, PaginationMeta},
        schema::{Cardinality, FieldKind, ID_FIELD, SchemaRegistry, TypeDescriptor},
        service::RecordService,
    };

    // === Storage ===
    pub use crate::storage::InMemoryRecordService;

    // === Config ===
    pub use crate::config::{RelationConfig, SchemaConfig, TypeConfig};

    // === Server ===
    pub use crate::server::{
        ResourceDescriptor, ResourceRegistry, ServerBuilder, ServerHost,
        exposure::RestExposure,
    };

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::{Value, json};
    pub use uuid::Uuid;
}
