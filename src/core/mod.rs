//! Core module containing fundamental traits and types

pub mod error;
pub mod expansion;
pub mod query;
pub mod schema;
pub mod service;

pub use error::{ApiError, ApiResult, ExpansionError};
pub use expansion::{FieldExpansionResolver, IncludeNode, IncludeTree};
pub use query::{ExpansionParams, PaginatedResponse, PaginationMeta};
pub use schema::{Cardinality, FieldDescriptor, FieldKind, SchemaRegistry, TypeDescriptor};
pub use service::RecordService;
