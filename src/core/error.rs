//! Typed error handling for schoolyard
//!
//! Every failure that can reach an HTTP client is represented by a variant of
//! [`ApiError`]. Each category knows its own status code and error code, and
//! [`ApiError`] renders the shared JSON envelope:
//!
//! ```json
//! {
//!   "message": "Invalid field requested",
//!   "meta": { "invalid_field": "nickname", "allowed_fields": ["code", "id", "name"] }
//! }
//! ```
//!
//! # Error Categories
//!
//! - [`ExpansionError`]: Invalid `fields` / `expand` query parameters
//! - [`ResourceError`]: Unknown resources and missing records
//! - [`RequestError`]: Malformed path segments and request bodies
//! - [`ConfigError`]: Schema configuration parsing and validation

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

/// The main error type for schoolyard
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected `fields` / `expand` query
    #[error(transparent)]
    Expansion(#[from] ExpansionError),

    /// Resource lookup errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// HTTP/Request errors
    #[error(transparent)]
    Request(#[from] RequestError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Internal errors (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
    /// Structured details allowing the client to correct its request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl ApiError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Expansion(e) => e.status_code(),
            ApiError::Resource(e) => e.status_code(),
            ApiError::Request(e) => e.status_code(),
            ApiError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Expansion(e) => e.error_code(),
            ApiError::Resource(e) => e.error_code(),
            ApiError::Request(e) => e.error_code(),
            ApiError::Config(_) => "CONFIG_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.to_string(),
            meta: self.meta(),
        }
    }

    fn meta(&self) -> Option<serde_json::Value> {
        match self {
            ApiError::Expansion(ExpansionError::InvalidField { field, allowed }) => Some(json!({
                "invalid_field": field,
                "allowed_fields": allowed,
            })),
            ApiError::Expansion(ExpansionError::InvalidExpansion { expansion, allowed }) => {
                Some(json!({
                    "invalid_expand": expansion,
                    "allowed_expansions": allowed,
                }))
            }
            ApiError::Resource(
                ResourceError::NotFound { resource, id }
                | ResourceError::AlreadyExists { resource, id },
            ) => Some(json!({
                "resource": resource,
                "id": id.to_string(),
            })),
            ApiError::Resource(ResourceError::UnknownResource {
                resource,
                available,
            }) => Some(json!({
                "resource": resource,
                "available": available,
            })),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
        }
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Expansion Errors
// =============================================================================

/// Errors raised while resolving `fields` / `expand` into an include tree
///
/// The display strings are part of the HTTP contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExpansionError {
    /// Unknown scalar field, or a nested field without a matching expansion
    #[error("Invalid field requested")]
    InvalidField { field: String, allowed: Vec<String> },

    /// Unknown relationship name
    #[error("Invalid expand requested")]
    InvalidExpansion { expansion: String, allowed: Vec<String> },

    /// A relation points at a type the registry does not know
    #[error("Unknown schema type '{type_name}'")]
    UnknownType { type_name: String },
}

impl ExpansionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExpansionError::InvalidField { .. } => StatusCode::BAD_REQUEST,
            ExpansionError::InvalidExpansion { .. } => StatusCode::BAD_REQUEST,
            ExpansionError::UnknownType { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ExpansionError::InvalidField { .. } => "INVALID_FIELD",
            ExpansionError::InvalidExpansion { .. } => "INVALID_EXPAND",
            ExpansionError::UnknownType { .. } => "UNKNOWN_SCHEMA_TYPE",
        }
    }
}

// =============================================================================
// Resource Errors
// =============================================================================

/// Errors related to resource routing and record lookup
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// No resource is registered under this plural name
    #[error("Unknown resource '{resource}'")]
    UnknownResource {
        resource: String,
        available: Vec<String>,
    },

    /// Record was not found
    #[error("{resource} with id '{id}' not found")]
    NotFound { resource: String, id: Uuid },

    /// A record with this id is already stored
    #[error("{resource} with id '{id}' already exists")]
    AlreadyExists { resource: String, id: Uuid },
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResourceError::UnknownResource { .. } => StatusCode::NOT_FOUND,
            ResourceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ResourceError::AlreadyExists { .. } => StatusCode::CONFLICT,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ResourceError::UnknownResource { .. } => "UNKNOWN_RESOURCE",
            ResourceError::NotFound { .. } => "RECORD_NOT_FOUND",
            ResourceError::AlreadyExists { .. } => "RECORD_ALREADY_EXISTS",
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Path segment is not a valid record ID
    #[error("Invalid record ID format: '{id}'")]
    InvalidRecordId { id: String },

    /// Request body has the wrong shape
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    /// Query string does not deserialize
    #[error("Invalid query string: {message}")]
    InvalidQuery { message: String },

    /// Body is not declared as JSON
    #[error("Expected request with Content-Type: application/json")]
    UnsupportedContentType,
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidRecordId { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            RequestError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            RequestError::UnsupportedContentType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidRecordId { .. } => "INVALID_RECORD_ID",
            RequestError::InvalidBody { .. } => "INVALID_BODY",
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
            RequestError::UnsupportedContentType => "UNSUPPORTED_CONTENT_TYPE",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to schema configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Failed to parse configuration
    #[error("Failed to parse configuration{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// I/O error while reading configuration
    #[error("I/O error: {message}")]
    IoError { message: String },

    /// Type or field name is not a lowercase identifier
    #[error("Invalid identifier '{name}'")]
    InvalidIdentifier { name: String },

    /// Two types share a name
    #[error("Type '{type_name}' is declared more than once")]
    DuplicateType { type_name: String },

    /// A name is declared twice on one type (including scalar vs relation clashes)
    #[error("Field '{field}' is declared more than once on '{type_name}'")]
    DuplicateField { type_name: String, field: String },

    /// A relation targets an undeclared type
    #[error("Relation '{relation}' on '{type_name}' targets unknown type '{target}'")]
    UnknownRelationTarget {
        type_name: String,
        relation: String,
        target: String,
    },

    /// A default field is not a scalar of the type
    #[error("Default field '{field}' is not a scalar field of '{type_name}'")]
    UnknownDefaultField { type_name: String, field: String },

    /// Two resources share a plural route name
    #[error("Resource path '{plural}' is declared more than once")]
    DuplicateResource { plural: String },

    /// A plural collides with a built-in route
    #[error("Resource path '{plural}' is reserved")]
    ReservedResource { plural: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref().map(|f| format!(" '{}'", f)).unwrap_or_default()
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        RequestError::InvalidQuery {
            message: rejection.body_text(),
        }
        .into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => RequestError::UnsupportedContentType.into(),
            other => RequestError::InvalidBody {
                message: other.body_text(),
            }
            .into(),
        }
    }
}

/// Storage backends report failures through `anyhow`
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        let err = match err.downcast::<ResourceError>() {
            Ok(resource_err) => return ApiError::Resource(resource_err),
            Err(err) => err,
        };
        match err.downcast::<ConfigError>() {
            Ok(config_err) => ApiError::Config(config_err),
            Err(err) => ApiError::Internal(err.to_string()),
        }
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for schoolyard operations
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Tests
// =============================================================================
