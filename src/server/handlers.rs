//! HTTP handlers for record resources
//!
//! The handlers are generic over every resource: the `{resource}` path segment
//! selects the schema type, and `fields` / `expand` shape the response.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{ApiError, ApiResult, RequestError, ResourceError};
use crate::core::expansion::{FieldExpansionResolver, IncludeTree};
use crate::core::query::{ExpansionParams, PaginatedResponse, PaginationMeta};
use crate::core::schema::{ID_FIELD, SchemaRegistry};
use crate::core::service::RecordService;
use crate::server::extract::{ApiJson, ApiQuery};
use crate::server::resource_registry::{ResourceDescriptor, ResourceRegistry};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub schema: Arc<SchemaRegistry>,
    pub resources: Arc<ResourceRegistry>,
    pub records: Arc<dyn RecordService>,
}

impl AppState {
    fn resource(&self, plural: &str) -> ApiResult<&ResourceDescriptor> {
        Ok(self.resources.resolve(plural)?)
    }

    /// Validate the query of a read request
    fn include_tree(
        &self,
        resource: &ResourceDescriptor,
        params: &ExpansionParams,
    ) -> ApiResult<IncludeTree> {
        FieldExpansionResolver::new(&self.schema)
            .resolve(&resource.type_name, params.fields(), params.expand())
            .map_err(|err| {
                tracing::warn!(
                    resource = %resource.plural,
                    fields = params.fields(),
                    expand = params.expand(),
                    error = ?err,
                    "rejected fields/expand query"
                );
                err.into()
            })
    }
}

fn parse_record_id(raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| {
        RequestError::InvalidRecordId {
            id: raw.to_string(),
        }
        .into()
    })
}

/// GET /{resource}
pub async fn list_records(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    ApiQuery(params): ApiQuery<ExpansionParams>,
) -> ApiResult<Json<PaginatedResponse<Value>>> {
    let resource = state.resource(&resource)?;
    let tree = state.include_tree(resource, &params)?;

    let records = state.records.list(&resource.type_name).await?;
    let total = records.len();

    let data = records
        .iter()
        .skip(params.offset())
        .take(params.limit())
        .map(|record| tree.project(record))
        .collect();

    Ok(Json(PaginatedResponse {
        data,
        pagination: PaginationMeta::new(params.page(), params.limit(), total),
    }))
}

/// GET /{resource}/{id}
pub async fn get_record(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
    ApiQuery(params): ApiQuery<ExpansionParams>,
) -> ApiResult<Json<Value>> {
    let resource = state.resource(&resource)?;
    let id = parse_record_id(&id)?;
    let tree = state.include_tree(resource, &params)?;

    let record = state
        .records
        .get(&resource.type_name, &id)
        .await?
        .ok_or_else(|| ResourceError::NotFound {
            resource: resource.plural.clone(),
            id,
        })?;

    Ok(Json(tree.project(&record)))
}

/// POST /{resource}
pub async fn create_record(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    ApiJson(payload): ApiJson<Value>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let resource = state.resource(&resource)?;

    let Value::Object(fields) = &payload else {
        return Err(RequestError::InvalidBody {
            message: "expected a JSON object".to_string(),
        }
        .into());
    };
    match fields.get(ID_FIELD) {
        None => {}
        Some(Value::String(raw)) if Uuid::parse_str(raw).is_ok() => {}
        Some(_) => {
            return Err(RequestError::InvalidBody {
                message: format!("'{}' must be a UUID string", ID_FIELD),
            }
            .into());
        }
    }

    let created = state
        .records
        .create(&resource.type_name, payload)
        .await
        .map_err(|err| match ApiError::from(err) {
            ApiError::Resource(ResourceError::AlreadyExists { id, .. }) => {
                ResourceError::AlreadyExists {
                    resource: resource.plural.clone(),
                    id,
                }
                .into()
            }
            other => other,
        })?;
    tracing::debug!(resource = %resource.plural, id = %created[ID_FIELD], "record created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// DELETE /{resource}/{id}
pub async fn delete_record(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let resource = state.resource(&resource)?;
    let id = parse_record_id(&id)?;

    match state.records.delete(&resource.type_name, &id).await? {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ResourceError::NotFound {
            resource: resource.plural.clone(),
            id,
        }
        .into()),
    }
}
