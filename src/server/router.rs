//! Router builder utilities for resource routes

use crate::server::handlers::{AppState, create_record, delete_record, get_record, list_records};
use axum::{Router, routing::get};

/// Build resource routes
///
/// These routes are generic and work for all resources:
/// - GET /{resource}?fields=&expand=&page=&limit= - List records
/// - POST /{resource} - Create a record
/// - GET /{resource}/{id}?fields=&expand= - Get a record
/// - DELETE /{resource}/{id} - Delete a record
pub fn build_resource_routes(state: AppState) -> Router {
    Router::new()
        .route("/{resource}", get(list_records).post(create_record))
        .route("/{resource}/{id}", get(get_record).delete(delete_record))
        .with_state(state)
}
