//! Extractors whose rejections render the API error envelope

use axum::extract::{FromRequest, FromRequestParts};

use crate::core::error::ApiError;

/// `Query` rejecting malformed query strings with an [`ApiError`]
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `Json` rejecting malformed or untyped bodies with an [`ApiError`]
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
