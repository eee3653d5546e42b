//! Server module for building HTTP servers with auto-registered routes
//!
//! This module provides a `ServerBuilder` that registers:
//! - Generic list/get/create/delete routes for every configured resource
//! - Health check routes

pub mod builder;
pub mod exposure;
pub mod extract;
pub mod handlers;
pub mod host;
pub mod resource_registry;
pub mod router;

pub use builder::ServerBuilder;
pub use host::ServerHost;
pub use resource_registry::{ResourceDescriptor, ResourceRegistry};
