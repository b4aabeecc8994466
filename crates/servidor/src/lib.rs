//! servidor - HTTP Server
//!
//! *O Servidor* (The Server) - Axum HTTP API over the reference catalogs and
//! the clinical discussion sessions

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// API error types
pub mod error;

/// HTTP handlers for REST endpoints
pub mod handlers;

/// Server configuration from TOML and environment
pub mod config;

/// API response types matching the frontend contract
pub mod responses;

/// Server instance management
pub mod server;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use handlers::{create_router, AppState};
pub use server::{build_app, ConsultaServer};
