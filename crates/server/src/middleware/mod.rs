//! HTTP middleware.
//!
//! - [`auth`] - Bearer token extractors ([`RequireAuth`], [`RequireAdmin`])
//! - [`request_id`] - Request ID generation and propagation

pub mod auth;
pub mod request_id;

pub use auth::{RequireAdmin, RequireAuth};
pub use request_id::request_id_middleware;
