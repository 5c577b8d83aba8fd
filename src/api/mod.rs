//! API layer - HTTP handlers and middleware
//!
//! HTTP-related concerns:
//! - Request handlers
//! - Identity extractors (bearer token, admin gate)
//! - Custom extractors
//! - Route definitions

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

pub use openapi::ApiDoc;
pub use routes::create_router;
pub use state::AppState;
