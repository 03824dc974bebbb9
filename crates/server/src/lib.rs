//! Strongbox HTTP server.
//!
//! Wires the authentication and metadata components into an axum
//! application: state, routes, auth middleware, and handlers.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
