//! Route configuration.

use crate::auth::auth_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the CORS layer from configured origins.
fn cors_layer(state: &AppState) -> CorsLayer {
    let origins: Vec<HeaderValue> = state
        .config
        .server
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
}

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(handlers::banner))
        // Unauthenticated for load balancer probes
        .route("/health", get(handlers::health_check))
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route(
            "/metadata",
            post(handlers::create_metadata).get(handlers::list_metadata),
        )
        // Static segments win over the {file_id} capture below
        .route("/metadata/all", delete(handlers::delete_all_metadata))
        .route(
            "/metadata/delete-selected",
            post(handlers::delete_selected_metadata),
        )
        .route(
            "/metadata/{file_id}",
            get(handlers::get_metadata).delete(handlers::delete_metadata),
        );

    // Middleware layers are applied in reverse order (outermost first):
    // TraceLayer -> CORS -> Auth -> Handler
    router
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(cors_layer(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
