//! HTTP JSON API over the game store.

mod error;
mod routes;

pub use error::ApiError;
pub use routes::{AppendRoundRequest, CreateGameRequest};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use derive_new::new;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{instrument, warn};

use crate::store::GameStore;

/// Shared handler state.
#[derive(Debug, Clone, new)]
pub struct AppState {
    /// Game store used by every handler.
    pub store: GameStore,
}

/// CORS policy admitting only the listed browser origins.
///
/// Requests without an `Origin` header are not affected. Origins that are not
/// valid header values are skipped.
#[instrument]
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Builds the complete application router.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    routes::routes()
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
