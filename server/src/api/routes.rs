//! Route-Definitionen fuer die Medien-API (/api/...)

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::api::{handlers, AppState};

/// Erstellt den vollstaendigen /api/-Router
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Handshake
        .route("/api/parameters", get(handlers::parameters::get_parameters))
        .route("/api/protocols", get(handlers::parameters::get_protocols))
        .route("/api/register", post(handlers::register::post_register))
        // Geschuetzter Kanal
        .route("/api/auth", post(handlers::auth::post_auth))
        .route("/api/logout", post(handlers::auth::post_logout))
        .route("/api/list", get(handlers::media::get_list))
        .route("/api/download", get(handlers::media::get_download))
        // Provisionierung
        .route("/api/licenses", post(handlers::lizenzen::post_license))
        .layer(TraceLayer::new_for_http())
}
