//! Team and member management web app.
//!
//! [`app`] builds the router; `main.rs` only loads config, opens the store
//! and serves it.

pub mod config;
mod error;
mod render;
mod routes;

use axum::{
    Router,
    extract::FromRef,
    routing::{delete, get},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use config::ServerConfig;
use teamroster_store::Store;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub config: ServerConfig,
}

impl FromRef<AppState> for Store {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

/// Build the full router for `state`.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .route("/", get(routes::teams::index))
        .route("/health", get(routes::health::health))
        // Teams
        .route(
            "/teams",
            get(routes::teams::list_teams).post(routes::teams::create_team),
        )
        .route(
            "/teams/{id}",
            get(routes::teams::get_team).delete(routes::teams::delete_team),
        )
        // Members
        .route(
            "/teams/{id}/members",
            get(routes::members::list_members).post(routes::members::add_member),
        )
        .route("/members/{id}", delete(routes::members::delete_member));

    let static_dir = &state.config.static_dir;
    if static_dir.is_dir() {
        tracing::info!("serving static files from {}", static_dir.display());
        router = router.nest_service("/static", ServeDir::new(static_dir));
    }

    router
        .fallback(routes::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
