pub mod posts;
pub mod profile;
pub mod users;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// The full API, state attached and ready to serve.
pub fn app(state: AppState) -> Router {
    let mut app = Router::new()
        .nest("/api/users", users::router())
        .nest("/api/profile", profile::router())
        .nest("/api/posts", posts::router())
        .layer(TraceLayer::new_for_http());

    if state.config.server.cors {
        app = app.layer(CorsLayer::permissive());
    }

    app.with_state(state)
}
