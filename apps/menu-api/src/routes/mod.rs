//! Route table.

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod health;
pub mod menu;
pub mod orders;
pub mod promotions;

/// All routes, no middleware, no state.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(menu::router())
        .merge(promotions::router())
        .merge(orders::router())
        .merge(health::router())
}

/// The full application: routes, middleware and state.
///
/// Used by the server and by in-process tests.
pub fn build_app(state: AppState) -> Router {
    build_router()
        // the customer site is served from a different origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
