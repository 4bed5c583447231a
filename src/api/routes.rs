use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::{handlers, state::AppState};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/chat", post(handlers::chat))
        .route("/greeting", get(handlers::greeting))
        .route("/suggestions", get(handlers::suggestions))
        .route(
            "/errors",
            get(handlers::get_errors).delete(handlers::clear_errors),
        )
}
