pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::HeaderValue,
    routing::get,
};
use state::AppState;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.app.cors_origins);

    let dashboard_routes = Router::new()
        .route("/", get(routes::dashboard::get))
        .route("/metrics", get(routes::dashboard::metrics))
        .route("/metrics/writes", get(routes::dashboard::write_stats));

    let activity_routes = Router::new().route(
        "/",
        get(routes::activity::list).post(routes::activity::create),
    );

    let api = Router::new()
        .route("/health", get(routes::health::check))
        .nest("/dashboard", dashboard_routes)
        .nest("/activity", activity_routes);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    cors.allow_origin(allowed)
}
