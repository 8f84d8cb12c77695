use axum::{
    http::{header, Method},
    routing::get,
    Json, Router,
};
use escale_shared::ApiEnvelope;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod bookings;
pub mod error;
pub mod favorites;
pub mod media;
pub mod middleware;
pub mod places;
pub mod provider;
pub mod reservations;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::USER_AGENT]);

    Router::new()
        .route("/health", get(health))
        .merge(places::routes())
        .merge(media::routes())
        .merge(reservations::routes(&state))
        .merge(favorites::routes(&state))
        .merge(admin::routes(&state))
        .merge(bookings::routes(&state))
        .merge(provider::routes(&state))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<ApiEnvelope<Value>> {
    Json(ApiEnvelope::ok(json!({ "status": "ok" })))
}
