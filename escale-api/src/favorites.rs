use axum::{
    extract::{Path, State},
    middleware::from_fn_with_state,
    routing::{get, post},
    Extension, Json, Router,
};
use escale_shared::ApiEnvelope;
use serde::Serialize;

use crate::error::AppError;
use crate::middleware::{customer_auth_middleware, CustomerClaims};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleResponse {
    pub episode_id: String,
    pub favorite: bool,
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/favorites", get(list_favorites))
        .route("/v1/favorites/{episode_id}/toggle", post(toggle_favorite))
        .route_layer(from_fn_with_state(state.clone(), customer_auth_middleware))
}

async fn list_favorites(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Json<ApiEnvelope<Vec<String>>>, AppError> {
    let favorites = state.favorites.list(&claims.sub).await?;
    Ok(Json(ApiEnvelope::ok(favorites.into_iter().collect())))
}

async fn toggle_favorite(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(episode_id): Path<String>,
) -> Result<Json<ApiEnvelope<ToggleResponse>>, AppError> {
    if episode_id.trim().is_empty() {
        return Err(AppError::ValidationError("Épisode inconnu".to_string()));
    }
    let favorite = state.favorites.toggle(&claims.sub, &episode_id).await?;
    Ok(Json(ApiEnvelope::ok(ToggleResponse { episode_id, favorite })))
}
