use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
    Extension, Json, Router,
};
use escale_core::admin::{ListQuery, Metier, Portrait, Resource, ServiceOffer};
use escale_core::repository::CrudApi;
use escale_shared::ApiEnvelope;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use crate::error::AppError;
use crate::middleware::{admin_auth_middleware, AdminClaims};
use crate::state::AppState;

/// Ties an admin resource to the upstream client held in [`AppState`].
pub trait AdminResource: Resource {
    fn api(state: &AppState) -> Arc<dyn CrudApi<Self>>;
}

impl AdminResource for Metier {
    fn api(state: &AppState) -> Arc<dyn CrudApi<Self>> {
        state.metiers.clone()
    }
}

impl AdminResource for ServiceOffer {
    fn api(state: &AppState) -> Arc<dyn CrudApi<Self>> {
        state.services.clone()
    }
}

impl AdminResource for Portrait {
    fn api(state: &AppState) -> Arc<dyn CrudApi<Self>> {
        state.portraits.clone()
    }
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .merge(crud_routes::<Metier>("/v1/admin/metiers"))
        .merge(crud_routes::<ServiceOffer>("/v1/admin/services"))
        .merge(crud_routes::<Portrait>("/v1/admin/portraits"))
        .route_layer(from_fn_with_state(state.clone(), admin_auth_middleware))
}

fn crud_routes<R: AdminResource>(base: &str) -> Router<AppState> {
    Router::new()
        .route(base, get(list::<R>).post(create::<R>))
        .route(
            &format!("{}/{{id}}", base),
            get(fetch::<R>).put(update::<R>).delete(remove::<R>),
        )
}

// ============================================================================
// Handlers
// ============================================================================

async fn list<R: AdminResource>(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ApiEnvelope<Vec<R>>>, AppError> {
    let page = R::api(&state).list(&query).await?;
    Ok(Json(ApiEnvelope::ok(page.items).with_pagination(page.pagination)))
}

async fn fetch<R: AdminResource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiEnvelope<R>>, AppError> {
    let item = R::api(&state).get(&id).await?;
    Ok(Json(ApiEnvelope::ok(item)))
}

async fn create<R: AdminResource>(
    State(state): State<AppState>,
    Extension(claims): Extension<AdminClaims>,
    Json(draft): Json<R::Draft>,
) -> Result<(StatusCode, Json<ApiEnvelope<R>>), AppError> {
    draft.validate()?;
    let created = R::api(&state).create(&draft).await?;
    info!("{} {} created by admin {}", R::LABEL, created.id(), claims.sub);
    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(created))))
}

async fn update<R: AdminResource>(
    State(state): State<AppState>,
    Extension(claims): Extension<AdminClaims>,
    Path(id): Path<String>,
    Json(draft): Json<R::Draft>,
) -> Result<Json<ApiEnvelope<R>>, AppError> {
    draft.validate()?;
    let updated = R::api(&state).update(&id, &draft).await?;
    info!("{} {} updated by admin {}", R::LABEL, id, claims.sub);
    Ok(Json(ApiEnvelope::ok(updated)))
}

async fn remove<R: AdminResource>(
    State(state): State<AppState>,
    Extension(claims): Extension<AdminClaims>,
    Path(id): Path<String>,
) -> Result<Json<ApiEnvelope<()>>, AppError> {
    R::api(&state).delete(&id).await?;
    info!("{} {} deleted by admin {}", R::LABEL, id, claims.sub);
    Ok(Json(ApiEnvelope::ok(()).with_message(format!("{} supprimé", R::LABEL))))
}
