use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::get,
    Extension, Json, Router,
};
use chrono::Utc;
use escale_booking::{DashboardStats, ProviderDashboard};
use escale_core::tourisme::{LieuTouristique, TouristicPlaceBooking};
use escale_shared::ApiEnvelope;
use serde::Serialize;

use crate::error::AppError;
use crate::middleware::{provider_auth_middleware, ProviderClaims};
use crate::state::AppState;

/// Bookings listed on the dashboard, newest visit first.
const RECENT_BOOKINGS: usize = 10;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub stats: DashboardStats,
    pub places: Vec<LieuTouristique>,
    pub recent_bookings: Vec<TouristicPlaceBooking>,
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/provider/dashboard", get(dashboard))
        .route_layer(from_fn_with_state(state.clone(), provider_auth_middleware))
}

async fn dashboard(
    State(state): State<AppState>,
    Extension(claims): Extension<ProviderClaims>,
) -> Result<Json<ApiEnvelope<DashboardResponse>>, AppError> {
    let provider_id = claims.provider_id();
    let places = state.provider.list_provider_places(provider_id).await?;
    let mut bookings = state.provider.list_provider_bookings(provider_id).await?;

    let stats = ProviderDashboard::compute(&places, &bookings, Utc::now().date_naive());

    bookings.sort_by(|a, b| b.visit_date.cmp(&a.visit_date));
    bookings.truncate(RECENT_BOOKINGS);

    Ok(Json(ApiEnvelope::ok(DashboardResponse {
        stats,
        places,
        recent_bookings: bookings,
    })))
}
