use axum::{
    extract::{Path, Query, State},
    http::header,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, patch},
    Extension, Json, Router,
};
use chrono::Utc;
use escale_booking::export_file_name;
use escale_core::tourisme::{BookingQuery, BookingStatus, TouristicPlaceBooking};
use escale_shared::ApiEnvelope;
use serde::Deserialize;
use tracing::info;

use crate::error::AppError;
use crate::middleware::{admin_auth_middleware, AdminClaims};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: BookingStatus,
}

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/admin/bookings", get(list_bookings))
        .route("/v1/admin/bookings/export", get(export_bookings))
        .route("/v1/admin/bookings/{id}/status", patch(update_status))
        .route_layer(from_fn_with_state(state.clone(), admin_auth_middleware))
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> Result<Json<ApiEnvelope<Vec<TouristicPlaceBooking>>>, AppError> {
    let page = state.bookings.list(&query).await?;
    Ok(Json(ApiEnvelope::ok(page.items).with_pagination(page.pagination)))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(claims): Extension<AdminClaims>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> Result<Json<ApiEnvelope<TouristicPlaceBooking>>, AppError> {
    let booking = state.bookings.update_status(&id, req.status).await?;
    info!("Booking {} set to {} by admin {}", id, booking.status, claims.sub);
    Ok(Json(ApiEnvelope::ok(booking).with_message("Statut mis à jour")))
}

async fn export_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingQuery>,
) -> Result<impl IntoResponse, AppError> {
    let csv = state.bookings.export_csv(&query).await?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(Utc::now().date_naive())
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
