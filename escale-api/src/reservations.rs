use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::post,
    Extension, Json, Router,
};
use chrono::Utc;
use escale_core::tourisme::{ReservationData, TouristicPlaceBooking};
use escale_shared::{ApiEnvelope, Masked};
use tracing::info;

use crate::error::AppError;
use crate::middleware::{customer_auth_middleware, CustomerClaims};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/reservations", post(create_reservation))
        .route_layer(from_fn_with_state(state.clone(), customer_auth_middleware))
}

async fn create_reservation(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(data): Json<ReservationData>,
) -> Result<(StatusCode, Json<ApiEnvelope<TouristicPlaceBooking>>), AppError> {
    info!(
        "Reservation request for place {} by {}",
        data.place_id,
        Masked(claims.email.as_str())
    );

    let today = Utc::now().date_naive();
    let booking = state.reservations.book(data, &claims.sub, today).await?;
    let message = format!("Réservation enregistrée, confirmation {}", booking.confirmation_number);

    Ok((StatusCode::CREATED, Json(ApiEnvelope::ok(booking).with_message(message))))
}
