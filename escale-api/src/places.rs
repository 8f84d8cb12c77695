use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use escale_catalog::availability::{AvailabilityCheck, SubmitBlocker};
use escale_catalog::places::PlaceFilter;
use escale_catalog::TicketQuote;
use escale_core::tourisme::{Availability, LieuTouristique, PlaceQuery, TicketType};
use escale_shared::ApiEnvelope;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// A place as shown on listing cards.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceCard {
    #[serde(flatten)]
    pub place: LieuTouristique,
    pub price_label: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteParams {
    #[serde(default)]
    pub ticket_type: TicketType,
    #[serde(default = "one")]
    pub count: u32,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityParams {
    pub date: NaiveDate,
    pub count: Option<u32>,
    pub time: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityView {
    #[serde(flatten)]
    pub availability: Availability,
    pub date: NaiveDate,
    pub utilization: f64,
    pub can_submit: bool,
    /// Reasons the reservation form cannot be sent yet, in display order.
    pub blockers: Vec<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/places", get(list_places))
        .route("/v1/places/{id}", get(get_place))
        .route("/v1/places/{id}/quote", get(quote))
        .route("/v1/places/{id}/availability", get(availability))
}

// ============================================================================
// Handlers
// ============================================================================

async fn list_places(
    State(state): State<AppState>,
    Query(query): Query<PlaceQuery>,
    Query(filter): Query<PlaceFilter>,
) -> Result<Json<ApiEnvelope<Vec<PlaceCard>>>, AppError> {
    let sourced = state.catalogue.places(&query).await?;
    let fallback = sourced.is_fallback();
    let page = sourced.value;
    // Upstream totals only hold while nothing is dropped from the page here.
    let pagination = if filter.narrows_locally() { None } else { page.pagination };

    let cards = filter
        .apply(page.items)
        .into_iter()
        .map(|place| PlaceCard {
            price_label: state.pricing.price_label(place.price),
            place,
        })
        .collect();

    Ok(Json(
        ApiEnvelope::ok(cards)
            .with_pagination(pagination)
            .with_fallback(fallback),
    ))
}

async fn get_place(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiEnvelope<PlaceCard>>, AppError> {
    let sourced = state.catalogue.place(&id).await?;
    let fallback = sourced.is_fallback();
    let place = sourced.value;

    Ok(Json(
        ApiEnvelope::ok(PlaceCard {
            price_label: state.pricing.price_label(place.price),
            place,
        })
        .with_fallback(fallback),
    ))
}

async fn quote(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<QuoteParams>,
) -> Result<Json<ApiEnvelope<TicketQuote>>, AppError> {
    let sourced = state.catalogue.place(&id).await?;
    let quote = state
        .pricing
        .quote(sourced.value.price, params.ticket_type, params.count)?;

    Ok(Json(ApiEnvelope::ok(quote).with_fallback(sourced.is_fallback())))
}

async fn availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<AvailabilityParams>,
) -> Result<Json<ApiEnvelope<AvailabilityView>>, AppError> {
    let availability = state.tourisme.check_availability(&id, params.date).await?;
    let check = AvailabilityCheck::new(Some(availability));
    // Without a `time` parameter the caller only asks about capacity.
    let blockers: Vec<SubmitBlocker> = check
        .blockers(params.time.as_deref(), params.count.unwrap_or(1))
        .into_iter()
        .filter(|b| params.time.is_some() || *b != SubmitBlocker::MissingTimeSlot)
        .collect();

    Ok(Json(ApiEnvelope::ok(AvailabilityView {
        availability,
        date: params.date,
        utilization: check.utilization(),
        can_submit: blockers.is_empty(),
        blockers: blockers.iter().map(|b| b.message()).collect(),
    })))
}
