use chrono::NaiveDate;
use escale_catalog::pricing::PricingEngine;
use escale_core::repository::{BookingAdminApi, Page, TourismeApi};
use escale_core::tourisme::{
    Availability, BookingQuery, BookingStatus, ReservationData, TouristicPlaceBooking,
};
use escale_core::CoreError;
use escale_shared::Masked;
use std::sync::Arc;
use tracing::{info, warn};

use crate::export::bookings_to_csv;
use crate::reservation::{ReservationError, ReservationForm};
use crate::status::{BookingStatusManager, TransitionError};

/// Drives the public booking flow against the upstream API.
#[derive(Clone)]
pub struct ReservationService {
    api: Arc<dyn TourismeApi>,
    pricing: Arc<PricingEngine>,
}

impl ReservationService {
    pub fn new(api: Arc<dyn TourismeApi>, pricing: Arc<PricingEngine>) -> Self {
        Self { api, pricing }
    }

    pub fn pricing(&self) -> &PricingEngine {
        &self.pricing
    }

    pub async fn open(&self, place_id: &str) -> Result<ReservationForm, ReservationError> {
        let place = self.api.get_place(place_id).await?;
        Ok(ReservationForm::open(&place))
    }

    /// Polls availability for the form's current date and stores the answer.
    pub async fn refresh_availability(
        &self,
        form: &mut ReservationForm,
    ) -> Result<Availability, ReservationError> {
        let date = form
            .data()
            .visit_date
            .ok_or_else(|| ReservationError::Validation("Veuillez choisir une date de visite".to_string()))?;
        let availability = self.api.check_availability(&form.data().place_id, date).await?;
        form.record_availability(date, availability);
        Ok(availability)
    }

    /// Posts the form. On success the form is reset and the created booking returned.
    pub async fn submit(
        &self,
        form: &mut ReservationForm,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<TouristicPlaceBooking, ReservationError> {
        let submission = form.to_submission(user_id, &self.pricing, today)?;

        let booking = self.api.create_booking(&submission).await.map_err(|e| {
            warn!("Booking for place {} by {} failed: {}", submission.place_id, submission.user_id, e);
            match e {
                CoreError::UpstreamError { message, .. } if !message.trim().is_empty() => {
                    ReservationError::Rejected(message)
                }
                other => ReservationError::Core(other),
            }
        })?;

        info!(
            "Booking {} created for place {} by {}",
            booking.confirmation_number,
            booking.place_id,
            Masked(user_id.to_string())
        );
        form.reset();
        Ok(booking)
    }

    /// Whole flow for a client that posts the form in one request:
    /// load the place, poll availability for the chosen date, then submit.
    pub async fn book(
        &self,
        data: ReservationData,
        user_id: &str,
        today: NaiveDate,
    ) -> Result<TouristicPlaceBooking, ReservationError> {
        let place = self.api.get_place(&data.place_id).await?;
        let mut form = ReservationForm::from_data(&place, data);
        if form.data().number_of_tickets == 0 {
            return Err(ReservationError::Validation("Au moins un billet est requis".to_string()));
        }
        if form.data().visit_date.is_some() {
            self.refresh_availability(&mut form).await?;
        }
        self.submit(&mut form, user_id, today).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BookingAdminError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Back-office operations on bookings.
#[derive(Clone)]
pub struct BookingAdminService {
    api: Arc<dyn BookingAdminApi>,
}

impl BookingAdminService {
    pub fn new(api: Arc<dyn BookingAdminApi>) -> Self {
        Self { api }
    }

    pub async fn list(&self, query: &BookingQuery) -> Result<Page<TouristicPlaceBooking>, BookingAdminError> {
        Ok(self.api.list_bookings(query).await?)
    }

    /// Patches the status after checking the transition against the current one.
    pub async fn update_status(
        &self,
        id: &str,
        target: BookingStatus,
    ) -> Result<TouristicPlaceBooking, BookingAdminError> {
        let current = self.api.get_booking(id).await?;
        BookingStatusManager::check(current.status, target)?;
        let updated = self.api.update_booking_status(id, target).await?;
        info!("Booking {} moved from {} to {}", updated.confirmation_number, current.status, updated.status);
        Ok(updated)
    }

    /// CSV of the bookings matching `query` (all pages).
    pub async fn export_csv(&self, query: &BookingQuery) -> Result<String, BookingAdminError> {
        let mut query = query.clone();
        let mut page_no = query.page.unwrap_or(1).max(1);
        let mut bookings = Vec::new();

        loop {
            query.page = Some(page_no);
            let page = self.api.list_bookings(&query).await?;
            let fetched = page.items.len();
            bookings.extend(page.items);

            let has_more = match page.pagination {
                Some(p) => page_no < p.total_pages && fetched > 0,
                None => false,
            };
            if !has_more {
                break;
            }
            page_no += 1;
        }

        info!("Exporting {} bookings", bookings.len());
        Ok(bookings_to_csv(&bookings))
    }
}
