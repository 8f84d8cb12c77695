use chrono::{NaiveDate, NaiveTime};
use escale_catalog::availability::{AvailabilityCheck, SubmitBlocker};
use escale_catalog::pricing::{PricingEngine, PricingError, TicketQuote};
use escale_core::tourisme::{
    Availability, BookingSubmission, LieuTouristique, PaymentMethod, ReservationData, TicketType,
};
use escale_core::CoreError;
use escale_shared::Masked;

/// Reservation form for one touristic place.
///
/// Lifecycle: opened for a place, edited field by field, availability is
/// polled whenever the visit date changes, then submitted and reset.
#[derive(Debug, Clone)]
pub struct ReservationForm {
    place_title: String,
    base_price: f64,
    data: ReservationData,
    availability: Option<Availability>,
}

impl ReservationForm {
    pub fn open(place: &LieuTouristique) -> Self {
        Self {
            place_title: place.title.clone(),
            base_price: place.price,
            data: Self::blank(&place.id),
            availability: None,
        }
    }

    /// Rebuilds a form from data posted in one go by a client.
    pub fn from_data(place: &LieuTouristique, data: ReservationData) -> Self {
        let mut form = Self::open(place);
        form.data = ReservationData { place_id: place.id.clone(), ..data };
        form
    }

    fn blank(place_id: &str) -> ReservationData {
        ReservationData {
            place_id: place_id.to_string(),
            visit_date: None,
            visit_time: None,
            number_of_tickets: 1,
            ticket_type: TicketType::Adult,
            special_requests: None,
            payment_method: PaymentMethod::Card,
        }
    }

    pub fn data(&self) -> &ReservationData {
        &self.data
    }

    pub fn place_title(&self) -> &str {
        &self.place_title
    }

    pub fn availability(&self) -> Option<Availability> {
        self.availability
    }

    /// Returns true when the date actually changed and availability must be polled again.
    pub fn set_visit_date(&mut self, date: NaiveDate) -> bool {
        if self.data.visit_date == Some(date) {
            return false;
        }
        self.data.visit_date = Some(date);
        self.availability = None;
        true
    }

    /// Stores an availability answer unless the date moved on since it was requested.
    pub fn record_availability(&mut self, date: NaiveDate, availability: Availability) -> bool {
        if self.data.visit_date != Some(date) {
            tracing::debug!("Discarding availability for {} (form now on {:?})", date, self.data.visit_date);
            return false;
        }
        self.availability = Some(availability);
        true
    }

    pub fn set_visit_time(&mut self, time: impl Into<String>) {
        let time = time.into();
        self.data.visit_time = if time.trim().is_empty() { None } else { Some(time) };
    }

    pub fn set_ticket_type(&mut self, ticket_type: TicketType) {
        self.data.ticket_type = ticket_type;
    }

    pub fn set_ticket_count(&mut self, count: u32) -> Result<(), ReservationError> {
        if count == 0 {
            return Err(ReservationError::Validation("Au moins un billet est requis".to_string()));
        }
        self.data.number_of_tickets = count;
        Ok(())
    }

    pub fn set_special_requests(&mut self, requests: Option<String>) {
        self.data.special_requests = requests.filter(|r| !r.trim().is_empty());
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.data.payment_method = method;
    }

    pub fn quote(&self, pricing: &PricingEngine) -> Result<TicketQuote, ReservationError> {
        Ok(pricing.quote(self.base_price, self.data.ticket_type, self.data.number_of_tickets)?)
    }

    pub fn blockers(&self) -> Vec<SubmitBlocker> {
        AvailabilityCheck::new(self.availability)
            .blockers(self.data.visit_time.as_deref(), self.data.number_of_tickets)
    }

    pub fn can_submit(&self) -> bool {
        self.blockers().is_empty()
    }

    /// Checks everything that must hold before the booking is posted.
    pub fn validate(&self, today: NaiveDate) -> Result<(NaiveDate, String), ReservationError> {
        let date = self
            .data
            .visit_date
            .ok_or_else(|| ReservationError::Validation("Veuillez choisir une date de visite".to_string()))?;
        if date < today {
            return Err(ReservationError::Validation("La date de visite est déjà passée".to_string()));
        }

        let time = self
            .data
            .visit_time
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ReservationError::Validation(SubmitBlocker::MissingTimeSlot.message()))?;
        if NaiveTime::parse_from_str(time, "%H:%M").is_err() {
            return Err(ReservationError::Validation(format!("Créneau horaire invalide: {}", time)));
        }

        if self.data.number_of_tickets == 0 {
            return Err(ReservationError::Validation("Au moins un billet est requis".to_string()));
        }

        if let Some(blocker) = self.blockers().into_iter().next() {
            return Err(ReservationError::Validation(blocker.message()));
        }

        Ok((date, time.to_string()))
    }

    /// Packages the form and the visitor id into the body posted upstream.
    pub fn to_submission(
        &self,
        user_id: &str,
        pricing: &PricingEngine,
        today: NaiveDate,
    ) -> Result<BookingSubmission, ReservationError> {
        if user_id.trim().is_empty() {
            return Err(ReservationError::Validation("Veuillez vous connecter pour réserver".to_string()));
        }
        let (visit_date, visit_time) = self.validate(today)?;
        let quote = self.quote(pricing)?;

        Ok(BookingSubmission {
            place_id: self.data.place_id.clone(),
            user_id: Masked(user_id.to_string()),
            visit_date,
            visit_time,
            number_of_tickets: self.data.number_of_tickets,
            ticket_type: self.data.ticket_type,
            special_requests: self.data.special_requests.clone(),
            payment_method: self.data.payment_method,
            total_amount: quote.grand_total,
            service_fee: quote.service_fee,
        })
    }

    /// Back to a blank form for the same place.
    pub fn reset(&mut self) {
        self.data = Self::blank(&self.data.place_id);
        self.availability = None;
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReservationError {
    #[error("{0}")]
    Validation(String),

    /// The booking endpoint refused the reservation; message is the server's own.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn museum(price: f64) -> LieuTouristique {
        serde_json::from_value(serde_json::json!({
            "id": "musee-1",
            "title": "Musée des Confluences",
            "price": price,
        }))
        .unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
    }

    fn open_spots(spots: u32) -> Availability {
        Availability { available: true, available_spots: spots, total_capacity: 200 }
    }

    #[test]
    fn test_open_has_defaults() {
        let form = ReservationForm::open(&museum(12.0));
        assert_eq!(form.data().place_id, "musee-1");
        assert_eq!(form.data().number_of_tickets, 1);
        assert_eq!(form.data().ticket_type, TicketType::Adult);
        assert!(!form.can_submit());
    }

    #[test]
    fn test_date_change_clears_availability() {
        let mut form = ReservationForm::open(&museum(12.0));
        assert!(form.set_visit_date(day(10)));
        assert!(form.record_availability(day(10), open_spots(20)));
        assert!(form.availability().is_some());

        assert!(!form.set_visit_date(day(10)));
        assert!(form.availability().is_some());

        assert!(form.set_visit_date(day(11)));
        assert!(form.availability().is_none());

        // Late answer for the previous date is ignored.
        assert!(!form.record_availability(day(10), open_spots(20)));
        assert!(form.availability().is_none());
    }

    #[test]
    fn test_submission_flow() {
        let pricing = PricingEngine::default();
        let mut form = ReservationForm::open(&museum(20.0));
        form.set_visit_date(day(10));
        form.record_availability(day(10), open_spots(20));
        form.set_ticket_type(TicketType::Student);
        form.set_ticket_count(3).unwrap();
        form.set_visit_time("10:30");

        assert!(form.can_submit());
        let submission = form.to_submission("user-1", &pricing, day(1)).unwrap();
        assert_eq!(submission.visit_time, "10:30");
        assert!((submission.total_amount - 46.2).abs() < 1e-9);
        assert!((submission.service_fee - 4.2).abs() < 1e-9);

        form.reset();
        assert_eq!(form.data().number_of_tickets, 1);
        assert!(form.data().visit_date.is_none());
        assert_eq!(form.data().place_id, "musee-1");
    }

    #[test]
    fn test_missing_time_blocks_submission() {
        let pricing = PricingEngine::default();
        let mut form = ReservationForm::open(&museum(20.0));
        form.set_visit_date(day(10));
        form.record_availability(day(10), open_spots(20));

        let err = form.to_submission("user-1", &pricing, day(1)).unwrap_err();
        assert!(matches!(err, ReservationError::Validation(ref m) if m.contains("créneau")));
    }

    #[test]
    fn test_sold_out_and_past_dates_block_submission() {
        let pricing = PricingEngine::default();
        let mut form = ReservationForm::open(&museum(20.0));
        form.set_visit_date(day(10));
        form.set_visit_time("09:00");
        form.record_availability(day(10), Availability { available: false, available_spots: 0, total_capacity: 50 });
        assert!(matches!(form.validate(day(1)), Err(ReservationError::Validation(_))));

        form.record_availability(day(10), open_spots(5));
        assert!(form.validate(day(1)).is_ok());
        assert!(matches!(form.validate(day(11)), Err(ReservationError::Validation(_))));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut form = ReservationForm::open(&museum(20.0));
        assert!(form.set_ticket_count(0).is_err());

        form.set_visit_date(day(10));
        form.record_availability(day(10), open_spots(5));
        form.set_visit_time("dix heures");
        assert!(form.validate(day(1)).is_err());

        form.set_visit_time("10:00");
        let pricing = PricingEngine::default();
        assert!(form.to_submission("  ", &pricing, day(1)).is_err());
    }

    #[test]
    fn test_free_place_quote() {
        let pricing = PricingEngine::default();
        let mut form = ReservationForm::open(&museum(0.0));
        form.set_ticket_count(5).unwrap();
        let quote = form.quote(&pricing).unwrap();
        assert_eq!(quote.grand_total, 0.0);
        assert_eq!(quote.label, "Gratuit");
    }
}
