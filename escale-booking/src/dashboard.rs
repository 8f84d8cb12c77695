use chrono::NaiveDate;
use escale_core::tourisme::{BookingStatus, LieuTouristique, PaymentStatus, TouristicPlaceBooking};
use serde::Serialize;
use std::collections::BTreeMap;

/// Figures shown on a provider's dashboard.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub places: usize,
    pub total_bookings: usize,
    pub bookings_by_status: BTreeMap<String, usize>,
    /// Tickets on bookings that were not cancelled.
    pub tickets_sold: u64,
    /// Sum of paid bookings.
    pub revenue: f64,
    /// Sum of live bookings still awaiting payment.
    pub pending_revenue: f64,
    pub upcoming_visits: usize,
    pub average_rating: Option<f64>,
}

pub struct ProviderDashboard;

impl ProviderDashboard {
    pub fn compute(places: &[LieuTouristique], bookings: &[TouristicPlaceBooking], today: NaiveDate) -> DashboardStats {
        let mut bookings_by_status = BTreeMap::new();
        let mut tickets_sold = 0u64;
        let mut revenue = 0.0;
        let mut pending_revenue = 0.0;
        let mut upcoming_visits = 0;

        for booking in bookings {
            *bookings_by_status.entry(booking.status.to_string()).or_insert(0) += 1;

            let live = booking.status != BookingStatus::Cancelled;
            if live {
                tickets_sold += u64::from(booking.number_of_tickets);
            }

            match booking.payment_status {
                PaymentStatus::Paid => revenue += booking.total_amount,
                PaymentStatus::Pending if live => pending_revenue += booking.total_amount,
                _ => {}
            }

            let open = matches!(booking.status, BookingStatus::Pending | BookingStatus::Confirmed);
            if open && booking.visit_date >= today {
                upcoming_visits += 1;
            }
        }

        let rated: Vec<f64> = places.iter().map(|p| p.rating).filter(|r| *r > 0.0).collect();
        let average_rating = if rated.is_empty() {
            None
        } else {
            Some(rated.iter().sum::<f64>() / rated.len() as f64)
        };

        DashboardStats {
            places: places.len(),
            total_bookings: bookings.len(),
            bookings_by_status,
            tickets_sold,
            revenue,
            pending_revenue,
            upcoming_visits,
            average_rating,
        }
    }
}
