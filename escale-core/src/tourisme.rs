use chrono::{DateTime, NaiveDate, Utc};
use escale_shared::Masked;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::de::{lenient_f64, string_or_number};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// A bookable visit destination (monument, museum, park...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LieuTouristique {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: Option<String>,
    /// Entrance price per adult ticket, in euros. Zero means free entry.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub coordinates: Option<Coordinates>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub provider_id: Option<String>,
}

/// Visitor category, each with its own fraction of the base price.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    #[default]
    Adult,
    Child,
    Student,
    Senior,
}

impl TicketType {
    pub const ALL: [TicketType; 4] = [
        TicketType::Adult,
        TicketType::Child,
        TicketType::Student,
        TicketType::Senior,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TicketType::Adult => "adult",
            TicketType::Child => "child",
            TicketType::Student => "student",
            TicketType::Senior => "senior",
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adult" => Ok(TicketType::Adult),
            "child" => Ok(TicketType::Child),
            "student" => Ok(TicketType::Student),
            "senior" => Ok(TicketType::Senior),
            other => Err(format!("unknown ticket type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Card,
    Paypal,
    OnSite,
}

/// Form data for a touristic place reservation.
///
/// Date and time stay optional while the visitor is still filling the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReservationData {
    pub place_id: String,
    pub visit_date: Option<NaiveDate>,
    pub visit_time: Option<String>,
    pub number_of_tickets: u32,
    pub ticket_type: TicketType,
    #[serde(default)]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

/// Remaining capacity for a place on a given date.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub available: bool,
    #[serde(default)]
    pub available_spots: u32,
    #[serde(default)]
    pub total_capacity: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booking as the server owns it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TouristicPlaceBooking {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub confirmation_number: String,
    #[serde(default)]
    pub place_id: String,
    #[serde(default)]
    pub place_title: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub visit_date: NaiveDate,
    #[serde(default)]
    pub visit_time: Option<String>,
    #[serde(default)]
    pub ticket_type: TicketType,
    pub number_of_tickets: u32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub service_fee: f64,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body posted to the booking endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSubmission {
    pub place_id: String,
    pub user_id: Masked<String>,
    pub visit_date: NaiveDate,
    pub visit_time: String,
    pub number_of_tickets: u32,
    pub ticket_type: TicketType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub payment_method: PaymentMethod,
    pub total_amount: f64,
    pub service_fee: f64,
}

/// Filters accepted by the place listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

/// Filters accepted by the admin booking listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_type_parsing() {
        assert_eq!("Student".parse::<TicketType>().unwrap(), TicketType::Student);
        assert_eq!(" senior ".parse::<TicketType>().unwrap(), TicketType::Senior);
        assert!("vip".parse::<TicketType>().is_err());
        assert_eq!(TicketType::default(), TicketType::Adult);
    }

    #[test]
    fn test_place_parses_string_price() {
        let raw = r#"{
            "id": 5, "title": "Musée des Beaux-Arts", "category": "musee", "city": "Lyon",
            "price": "12.5", "rating": 4.6, "reviewCount": 321,
            "amenities": ["parking", "wifi"], "coordinates": {"lat": 45.76, "lng": 4.83}
        }"#;
        let place: LieuTouristique = serde_json::from_str(raw).unwrap();
        assert_eq!(place.id, "5");
        assert!((place.price - 12.5).abs() < 1e-9);
        assert_eq!(place.review_count, 321);
        assert_eq!(place.amenities.len(), 2);
        assert!(place.coordinates.is_some());
    }

    #[test]
    fn test_booking_status_round_trips_lowercase() {
        let raw = r#"{
            "id": "b-1", "confirmationNumber": "TR-2024-0001", "placeId": "5",
            "status": "confirmed", "paymentStatus": "paid", "visitDate": "2025-06-01",
            "ticketType": "child", "numberOfTickets": 2, "totalAmount": 13.2, "serviceFee": 1.2
        }"#;
        let booking: TouristicPlaceBooking = serde_json::from_str(raw).unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.payment_status, PaymentStatus::Paid);
        assert_eq!(booking.ticket_type, TicketType::Child);

        let json = serde_json::to_value(&booking).unwrap();
        assert_eq!(json["status"], "confirmed");
        assert_eq!(json["paymentStatus"], "paid");
    }

    #[test]
    fn test_submission_serializes_real_user_id() {
        let submission = BookingSubmission {
            place_id: "5".into(),
            user_id: Masked("user-42".to_string()),
            visit_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            visit_time: "10:00".into(),
            number_of_tickets: 2,
            ticket_type: TicketType::Adult,
            special_requests: None,
            payment_method: PaymentMethod::Card,
            total_amount: 22.0,
            service_fee: 2.0,
        };
        let json = serde_json::to_value(&submission).unwrap();
        assert_eq!(json["userId"], "user-42");
        assert_eq!(json["visitDate"], "2025-06-01");
        assert!(json.get("specialRequests").is_none());
        assert!(format!("{:?}", submission).contains("********"));
    }
}
