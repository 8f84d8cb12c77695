//! CSV export of already-fetched bookings: every field quoted, comma
//! separated, `\n` line endings, no byte order mark.

use chrono::NaiveDate;
use escale_core::tourisme::TouristicPlaceBooking;

const HEADER: [&str; 13] = [
    "Confirmation",
    "Lieu",
    "Date de visite",
    "Heure",
    "Type de billet",
    "Billets",
    "Montant total",
    "Frais de service",
    "Statut",
    "Paiement",
    "Contact",
    "Email",
    "Créé le",
];

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn write_record<S: AsRef<str>>(out: &mut String, fields: &[S]) {
    let line = fields.iter().map(|f| quote(f.as_ref())).collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push('\n');
}

pub fn bookings_to_csv(bookings: &[TouristicPlaceBooking]) -> String {
    let mut out = String::new();
    write_record(&mut out, &HEADER);

    for b in bookings {
        let row = [
            b.confirmation_number.clone(),
            b.place_title.clone().unwrap_or_else(|| b.place_id.clone()),
            b.visit_date.format("%Y-%m-%d").to_string(),
            b.visit_time.clone().unwrap_or_default(),
            b.ticket_type.to_string(),
            b.number_of_tickets.to_string(),
            format!("{:.2}", b.total_amount),
            format!("{:.2}", b.service_fee),
            b.status.to_string(),
            b.payment_status.to_string(),
            b.contact_name.clone().unwrap_or_default(),
            b.contact_email.clone().unwrap_or_default(),
            b.created_at.map(|d| d.to_rfc3339()).unwrap_or_default(),
        ];
        write_record(&mut out, &row);
    }

    out
}

/// `reservations-2025-07-01.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("reservations-{}.csv", date.format("%Y-%m-%d"))
}
