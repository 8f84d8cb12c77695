use escale_core::tourisme::Availability;
use serde::Serialize;

/// Reason the booking form refuses to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum SubmitBlocker {
    /// No availability answer for the chosen date yet.
    AvailabilityUnknown,
    SoldOut,
    NotEnoughSpots { requested: u32, available: u32 },
    MissingTimeSlot,
}

impl SubmitBlocker {
    pub fn message(&self) -> String {
        match self {
            SubmitBlocker::AvailabilityUnknown => "Veuillez choisir une date de visite".to_string(),
            SubmitBlocker::SoldOut => "Aucune place disponible à cette date".to_string(),
            SubmitBlocker::NotEnoughSpots { requested, available } => format!(
                "Seulement {} place(s) disponible(s) pour {} billet(s) demandé(s)",
                available, requested
            ),
            SubmitBlocker::MissingTimeSlot => "Veuillez choisir un créneau horaire".to_string(),
        }
    }
}

/// Client-side reading of an availability answer. Advisory only; the server
/// makes the final accept/reject decision when the booking is created.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityCheck {
    availability: Option<Availability>,
}

impl AvailabilityCheck {
    pub fn new(availability: Option<Availability>) -> Self {
        Self { availability }
    }

    pub fn availability(&self) -> Option<Availability> {
        self.availability
    }

    /// Share of capacity already taken, 0.0 when capacity is unknown.
    pub fn utilization(&self) -> f64 {
        match self.availability {
            Some(a) if a.total_capacity > 0 => {
                1.0 - (a.available_spots.min(a.total_capacity) as f64 / a.total_capacity as f64)
            }
            _ => 0.0,
        }
    }

    /// Everything that currently blocks submission, in display order.
    pub fn blockers(&self, visit_time: Option<&str>, tickets: u32) -> Vec<SubmitBlocker> {
        let mut blockers = Vec::new();

        match self.availability {
            None => blockers.push(SubmitBlocker::AvailabilityUnknown),
            Some(a) if !a.available => blockers.push(SubmitBlocker::SoldOut),
            // A zero spot count with `available` set means the server did not report spots.
            Some(a) if a.available_spots > 0 && tickets > a.available_spots => {
                blockers.push(SubmitBlocker::NotEnoughSpots {
                    requested: tickets,
                    available: a.available_spots,
                })
            }
            Some(_) => {}
        }

        if visit_time.map(str::trim).map_or(true, str::is_empty) {
            blockers.push(SubmitBlocker::MissingTimeSlot);
        }

        blockers
    }

    pub fn can_submit(&self, visit_time: Option<&str>, tickets: u32) -> bool {
        self.blockers(visit_time, tickets).is_empty()
    }
}
