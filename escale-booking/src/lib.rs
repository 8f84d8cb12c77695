pub mod dashboard;
pub mod export;
pub mod reservation;
pub mod service;
pub mod status;

pub use dashboard::{DashboardStats, ProviderDashboard};
pub use export::{bookings_to_csv, export_file_name};
pub use reservation::{ReservationError, ReservationForm};
pub use service::{BookingAdminService, ReservationService};
pub use status::{BookingStatusManager, TransitionError};
