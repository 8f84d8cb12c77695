pub mod availability;
pub mod favorites;
pub mod media;
pub mod places;
pub mod pricing;

pub use availability::{AvailabilityCheck, SubmitBlocker};
pub use favorites::{toggle_favorite, InMemoryFavorites};
pub use pricing::{PricingConfig, PricingEngine, PricingError, TicketQuote};
