use std::sync::Arc;
use escale_booking::{BookingAdminService, ReservationService};
use escale_catalog::PricingEngine;
use escale_core::admin::{Metier, Portrait, ServiceOffer};
use escale_core::repository::{CrudApi, FavoritesStore, ProviderApi, RateLimiter, TourismeApi};
use escale_store::app_config::RateLimitConfig;
use escale_store::CatalogueReader;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub catalogue: CatalogueReader,
    pub tourisme: Arc<dyn TourismeApi>,
    pub reservations: ReservationService,
    pub bookings: BookingAdminService,
    pub metiers: Arc<dyn CrudApi<Metier>>,
    pub services: Arc<dyn CrudApi<ServiceOffer>>,
    pub portraits: Arc<dyn CrudApi<Portrait>>,
    pub provider: Arc<dyn ProviderApi>,
    pub favorites: Arc<dyn FavoritesStore>,
    /// Unset means no rate limiting (no Redis configured).
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
    pub rate_limit: RateLimitConfig,
    pub pricing: Arc<PricingEngine>,
    pub auth: AuthConfig,
}
