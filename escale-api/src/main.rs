use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use escale_api::{app, state::{AppState, AuthConfig}};
use escale_booking::{BookingAdminService, ReservationService};
use escale_catalog::{InMemoryFavorites, PricingConfig, PricingEngine};
use escale_core::repository::{FavoritesStore, RateLimiter};
use escale_store::{ApiClient, CatalogueReader, HttpBackend, RedisClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "escale_api=debug,escale_store=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = escale_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting Escale gateway on port {}", config.server.port);

    let client = ApiClient::new(&config.upstream).context("Failed to build upstream client")?;
    tracing::info!("Upstream API at {}", client.endpoint_url("/"));
    let backend = Arc::new(HttpBackend::new(client));

    // Redis is optional: favourites stay in memory and rate limiting is off without it.
    let (favorites, rate_limiter): (Arc<dyn FavoritesStore>, Option<Arc<dyn RateLimiter>>) =
        match &config.redis.url {
            Some(url) => {
                let redis = Arc::new(RedisClient::new(url).await.context("Failed to connect to Redis")?);
                let favorites: Arc<dyn FavoritesStore> = redis.clone();
                let limiter: Arc<dyn RateLimiter> = redis;
                (favorites, Some(limiter))
            }
            None => {
                tracing::warn!("No redis.url configured, favourites kept in process memory");
                let favorites: Arc<dyn FavoritesStore> = Arc::new(InMemoryFavorites::new());
                (favorites, None)
            }
        };

    let pricing = Arc::new(PricingEngine::new(PricingConfig {
        service_fee_rate: config.booking.service_fee_rate,
        ..PricingConfig::default()
    }));

    let app_state = AppState {
        catalogue: CatalogueReader::new(backend.clone(), backend.clone(), config.fallback.enabled),
        tourisme: backend.clone(),
        reservations: ReservationService::new(backend.clone(), pricing.clone()),
        bookings: BookingAdminService::new(backend.clone()),
        metiers: backend.clone(),
        services: backend.clone(),
        portraits: backend.clone(),
        provider: backend.clone(),
        favorites,
        rate_limiter,
        rate_limit: config.rate_limit.clone(),
        pricing,
        auth: AuthConfig {
            secret: config.auth.jwt_secret.clone(),
        },
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
