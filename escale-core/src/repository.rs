use async_trait::async_trait;
use chrono::NaiveDate;
use escale_shared::Pagination;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::admin::{ListQuery, Resource};
use crate::media::{MediaEpisode, MediaQuery, VideoEpisode};
use crate::tourisme::{
    Availability, BookingQuery, BookingStatus, BookingSubmission, LieuTouristique, PlaceQuery,
    TouristicPlaceBooking,
};
use crate::CoreResult;

/// One page of a listing plus the upstream pagination block, if any.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, pagination: Option<Pagination>) -> Self {
        Self { items, pagination }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Where a payload came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataOrigin {
    Live,
    /// Built-in demo data substituted after an upstream failure.
    Fallback,
}

/// A payload tagged with its origin so callers can flag demo content.
#[derive(Debug, Clone)]
pub struct Sourced<T> {
    pub value: T,
    pub origin: DataOrigin,
}

impl<T> Sourced<T> {
    pub fn live(value: T) -> Self {
        Self { value, origin: DataOrigin::Live }
    }

    pub fn fallback(value: T) -> Self {
        Self { value, origin: DataOrigin::Fallback }
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == DataOrigin::Fallback
    }
}

/// Touristic places and the public booking flow (`/tourisme/*`).
#[async_trait]
pub trait TourismeApi: Send + Sync {
    async fn list_places(&self, query: &PlaceQuery) -> CoreResult<Page<LieuTouristique>>;

    async fn get_place(&self, id: &str) -> CoreResult<LieuTouristique>;

    async fn check_availability(
        &self,
        place_id: &str,
        visit_date: NaiveDate,
    ) -> CoreResult<Availability>;

    async fn create_booking(
        &self,
        submission: &BookingSubmission,
    ) -> CoreResult<TouristicPlaceBooking>;
}

/// Podcast and video catalogue.
#[async_trait]
pub trait MediaApi: Send + Sync {
    async fn list_podcasts(&self, query: &MediaQuery) -> CoreResult<Page<MediaEpisode>>;

    async fn list_videos(&self, query: &MediaQuery) -> CoreResult<Page<VideoEpisode>>;
}

/// Create/list/get/update/delete cycle for one admin resource.
#[async_trait]
pub trait CrudApi<R: Resource>: Send + Sync {
    async fn list(&self, query: &ListQuery) -> CoreResult<Page<R>>;

    async fn get(&self, id: &str) -> CoreResult<R>;

    async fn create(&self, draft: &R::Draft) -> CoreResult<R>;

    async fn update(&self, id: &str, draft: &R::Draft) -> CoreResult<R>;

    async fn delete(&self, id: &str) -> CoreResult<()>;
}

/// Back-office view of touristic place bookings.
#[async_trait]
pub trait BookingAdminApi: Send + Sync {
    async fn list_bookings(&self, query: &BookingQuery) -> CoreResult<Page<TouristicPlaceBooking>>;

    async fn get_booking(&self, id: &str) -> CoreResult<TouristicPlaceBooking>;

    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> CoreResult<TouristicPlaceBooking>;
}

/// Provider ("expert") dashboard data.
#[async_trait]
pub trait ProviderApi: Send + Sync {
    async fn list_provider_places(&self, provider_id: &str) -> CoreResult<Vec<LieuTouristique>>;

    async fn list_provider_bookings(
        &self,
        provider_id: &str,
    ) -> CoreResult<Vec<TouristicPlaceBooking>>;
}

/// Per-user favourite episode ids.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Flips membership of `episode_id` and returns whether it is now a favourite.
    async fn toggle(&self, user_id: &str, episode_id: &str) -> CoreResult<bool>;

    async fn list(&self, user_id: &str) -> CoreResult<BTreeSet<String>>;
}

/// Fixed-window request counter.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Returns false once `key` has exceeded `limit` hits in the current window.
    async fn check(&self, key: &str, limit: i64, window_seconds: i64) -> CoreResult<bool>;
}
