//! Upstream implementations of the core API traits.

use async_trait::async_trait;
use chrono::NaiveDate;
use escale_core::admin::{ListQuery, Resource};
use escale_core::media::{MediaEpisode, MediaQuery, VideoEpisode};
use escale_core::repository::{BookingAdminApi, CrudApi, MediaApi, Page, ProviderApi, TourismeApi};
use escale_core::tourisme::{
    Availability, BookingQuery, BookingStatus, BookingSubmission, LieuTouristique, PlaceQuery,
    TouristicPlaceBooking,
};
use escale_core::{CoreError, CoreResult};
use serde_json::json;
use tracing::info;

use crate::client::ApiClient;

/// Every upstream-backed trait, sharing one HTTP client.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: ApiClient,
}

impl HttpBackend {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

/// Ids end up in URL paths, so only plain identifier characters are accepted.
fn segment(id: &str) -> CoreResult<&str> {
    let ok = !id.is_empty()
        && id.len() <= 128
        && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(id)
    } else {
        Err(CoreError::ValidationError(format!("invalid identifier '{}'", id)))
    }
}

#[async_trait]
impl TourismeApi for HttpBackend {
    async fn list_places(&self, query: &PlaceQuery) -> CoreResult<Page<LieuTouristique>> {
        let (items, pagination) = self.client.get("/tourisme/lieux", query).await?;
        Ok(Page::new(items, pagination))
    }

    async fn get_place(&self, id: &str) -> CoreResult<LieuTouristique> {
        let path = format!("/tourisme/lieux/{}", segment(id)?);
        let (place, _) = self.client.get(&path, &()).await?;
        Ok(place)
    }

    async fn check_availability(&self, place_id: &str, visit_date: NaiveDate) -> CoreResult<Availability> {
        let path = format!("/tourisme/lieux/{}/disponibilite", segment(place_id)?);
        let date = visit_date.format("%Y-%m-%d").to_string();
        let (availability, _) = self.client.get(&path, &[("date", date.as_str())]).await?;
        Ok(availability)
    }

    async fn create_booking(&self, submission: &BookingSubmission) -> CoreResult<TouristicPlaceBooking> {
        let booking: TouristicPlaceBooking = self.client.post("/tourisme/reservations", submission).await?;
        info!("Upstream accepted booking {}", booking.confirmation_number);
        Ok(booking)
    }
}

#[async_trait]
impl MediaApi for HttpBackend {
    async fn list_podcasts(&self, query: &MediaQuery) -> CoreResult<Page<MediaEpisode>> {
        let (items, pagination) = self.client.get("/podcasts", query).await?;
        Ok(Page::new(items, pagination))
    }

    async fn list_videos(&self, query: &MediaQuery) -> CoreResult<Page<VideoEpisode>> {
        let (items, pagination) = self.client.get("/videos", query).await?;
        Ok(Page::new(items, pagination))
    }
}

#[async_trait]
impl<R: Resource> CrudApi<R> for HttpBackend {
    async fn list(&self, query: &ListQuery) -> CoreResult<Page<R>> {
        let (items, pagination) = self.client.get(R::PATH, query).await?;
        Ok(Page::new(items, pagination))
    }

    async fn get(&self, id: &str) -> CoreResult<R> {
        let path = format!("{}/{}", R::PATH, segment(id)?);
        let (item, _) = self.client.get(&path, &()).await?;
        Ok(item)
    }

    async fn create(&self, draft: &R::Draft) -> CoreResult<R> {
        let created: R = self.client.post(R::PATH, draft).await?;
        info!("Created {} {}", R::LABEL, created.id());
        Ok(created)
    }

    async fn update(&self, id: &str, draft: &R::Draft) -> CoreResult<R> {
        let path = format!("{}/{}", R::PATH, segment(id)?);
        let updated: R = self.client.put(&path, draft).await?;
        info!("Updated {} {}", R::LABEL, id);
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> CoreResult<()> {
        let path = format!("{}/{}", R::PATH, segment(id)?);
        self.client.delete(&path).await?;
        info!("Deleted {} {}", R::LABEL, id);
        Ok(())
    }
}

#[async_trait]
impl BookingAdminApi for HttpBackend {
    async fn list_bookings(&self, query: &BookingQuery) -> CoreResult<Page<TouristicPlaceBooking>> {
        let (items, pagination) = self.client.get("/tourisme/admin/reservations", query).await?;
        Ok(Page::new(items, pagination))
    }

    async fn get_booking(&self, id: &str) -> CoreResult<TouristicPlaceBooking> {
        let path = format!("/tourisme/admin/reservations/{}", segment(id)?);
        let (booking, _) = self.client.get(&path, &()).await?;
        Ok(booking)
    }

    async fn update_booking_status(&self, id: &str, status: BookingStatus) -> CoreResult<TouristicPlaceBooking> {
        let path = format!("/tourisme/admin/reservations/{}/status", segment(id)?);
        self.client.patch(&path, &json!({ "status": status })).await
    }
}

#[async_trait]
impl ProviderApi for HttpBackend {
    async fn list_provider_places(&self, provider_id: &str) -> CoreResult<Vec<LieuTouristique>> {
        let (places, _) = self
            .client
            .get("/expert/lieux", &[("providerId", segment(provider_id)?)])
            .await?;
        Ok(places)
    }

    async fn list_provider_bookings(&self, provider_id: &str) -> CoreResult<Vec<TouristicPlaceBooking>> {
        let (bookings, _) = self
            .client
            .get("/expert/reservations", &[("providerId", segment(provider_id)?)])
            .await?;
        Ok(bookings)
    }
}
