//! Built-in demo catalogue served when the upstream cannot be reached.
//!
//! Demo content is always tagged [`DataOrigin::Fallback`](escale_core::DataOrigin::Fallback) so the gateway can
//! tell the client it is not looking at live data.

use escale_core::media::{MediaEpisode, MediaQuery, VideoEpisode};
use escale_core::repository::{MediaApi, Page, Sourced, TourismeApi};
use escale_core::tourisme::{Coordinates, LieuTouristique, PlaceQuery};
use escale_core::{CoreError, CoreResult};
use std::sync::Arc;
use tracing::warn;

pub fn demo_places() -> Vec<LieuTouristique> {
    let place = |id: &str, title: &str, category: &str, city: &str, price: f64, rating: f64, reviews: u32, amenities: &[&str], lat: f64, lng: f64| {
        LieuTouristique {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            category: category.to_string(),
            city: city.to_string(),
            address: None,
            price,
            rating,
            review_count: reviews,
            amenities: amenities.iter().map(|a| a.to_string()).collect(),
            coordinates: Some(Coordinates { lat, lng }),
            opening_hours: Some("09:00-18:00".to_string()),
            images: vec![],
            capacity: Some(200),
            provider_id: None,
        }
    };

    vec![
        place("demo-1", "Château de la Loire", "monument", "Amboise", 14.5, 4.7, 1280, &["parking", "boutique", "audioguide"], 47.413, 0.986),
        place("demo-2", "Musée d'art contemporain", "musee", "Lyon", 9.0, 4.4, 642, &["wifi", "accessible"], 45.784, 4.852),
        place("demo-3", "Parc naturel des Volcans", "parc", "Clermont-Ferrand", 0.0, 4.8, 2210, &["parking", "pique-nique"], 45.772, 2.964),
        place("demo-4", "Cité de l'espace", "loisirs", "Toulouse", 26.0, 4.6, 3105, &["restaurant", "accessible"], 43.586, 1.493),
    ]
}

pub fn demo_podcasts() -> Vec<MediaEpisode> {
    let episode = |id: &str, title: &str, category: &str, duration: &str, listens: u64, featured: bool| MediaEpisode {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        duration: duration.to_string(),
        date: Some("2024-01-15".to_string()),
        category: category.to_string(),
        listens,
        featured,
        audio_url: Some(format!("https://media.example.org/podcasts/{}.mp3", id)),
        thumbnail_url: None,
        mime_type: Some("audio/mpeg".to_string()),
        file_size: None,
        is_active: true,
    };

    vec![
        episode("demo-p1", "Les métiers de l'artisanat d'art", "artisanat", "00:32:10", 1540, true),
        episode("demo-p2", "Devenir guide-conférencier", "tourisme", "00:27:45", 980, false),
        episode("demo-p3", "Reconversion dans l'agriculture", "agriculture", "00:41:02", 610, false),
    ]
}

pub fn demo_videos() -> Vec<VideoEpisode> {
    let video = |id: &str, title: &str, category: &str, duration: &str, views: u64| VideoEpisode {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        duration: duration.to_string(),
        date: Some("2024-02-01".to_string()),
        category: category.to_string(),
        views,
        featured: false,
        video_url: Some(format!("https://media.example.org/videos/{}.mp4", id)),
        thumbnail_url: None,
        mime_type: Some("video/mp4".to_string()),
        file_size: None,
        is_active: true,
    };

    vec![
        video("demo-v1", "Une journée avec une ébéniste", "artisanat", "00:08:20", 4200),
        video("demo-v2", "Coulisses d'un musée", "tourisme", "00:12:05", 2750),
    ]
}

/// Read side of the public catalogue with optional demo fallback.
///
/// Only network and upstream failures trigger the fallback; a 404 or a
/// validation error is returned as is.
#[derive(Clone)]
pub struct CatalogueReader {
    tourisme: Arc<dyn TourismeApi>,
    media: Arc<dyn MediaApi>,
    fallback_enabled: bool,
}

impl CatalogueReader {
    pub fn new(tourisme: Arc<dyn TourismeApi>, media: Arc<dyn MediaApi>, fallback_enabled: bool) -> Self {
        Self { tourisme, media, fallback_enabled }
    }

    fn substitute<T>(&self, what: &str, err: CoreError, demo: impl FnOnce() -> T) -> CoreResult<Sourced<T>> {
        if self.fallback_enabled && err.is_upstream_failure() {
            warn!("Upstream failed for {}, serving demo data: {}", what, err);
            Ok(Sourced::fallback(demo()))
        } else {
            Err(err)
        }
    }

    pub async fn places(&self, query: &PlaceQuery) -> CoreResult<Sourced<Page<LieuTouristique>>> {
        match self.tourisme.list_places(query).await {
            Ok(page) => Ok(Sourced::live(page)),
            Err(e) => self.substitute("places", e, || Page::new(demo_places(), None)),
        }
    }

    pub async fn place(&self, id: &str) -> CoreResult<Sourced<LieuTouristique>> {
        match self.tourisme.get_place(id).await {
            Ok(place) => Ok(Sourced::live(place)),
            Err(e) => {
                // Only ids that exist in the demo set can be substituted.
                let demo = demo_places().into_iter().find(|p| p.id == id);
                match demo {
                    Some(place) => self.substitute("place", e, || place),
                    None => Err(e),
                }
            }
        }
    }

    pub async fn podcasts(&self, query: &MediaQuery) -> CoreResult<Sourced<Page<MediaEpisode>>> {
        match self.media.list_podcasts(query).await {
            Ok(page) => Ok(Sourced::live(page)),
            Err(e) => self.substitute("podcasts", e, || Page::new(demo_podcasts(), None)),
        }
    }

    pub async fn videos(&self, query: &MediaQuery) -> CoreResult<Sourced<Page<VideoEpisode>>> {
        match self.media.list_videos(query).await {
            Ok(page) => Ok(Sourced::live(page)),
            Err(e) => self.substitute("videos", e, || Page::new(demo_videos(), None)),
        }
    }
}
