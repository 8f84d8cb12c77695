use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use escale_catalog::media::{
    categories, filter_playable, format_duration, format_file_size, parse_duration, search,
    sort_for_display, total_audience,
};
use escale_core::media::{Episode, MediaEpisode, MediaQuery, VideoEpisode};
use escale_core::{Page, Sourced};
use escale_shared::ApiEnvelope;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeCard<E> {
    #[serde(flatten)]
    pub episode: E,
    pub duration_label: Option<String>,
    pub size_label: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeListing<E> {
    pub episodes: Vec<EpisodeCard<E>>,
    pub categories: Vec<String>,
    pub total_audience: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/media/podcasts", get(list_podcasts))
        .route("/v1/media/videos", get(list_videos))
}

async fn list_podcasts(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> Result<Json<ApiEnvelope<EpisodeListing<MediaEpisode>>>, AppError> {
    let sourced = state.catalogue.podcasts(&query).await?;
    Ok(Json(listing(sourced, &query)))
}

async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<MediaQuery>,
) -> Result<Json<ApiEnvelope<EpisodeListing<VideoEpisode>>>, AppError> {
    let sourced = state.catalogue.videos(&query).await?;
    Ok(Json(listing(sourced, &query)))
}

/// Playable episodes of the requested category, featured and newest first.
fn listing<E: Episode + Clone>(sourced: Sourced<Page<E>>, query: &MediaQuery) -> ApiEnvelope<EpisodeListing<E>> {
    let fallback = sourced.is_fallback();
    let page = sourced.value;

    // Categories are offered from everything the upstream returned, not just the filtered view.
    let all_categories = categories(&page.items);

    let mut episodes = filter_playable(&page.items, query.category.as_deref());
    if let Some(term) = query.search.as_deref() {
        episodes = search(&episodes, term);
    }
    sort_for_display(&mut episodes);

    let audience = total_audience(&episodes);
    let episodes = episodes
        .into_iter()
        .map(|episode| EpisodeCard {
            duration_label: parse_duration(episode.duration()).map(format_duration),
            size_label: episode.file_size().map(format_file_size),
            episode,
        })
        .collect();

    ApiEnvelope::ok(EpisodeListing {
        episodes,
        categories: all_categories,
        total_audience: audience,
    })
    .with_pagination(page.pagination)
    .with_fallback(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(id: &str, category: &str, duration: &str, url: Option<&str>) -> MediaEpisode {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": format!("Episode {}", id),
            "category": category,
            "duration": duration,
            "audioUrl": url,
            "listens": 10,
            "fileSize": 2048,
        }))
        .unwrap()
    }

    #[test]
    fn test_listing_filters_and_labels() {
        let page = Page::new(
            vec![
                episode("1", "artisanat", "05:30", Some("https://cdn/1.mp3")),
                episode("2", "tourisme", "01:00:05", Some("https://cdn/2.mp3")),
                episode("3", "artisanat", "10:00", None),
            ],
            None,
        );
        let query = MediaQuery { category: Some("artisanat".into()), ..Default::default() };

        let envelope = listing(Sourced::live(page), &query);
        let data = envelope.data.unwrap();
        assert_eq!(data.episodes.len(), 1);
        assert_eq!(data.episodes[0].duration_label.as_deref(), Some("5:30"));
        assert_eq!(data.episodes[0].size_label.as_deref(), Some("2.0 KB"));
        assert_eq!(data.categories, vec!["artisanat".to_string(), "tourisme".to_string()]);
        assert_eq!(data.total_audience, 10);
        assert!(!envelope.fallback);
    }
}
