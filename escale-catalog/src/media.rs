//! Catalogue predicates and formatting for podcast and video listings.

use escale_core::media::Episode;
use std::collections::BTreeSet;

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Keeps episodes in `category` (or any, for `"all"`/empty) that are active
/// and have a playable URL. Applying it twice yields the same list.
pub fn filter_playable<E: Episode + Clone>(episodes: &[E], category: Option<&str>) -> Vec<E> {
    episodes
        .iter()
        .filter(|e| matches_category(*e, category) && e.is_active() && has_media_url(*e))
        .cloned()
        .collect()
}

pub fn matches_category<E: Episode>(episode: &E, category: Option<&str>) -> bool {
    match category.map(str::trim) {
        None | Some("") => true,
        Some(c) if c.eq_ignore_ascii_case(ALL_CATEGORIES) => true,
        Some(c) => episode.category().eq_ignore_ascii_case(c),
    }
}

pub fn has_media_url<E: Episode>(episode: &E) -> bool {
    episode.media_url().map_or(false, |u| !u.trim().is_empty())
}

/// Case-insensitive match on title or description.
pub fn search<E: Episode + Clone>(episodes: &[E], term: &str) -> Vec<E> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return episodes.to_vec();
    }
    episodes
        .iter()
        .filter(|e| {
            e.title().to_lowercase().contains(&needle)
                || e.description().to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Featured episodes first, then newest first. Dates are ISO strings so
/// lexical order is chronological; undated episodes sink to the bottom.
pub fn sort_for_display<E: Episode>(episodes: &mut [E]) {
    episodes.sort_by(|a, b| {
        b.is_featured()
            .cmp(&a.is_featured())
            .then_with(|| b.date().cmp(&a.date()))
    });
}

/// Distinct non-empty categories, sorted.
pub fn categories<E: Episode>(episodes: &[E]) -> Vec<String> {
    episodes
        .iter()
        .map(|e| e.category().trim())
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn total_audience<E: Episode>(episodes: &[E]) -> u64 {
    episodes.iter().map(Episode::audience).fold(0, u64::saturating_add)
}

/// Parses `"HH:MM:SS"`, `"MM:SS"` or plain seconds.
pub fn parse_duration(raw: &str) -> Option<u64> {
    let parts: Vec<&str> = raw.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    let mut seconds = 0u64;
    for part in parts {
        let value: u64 = part.trim().parse().ok()?;
        seconds = seconds.checked_mul(60)?.checked_add(value)?;
    }
    Some(seconds)
}

/// `3725` -> `"1:02:05"`, `65` -> `"1:05"`.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use escale_core::media::MediaEpisode;

    fn episode(id: &str, category: &str, active: bool, url: Option<&str>) -> MediaEpisode {
        MediaEpisode {
            id: id.to_string(),
            title: format!("Episode {}", id),
            description: String::new(),
            duration: "00:10:00".into(),
            date: None,
            category: category.to_string(),
            listens: 10,
            featured: false,
            audio_url: url.map(str::to_string),
            thumbnail_url: None,
            mime_type: Some("audio/mpeg".into()),
            file_size: None,
            is_active: active,
        }
    }

    fn sample() -> Vec<MediaEpisode> {
        vec![
            episode("1", "artisanat", true, Some("https://cdn/1.mp3")),
            episode("2", "artisanat", false, Some("https://cdn/2.mp3")),
            episode("3", "artisanat", true, None),
            episode("4", "tourisme", true, Some("https://cdn/4.mp3")),
            episode("5", "Artisanat", true, Some("   ")),
        ]
    }

    #[test]
    fn test_filter_by_category_active_and_url() {
        let episodes = sample();
        let filtered = filter_playable(&episodes, Some("artisanat"));
        let ids: Vec<&str> = filtered.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);

        let all = filter_playable(&episodes, Some("all"));
        assert_eq!(all.len(), 2);
        assert_eq!(filter_playable(&episodes, None).len(), 2);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let episodes = sample();
        for category in [None, Some("all"), Some("artisanat"), Some("tourisme"), Some("inconnu")] {
            let once = filter_playable(&episodes, category);
            let twice = filter_playable(&once, category);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_search_and_sort() {
        let mut episodes = sample();
        episodes[3].featured = true;
        episodes[0].date = Some("2024-05-01".into());
        episodes[1].date = Some("2024-06-01".into());

        sort_for_display(&mut episodes);
        assert_eq!(episodes[0].id, "4");
        assert_eq!(episodes[1].id, "2");
        assert_eq!(episodes[2].id, "1");

        assert_eq!(search(&episodes, "episode 3").len(), 1);
        assert_eq!(search(&episodes, "").len(), episodes.len());
    }

    #[test]
    fn test_categories_and_audience() {
        let episodes = sample();
        assert_eq!(categories(&episodes), vec!["Artisanat", "artisanat", "tourisme"]);
        assert_eq!(total_audience(&episodes), 50);
    }

    #[test]
    fn test_duration_helpers() {
        assert_eq!(parse_duration("01:02:05"), Some(3725));
        assert_eq!(parse_duration("12:30"), Some(750));
        assert_eq!(parse_duration("90"), Some(90));
        assert_eq!(parse_duration("1:2:3:4"), None);
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration("99999999999999999:00:00"), None);
        assert_eq!(parse_duration(&u64::MAX.to_string()), Some(u64::MAX));
        assert_eq!(format_duration(3725), "1:02:05");
        assert_eq!(format_duration(65), "1:05");
    }

    #[test]
    fn test_file_size_formatting() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(5 * 1024 * 1024 + 300 * 1024), "5.3 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3.0 GB");
    }
}
