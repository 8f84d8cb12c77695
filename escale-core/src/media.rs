use serde::{Deserialize, Serialize};
use crate::de::string_or_number;

fn default_active() -> bool {
    true
}

/// A podcast episode as served by `/podcasts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MediaEpisode {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// `"HH:MM:SS"` or `"MM:SS"`.
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub listens: u64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// A video episode as served by `/videos`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VideoEpisode {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// Common view over podcasts and videos used by catalogue predicates.
pub trait Episode {
    fn id(&self) -> &str;
    fn title(&self) -> &str;
    fn description(&self) -> &str;
    fn category(&self) -> &str;
    fn is_active(&self) -> bool;
    fn is_featured(&self) -> bool;
    fn media_url(&self) -> Option<&str>;
    fn date(&self) -> Option<&str>;
    fn duration(&self) -> &str;
    fn file_size(&self) -> Option<u64>;
    /// Listens for podcasts, views for videos.
    fn audience(&self) -> u64;
}

impl Episode for MediaEpisode {
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
    fn is_featured(&self) -> bool {
        self.featured
    }
    fn media_url(&self) -> Option<&str> {
        self.audio_url.as_deref()
    }
    fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
    fn duration(&self) -> &str {
        &self.duration
    }
    fn file_size(&self) -> Option<u64> {
        self.file_size
    }
    fn audience(&self) -> u64 {
        self.listens
    }
}

impl Episode for VideoEpisode {
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
    fn description(&self) -> &str {
        &self.description
    }
    fn category(&self) -> &str {
        &self.category
    }
    fn is_active(&self) -> bool {
        self.is_active
    }
    fn is_featured(&self) -> bool {
        self.featured
    }
    fn media_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }
    fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
    fn duration(&self) -> &str {
        &self.duration
    }
    fn file_size(&self) -> Option<u64> {
        self.file_size
    }
    fn audience(&self) -> u64 {
        self.views
    }
}

/// Query parameters accepted by the media listing endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_defaults_from_sparse_payload() {
        let raw = r#"{"id": 12, "title": "Les métiers du bois", "audioUrl": "https://cdn/x.mp3"}"#;
        let ep: MediaEpisode = serde_json::from_str(raw).unwrap();
        assert_eq!(ep.id, "12");
        assert!(ep.is_active);
        assert!(!ep.featured);
        assert_eq!(ep.listens, 0);
        assert_eq!(ep.media_url(), Some("https://cdn/x.mp3"));
    }

    #[test]
    fn test_video_audience_is_views() {
        let raw = r#"{"id": "v1", "title": "Visite", "views": 420, "isActive": false}"#;
        let ep: VideoEpisode = serde_json::from_str(raw).unwrap();
        assert_eq!(ep.audience(), 420);
        assert!(!ep.is_active());
        assert_eq!(ep.media_url(), None);
    }
}
