//! Resources managed by the admin CRUD screens.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

use crate::de::{lenient_f64, string_or_number};

/// A record the admin screens can list, create, update and delete.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Validated payload for create/update.
    type Draft: Serialize + DeserializeOwned + Validate + Send + Sync;

    /// Upstream collection path, e.g. `/metiers`.
    const PATH: &'static str;
    /// Human readable label used in log lines and error messages.
    const LABEL: &'static str;

    fn id(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Metier {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MetierDraft {
    #[validate(length(min = 2, max = 120, message = "name must be 2 to 120 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 2000, message = "description is too long"))]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Resource for Metier {
    type Draft = MetierDraft;
    const PATH: &'static str = "/metiers";
    const LABEL: &'static str = "metier";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A support service offered under the accompaniment programme.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOffer {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metier_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOfferDraft {
    #[validate(length(min = 2, max = 160, message = "title must be 2 to 160 characters"))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub metier_id: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, message = "price cannot be negative"))]
    pub price: f64,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Resource for ServiceOffer {
    type Draft = ServiceOfferDraft;
    const PATH: &'static str = "/admin/accompagnement/services";
    const LABEL: &'static str = "service";

    fn id(&self) -> &str {
        &self.id
    }
}

/// A professional portrait shown on the métier pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Portrait {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub full_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub metier_id: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PortraitDraft {
    #[validate(length(min = 2, max = 120, message = "full name must be 2 to 120 characters"))]
    pub full_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    #[validate(url(message = "photo url is not a valid url"))]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub metier_id: Option<String>,
    #[serde(default)]
    pub is_published: bool,
}

impl Resource for Portrait {
    type Draft = PortraitDraft;
    const PATH: &'static str = "/admin/accompagnement/portraits";
    const LABEL: &'static str = "portrait";

    fn id(&self) -> &str {
        &self.id
    }
}

fn default_true() -> bool {
    true
}

/// Listing parameters shared by the admin collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
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
    use crate::CoreError;

    #[test]
    fn test_metier_draft_validation() {
        let ok = MetierDraft {
            name: "Ébéniste".into(),
            description: String::new(),
            category: None,
            icon: None,
            is_active: true,
        };
        assert!(ok.validate().is_ok());

        let short = MetierDraft { name: "E".into(), ..ok };
        let err: CoreError = short.validate().unwrap_err().into();
        match err {
            CoreError::ValidationError(msg) => assert!(msg.contains("name")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_service_draft_rejects_negative_price() {
        let draft: ServiceOfferDraft =
            serde_json::from_str(r#"{"title": "Bilan de compétences", "price": -5}"#).unwrap();
        assert!(draft.is_active);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_portrait_draft_rejects_bad_url() {
        let draft: PortraitDraft =
            serde_json::from_str(r#"{"fullName": "Amina Diallo", "photoUrl": "not a url"}"#).unwrap();
        assert!(draft.validate().is_err());

        let draft: PortraitDraft =
            serde_json::from_str(r#"{"fullName": "Amina Diallo", "photoUrl": "https://cdn.example.org/a.jpg"}"#).unwrap();
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_resource_paths() {
        assert_eq!(Metier::PATH, "/metiers");
        assert!(ServiceOffer::PATH.starts_with("/admin/accompagnement/"));
        assert!(Portrait::PATH.starts_with("/admin/accompagnement/"));
    }
}
