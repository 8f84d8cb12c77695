use serde::{Deserialize, Serialize};

/// Pagination block returned alongside list payloads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            ((total + limit as u64 - 1) / limit as u64) as u32
        };
        Self { page, limit, total, total_pages }
    }
}

/// JSON envelope shared by the upstream API and the gateway:
/// `{success, data, pagination?, message?, fallback?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set when the payload is demo data served because the upstream failed.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            pagination: None,
            message: None,
            error: None,
            fallback: false,
        }
    }

    pub fn with_pagination(mut self, pagination: Option<Pagination>) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// The best human-readable explanation the upstream gave for a failure.
    pub fn failure_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_total_pages() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).total_pages, 2);
        assert_eq!(Pagination::new(1, 0, 11).total_pages, 0);
    }

    #[test]
    fn test_envelope_parses_upstream_shape() {
        let raw = r#"{"success":true,"data":[1,2,3],"pagination":{"page":2,"limit":3,"total":9,"totalPages":3}}"#;
        let env: ApiEnvelope<Vec<i32>> = serde_json::from_str(raw).unwrap();
        assert!(env.success);
        assert_eq!(env.data, Some(vec![1, 2, 3]));
        assert_eq!(env.pagination.unwrap().total_pages, 3);
        assert!(!env.fallback);
    }

    #[test]
    fn test_failure_message_prefers_error_field() {
        let raw = r#"{"success":false,"error":"Places insuffisantes","message":"Bad request"}"#;
        let env: ApiEnvelope<serde_json::Value> = serde_json::from_str(raw).unwrap();
        assert_eq!(env.failure_message(), Some("Places insuffisantes"));

        let raw = r#"{"success":false,"message":"Date invalide"}"#;
        let env: ApiEnvelope<serde_json::Value> = serde_json::from_str(raw).unwrap();
        assert_eq!(env.failure_message(), Some("Date invalide"));
    }

    #[test]
    fn test_fallback_flag_only_serialized_when_set() {
        let live = serde_json::to_value(ApiEnvelope::ok(1)).unwrap();
        assert!(live.get("fallback").is_none());

        let demo = serde_json::to_value(ApiEnvelope::ok(1).with_fallback(true)).unwrap();
        assert_eq!(demo["fallback"], true);
    }
}
