//! # Registry Client
//!
//! The remote block registry and the identity provider are reached through the
//! [`Registry`] trait. [`http::HttpRegistry`] talks to the real services;
//! `mock::MockRegistry` records calls in memory for tests.
//!
//! Each lifecycle operation maps to exactly one request:
//!
//! ```text
//! POST /blocks/blockId        allocate an id for a new block
//! POST /blocks                create (first publish)
//! PUT  /blocks/{id}           update the staged content of the active version
//! POST /blocks/{id}/major     start a new major version
//! PUT  /blocks/{id}/release   release the active version
//! PUT  /blocks/{id}/rollback  roll the active version back
//! GET  /blocks/{id}           block details
//! GET  /categories            valid category names
//! ```
//!
//! Any non-2xx response becomes a single [`ElementError::Network`]; a 413 becomes
//! [`ElementError::PayloadTooLarge`] carrying the approximate upload size.

use crate::error::{ElementError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod http;
#[cfg(any(test, feature = "test_utils"))]
pub mod mock;

/// Sent as `Element-Cli-Version` on every registry request.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockNames {
    pub display_name: String,
    pub published_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMetadata {
    pub category: Option<String>,
    pub is_public: bool,
    pub names: BlockNames,
    pub note: String,
    /// Base64 PNG, empty when omitted.
    pub thumbnail: String,
}

/// Body of the create and update requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPayload {
    pub content: String,
    pub default_config: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub integration_id: Option<u32>,
    pub metadata: BlockMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_cache_duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MajorVersionPayload {
    pub content: String,
    pub default_config: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasePayload {
    pub note: String,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackPayload {
    pub version: u32,
}

/// Generic acknowledgement; the registry echoes the block id on most calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockAck {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MajorVersionAck {
    pub id: Option<String>,
    /// Major versions the registry considers active after the bump.
    pub active_versions: Vec<u32>,
    pub version: Option<u32>,
}

impl MajorVersionAck {
    /// Highest major version the registry reported, if any.
    pub fn max_reported(&self) -> Option<u32> {
        self.active_versions
            .iter()
            .copied()
            .chain(self.version)
            .max()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: u32,
    pub created_on: Option<DateTime<Utc>>,
    pub is_released: Option<bool>,
    pub note: Option<String>,
}

/// Server-side view of a block, as returned by `GET /blocks/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockDetails {
    pub id: String,
    #[serde(alias = "displayName")]
    pub name: Option<String>,
    pub category: Option<String>,
    pub is_public: Option<bool>,
    pub active_version: Option<u32>,
    pub versions: Vec<VersionInfo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub id_token: String,
}

/// Operations against the registry and its identity provider.
///
/// Every registry call carries the caller's bearer token.
pub trait Registry {
    /// Exchange credentials for an id token (password grant).
    fn login(&self, username: &str, password: &str) -> Result<String>;

    fn categories(&self, token: &str) -> Result<Vec<String>>;

    /// Reserve an id for a block that has not been created yet.
    fn allocate_block_id(&self, token: &str) -> Result<String>;

    fn create_block(&self, token: &str, payload: &BlockPayload) -> Result<BlockAck>;

    fn update_block(&self, token: &str, id: &str, payload: &BlockPayload) -> Result<BlockAck>;

    fn create_major_version(
        &self,
        token: &str,
        id: &str,
        payload: &MajorVersionPayload,
    ) -> Result<MajorVersionAck>;

    fn release_block(&self, token: &str, id: &str, payload: &ReleasePayload) -> Result<BlockAck>;

    fn rollback_block(&self, token: &str, id: &str, payload: &RollbackPayload)
        -> Result<BlockAck>;

    fn get_block(&self, token: &str, id: &str, version: Option<u32>) -> Result<BlockDetails>;
}

/// Map a response status to an error, leaving 2xx alone.
///
/// `content_length` is the size of the request body, used for the 413 hint.
pub fn check_status(status: u16, body: &str, content_length: usize) -> Result<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    if status == 413 {
        let approx_kb = (content_length as f64 / 1000.0).round() as u64;
        return Err(ElementError::PayloadTooLarge { approx_kb });
    }
    Err(ElementError::Network {
        status: Some(status),
        message: server_detail(body).unwrap_or_else(|| format!("HTTP {}", status)),
    })
}

/// The most useful human-readable part of an error body.
fn server_detail(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error_description", "error"] {
            if let Some(Value::String(detail)) = obj.get(key) {
                return Some(detail.clone());
            }
        }
    }
    Some(body.to_string())
}

/// Parse a success body; an empty body yields the default value.
pub fn parse_body<T>(body: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    if body.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses_pass() {
        assert!(check_status(200, "", 0).is_ok());
        assert!(check_status(204, "", 0).is_ok());
    }

    #[test]
    fn payload_too_large_reports_rounded_kb() {
        let err = check_status(413, "Request Entity Too Large", 1_234_567).unwrap_err();
        assert!(matches!(err, ElementError::PayloadTooLarge { approx_kb: 1235 }));
        assert!(err.to_string().contains("approximately 1235 kb"));
    }

    #[test]
    fn server_message_is_relayed() {
        let err = check_status(400, r#"{"message":"Invalid category"}"#, 10).unwrap_err();
        match err {
            ElementError::Network { status, message } => {
                assert_eq!(status, Some(400));
                assert_eq!(message, "Invalid category");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn plain_and_empty_bodies() {
        match check_status(500, "  upstream down ", 0).unwrap_err() {
            ElementError::Network { message, .. } => assert_eq!(message, "upstream down"),
            other => panic!("unexpected error: {other:?}"),
        }
        match check_status(502, "", 0).unwrap_err() {
            ElementError::Network { message, .. } => assert_eq!(message, "HTTP 502"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parses_bodies_leniently() {
        let ack: BlockAck = parse_body("").unwrap();
        assert_eq!(ack, BlockAck::default());

        let ack: MajorVersionAck =
            parse_body(r#"{"id":"b1","activeVersions":[2,4,3],"extra":true}"#).unwrap();
        assert_eq!(ack.id.as_deref(), Some("b1"));
        assert_eq!(ack.max_reported(), Some(4));
        assert_eq!(MajorVersionAck::default().max_reported(), None);
    }

    #[test]
    fn block_details_accept_display_name() {
        let details: BlockDetails = parse_body(
            r#"{"id":"b1","displayName":"Hero","activeVersion":2,
                "versions":[{"version":1,"createdOn":"2019-03-05T16:52:30.276Z","isReleased":true}],
                "organization":"acme"}"#,
        )
        .unwrap();
        assert_eq!(details.name.as_deref(), Some("Hero"));
        assert_eq!(details.versions.len(), 1);
        assert_eq!(details.versions[0].is_released, Some(true));
        assert_eq!(details.extra["organization"], "acme");
    }

    #[test]
    fn payload_serializes_in_registry_shape() {
        let payload = BlockPayload {
            content: "block()".into(),
            default_config: serde_json::json!({}),
            id: Some("b1".into()),
            integration_id: Some(1),
            metadata: BlockMetadata {
                category: Some("Layout".into()),
                is_public: false,
                names: BlockNames {
                    display_name: "My Widget".into(),
                    published_name: "MyWidget".into(),
                },
                note: String::new(),
                thumbnail: String::new(),
            },
            output_cache_duration: Some(0),
            version: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["defaultConfig"], serde_json::json!({}));
        assert_eq!(json["integrationId"], 1);
        assert_eq!(json["metadata"]["names"]["publishedName"], "MyWidget");
        assert_eq!(json["outputCacheDuration"], 0);
        assert!(json.get("version").is_none());
    }
}
