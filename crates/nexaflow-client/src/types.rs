//! Common types for the client SDK

use crate::cid;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Method used when `create_identity` is called with an empty method
pub const DEFAULT_DID_METHOD: &str = "key";

/// Id of the space every account starts with
pub const DEFAULT_SPACE_ID: &str = "space_default";

/// Result of uploading a file
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Content identifier
    #[serde(alias = "contentId")]
    pub cid: String,
    /// Base name of the uploaded file
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// Gateway URL serving the content
    pub url: String,
    /// DID the upload was made under
    pub did: String,
}

impl UploadResult {
    /// Build the result for a file whose content id is already known
    pub fn new(cid: String, name: impl Into<String>, size: u64, did: impl Into<String>) -> Self {
        let url = cid::gateway_url(&cid);
        Self {
            cid,
            name: name.into(),
            size,
            url,
            did: did.into(),
        }
    }
}

/// A named container for uploaded files
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    /// Space id
    pub id: String,
    /// Display name
    pub name: String,
    /// DID of the space
    pub did: String,
    /// Creation time
    pub created: DateTime<Utc>,
    /// Number of files
    #[serde(default)]
    pub file_count: u64,
    /// Total stored bytes
    #[serde(default)]
    pub total_size: u64,
}

impl Space {
    /// A freshly created, empty space; the id is derived from `now` in whole seconds
    pub fn synthesized(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        let id = format!("space_{}", now.timestamp());
        Self {
            did: format!("did:nex:space:{}", id),
            id,
            name: name.into(),
            created: now,
            file_count: 0,
            total_size: 0,
        }
    }

    /// The default space, reported as created a day before `now`
    pub fn default_space(now: DateTime<Utc>) -> Self {
        Self {
            id: DEFAULT_SPACE_ID.to_string(),
            name: "Default Space".to_string(),
            did: "did:nex:space:default".to_string(),
            created: now - Duration::hours(24),
            file_count: 0,
            total_size: 0,
        }
    }
}

/// A decentralized identity and its key material
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// The DID, `did:<method>:<identifier>`
    pub id: String,
    /// Multibase-style public key
    pub public_key: String,
    /// Multibase-style private key
    pub private_key: String,
    /// DID method
    pub method: String,
}

impl Identity {
    /// Identity whose key strings are derived from the Unix seconds of `now`.
    ///
    /// Two identities synthesized within the same second are identical.
    pub fn synthesized(method: &str, now: DateTime<Utc>) -> Self {
        let identifier = format!("{:x}", now.timestamp());

        Self {
            id: format!("did:{}:z6Mk{}", method, identifier),
            public_key: format!("z6Mk{}", identifier),
            private_key: format!("z{}", identifier),
            method: method.to_string(),
        }
    }
}

/// Snapshot of network health
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    /// Connected peers
    pub peers: u32,
    /// Health percentage (0-100)
    pub health: u8,
    /// Human-readable total storage
    pub total_storage: String,
    /// Active users
    pub active_users: u32,
}

impl NetworkStatus {
    /// The fixed snapshot reported while no backend answers
    pub fn simulated() -> Self {
        Self {
            peers: 1567,
            health: 98,
            total_storage: "24.7 TB".to_string(),
            active_users: 45231,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_synthesized_space() {
        let now = fixed_now();
        let space = Space::synthesized("Photos", now);

        assert_eq!(space.id, format!("space_{}", now.timestamp()));
        assert_eq!(space.did, format!("did:nex:space:{}", space.id));
        assert_eq!(space.name, "Photos");
        assert_eq!(space.created, now);
        assert_eq!(space.file_count, 0);
        assert_eq!(space.total_size, 0);
    }

    #[test]
    fn test_default_space_is_a_day_old() {
        let now = fixed_now();
        let space = Space::default_space(now);

        assert_eq!(space.id, DEFAULT_SPACE_ID);
        assert_eq!(space.did, "did:nex:space:default");
        assert_eq!(now - space.created, Duration::hours(24));
    }

    #[test]
    fn test_identity_key_strings() {
        let now = fixed_now();
        let identity = Identity::synthesized(DEFAULT_DID_METHOD, now);
        let hex = format!("{:x}", now.timestamp());

        assert_eq!(identity.method, "key");
        assert_eq!(identity.id, format!("did:key:z6Mk{}", hex));
        assert_eq!(identity.public_key, format!("z6Mk{}", hex));
        assert_eq!(identity.private_key, format!("z{}", hex));
    }

    #[test]
    fn test_identity_same_second_collides() {
        let now = fixed_now();
        assert_eq!(Identity::synthesized("web", now), Identity::synthesized("web", now));
    }

    #[test]
    fn test_json_field_names() {
        let space = Space::synthesized("Docs", fixed_now());
        let json = serde_json::to_value(&space).unwrap();
        assert!(json.get("fileCount").is_some());
        assert!(json.get("totalSize").is_some());

        let status = serde_json::to_value(NetworkStatus::simulated()).unwrap();
        assert_eq!(status["totalStorage"], "24.7 TB");
        assert_eq!(status["activeUsers"], 45231);

        let identity = serde_json::to_value(Identity::synthesized("key", fixed_now())).unwrap();
        assert!(identity.get("publicKey").is_some());
        assert!(identity.get("privateKey").is_some());
    }

    #[test]
    fn test_upload_result_accepts_content_id_alias() {
        let json = r#"{"contentId":"bafybeigabc","name":"a.txt","size":3,"url":"u","did":""}"#;
        let result: UploadResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.cid, "bafybeigabc");
    }
}
