//! Content identifier utilities
//!
//! Content ids are `bafybeig` followed by the first 32 hex characters of the
//! SHA-256 digest of the content. They are not multiformat CIDs, only shaped
//! like one, but they are stable: the same bytes always give the same id.

use sha2::{Digest, Sha256};

/// Prefix of every content id
pub const CID_PREFIX: &str = "bafybeig";

/// Number of digest hex characters kept in a content id
pub const CID_DIGEST_CHARS: usize = 32;

/// Gateway serving uploaded content
pub const GATEWAY_URL: &str = "https://ipfs.nexaflow.com/ipfs";

/// Incremental hasher producing a content id
#[derive(Clone, Default)]
pub struct ContentHasher {
    inner: Sha256,
    len: u64,
}

impl ContentHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed more content
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
        self.len += data.len() as u64;
    }

    /// Bytes hashed so far
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Full SHA-256 digest as lowercase hex
    pub fn finalize_hex(self) -> String {
        hex::encode(self.inner.finalize())
    }

    /// Finish and format the content id
    pub fn finalize(self) -> String {
        from_digest_hex(&self.finalize_hex())
    }
}

/// Content id of an in-memory buffer
pub fn content_id(data: &[u8]) -> String {
    let mut hasher = ContentHasher::new();
    hasher.update(data);
    hasher.finalize()
}

fn from_digest_hex(digest_hex: &str) -> String {
    format!("{}{}", CID_PREFIX, &digest_hex[..CID_DIGEST_CHARS])
}

/// Gateway URL for a content id
pub fn gateway_url(cid: &str) -> String {
    format!("{}/{}", GATEWAY_URL, cid)
}

/// Check whether a string has the shape of a content id
pub fn is_content_id(s: &str) -> bool {
    match s.strip_prefix(CID_PREFIX) {
        Some(digest) => {
            digest.len() == CID_DIGEST_CHARS
                && digest
                    .bytes()
                    .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        }
        None => false,
    }
}
