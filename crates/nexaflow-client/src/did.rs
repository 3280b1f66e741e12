//! Decentralized identifier parsing
//!
//! The client never validates the DID it is given; these helpers exist for
//! callers that want to check user input first.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Why a string is not a DID
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DidError {
    #[error("DID must start with \"did:\"")]
    MissingScheme,
    #[error("DID method must be non-empty lowercase alphanumeric: {0:?}")]
    InvalidMethod(String),
    #[error("DID identifier is empty")]
    EmptyIdentifier,
    #[error("DID identifier contains invalid character {0:?}")]
    InvalidIdentifier(char),
}

/// A parsed `did:<method>:<identifier>`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Did {
    method: String,
    identifier: String,
}

impl Did {
    /// Parse and validate a DID string
    pub fn parse(s: &str) -> Result<Self, DidError> {
        let rest = s.strip_prefix("did:").ok_or(DidError::MissingScheme)?;
        let (method, identifier) = rest
            .split_once(':')
            .ok_or_else(|| DidError::InvalidMethod(rest.to_string()))?;

        if method.is_empty()
            || !method
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return Err(DidError::InvalidMethod(method.to_string()));
        }
        if identifier.is_empty() {
            return Err(DidError::EmptyIdentifier);
        }
        if let Some(c) = identifier
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | ':' | '%')))
        {
            return Err(DidError::InvalidIdentifier(c));
        }

        Ok(Self {
            method: method.to_string(),
            identifier: identifier.to_string(),
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Method-specific identifier (everything after the method)
    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl FromStr for Did {
    type Err = DidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "did:{}:{}", self.method, self.identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_did() {
        let did = Did::parse("did:key:z6MkvS5hwP993amMA9kCbwK2Wbd7SifuwsBnRKFmaGhN92ZR").unwrap();
        assert_eq!(did.method(), "key");
        assert_eq!(
            did.identifier(),
            "z6MkvS5hwP993amMA9kCbwK2Wbd7SifuwsBnRKFmaGhN92ZR"
        );
    }

    #[test]
    fn test_parse_space_did_keeps_nested_colons() {
        let did: Did = "did:nex:space:space_1700000000".parse().unwrap();
        assert_eq!(did.method(), "nex");
        assert_eq!(did.identifier(), "space:space_1700000000");
        assert_eq!(did.to_string(), "did:nex:space:space_1700000000");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Did::parse("key:abc"), Err(DidError::MissingScheme));
        assert_eq!(
            Did::parse("did:KEY:abc"),
            Err(DidError::InvalidMethod("KEY".to_string()))
        );
        assert_eq!(Did::parse("did:key:"), Err(DidError::EmptyIdentifier));
        assert_eq!(
            Did::parse("did:key:abc def"),
            Err(DidError::InvalidIdentifier(' '))
        );
        assert!(Did::parse("did:key").is_err());
    }
}
